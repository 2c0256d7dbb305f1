//! Solana's "sighash" is the message itself: ed25519 signs the serialised
//! message bytes directly, with no intermediate digest.

use super::{codec, raw::SvmRawTx};
use wallet_primitives::{ChainAlias, EngineError, SigningAlgorithm, SigningPayload};

pub fn signing_payload(chain_alias: &ChainAlias, tx: &SvmRawTx) -> Result<SigningPayload, EngineError> {
    let message = codec::serialize_message(tx)?;
    Ok(SigningPayload { chain_alias: chain_alias.clone(), data: vec![message], algorithm: SigningAlgorithm::Ed25519 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svm::{address, raw::{CompiledInstruction, MessageHeader}};

    fn base_tx() -> SvmRawTx {
        SvmRawTx {
            version: None,
            header: MessageHeader { num_required_signatures: 1, num_readonly_signed_accounts: 0, num_readonly_unsigned_accounts: 1 },
            account_keys: vec![address::encode32(&[1u8; 32]), address::encode32(&[0u8; 32])],
            recent_blockhash: address::encode32(&[9u8; 32]),
            instructions: vec![CompiledInstruction { program_id_index: 1, accounts: vec![0], data: vec![2, 0, 0, 0] }],
        }
    }

    #[test]
    fn payload_is_exactly_the_serialised_message() {
        let payload = signing_payload(&ChainAlias::new("solana"), &base_tx()).unwrap();
        assert_eq!(payload.data.len(), 1);
        assert_eq!(payload.algorithm, SigningAlgorithm::Ed25519);
    }
}
