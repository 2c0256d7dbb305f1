//! Splices the signature into the extrinsic and computes its hash:
//! Blake2b-256 of the fully signed, SCALE-encoded extrinsic.

use super::{codec, raw::SubstrateRawTx};
use wallet_codec::hash::blake2b_256;
use wallet_primitives::{ChainAlias, EngineError, RawSignature, SignedTransaction};

pub fn apply_signature(chain_alias: &ChainAlias, tx: SubstrateRawTx, signatures: Vec<RawSignature>) -> Result<SignedTransaction, EngineError> {
    if signatures.len() != 1 {
        return Err(EngineError::Signature { chain_alias: chain_alias.clone(), expected: 1, got: signatures.len() });
    }
    let signed_bytes = codec::serialize_signed(&tx, &signatures[0].0)?;
    let hash = blake2b_256(&signed_bytes);
    Ok(SignedTransaction { chain_alias: chain_alias.clone(), serialized: hex::encode(&signed_bytes), hash: format!("0x{}", hex::encode(hash)) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substrate::raw::{Era, SubstrateCall};

    #[test]
    fn wrong_signature_count_is_rejected() {
        let tx = SubstrateRawTx {
            call: SubstrateCall { pallet_index: 5, call_index: 3, args: vec![0; 33] },
            era: Era::Immortal,
            nonce: 1,
            tip: 0,
            spec_version: 100,
            transaction_version: 1,
            genesis_hash: [0u8; 32],
            block_hash: [0u8; 32],
            signer_account_id: [0u8; 32],
        };
        let err = apply_signature(&ChainAlias::new("bittensor"), tx, vec![]).unwrap_err();
        assert!(matches!(err, EngineError::Signature { .. }));
    }
}
