//! The Substrate signing preimage: the SCALE-concatenated payload, reduced
//! to its Blake2b-256 hash when it exceeds 256 bytes (the runtime's own
//! rule for bounding what a hardware signer has to display/hash).

use super::{codec, raw::SubstrateRawTx};
use wallet_codec::hash::blake2b_256;
use wallet_primitives::{ChainAlias, EngineError, SigningAlgorithm, SigningPayload};

const BLAKE2_THRESHOLD: usize = 256;

pub fn preimage(tx: &SubstrateRawTx) -> Vec<u8> {
    let payload = codec::signing_payload_bytes(tx);
    if payload.len() > BLAKE2_THRESHOLD {
        blake2b_256(&payload).to_vec()
    } else {
        payload
    }
}

/// This engine's closed [`SigningAlgorithm`] taxonomy only distinguishes
/// "needs a pre-hashed secp256k1 digest" from "signs the message bytes
/// directly" — Substrate's sr25519/ed25519 keys both fall in the latter
/// category, so this is tagged `Ed25519` even for sr25519 signers.
pub fn signing_payload(chain_alias: &ChainAlias, tx: &SubstrateRawTx) -> Result<SigningPayload, EngineError> {
    Ok(SigningPayload { chain_alias: chain_alias.clone(), data: vec![preimage(tx)], algorithm: SigningAlgorithm::Ed25519 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substrate::raw::{Era, SubstrateCall};

    fn sample_tx() -> SubstrateRawTx {
        SubstrateRawTx {
            call: SubstrateCall { pallet_index: 5, call_index: 3, args: vec![0; 33] },
            era: Era::Mortal { period: 64, phase: 10 },
            nonce: 1,
            tip: 0,
            spec_version: 200,
            transaction_version: 5,
            genesis_hash: [0x11; 32],
            block_hash: [0x22; 32],
            signer_account_id: [0x33; 32],
        }
    }

    #[test]
    fn short_payload_is_signed_directly() {
        let payload = signing_payload(&ChainAlias::new("bittensor"), &sample_tx()).unwrap();
        assert_eq!(payload.data.len(), 1);
        assert!(payload.data[0].len() <= BLAKE2_THRESHOLD);
    }

    #[test]
    fn oversized_payload_is_hashed() {
        let mut tx = sample_tx();
        tx.call.args = vec![0u8; 400];
        let payload = signing_payload(&ChainAlias::new("bittensor"), &tx).unwrap();
        assert_eq!(payload.data[0].len(), 32);
    }
}
