//! EVM sighash/preimage engine: Keccak-256 over the RLP preimage.

use super::{codec, raw::EvmRawTx};
use wallet_codec::hash::keccak256;
use wallet_primitives::{ChainAlias, EngineError, SigningAlgorithm, SigningPayload};

pub fn signing_payload(chain_alias: &ChainAlias, tx: &EvmRawTx) -> Result<SigningPayload, EngineError> {
    let preimage = if tx.is_eip1559() { codec::eip1559_preimage(tx)? } else { codec::legacy_preimage(tx)? };
    let digest = keccak256(&preimage);
    Ok(SigningPayload { chain_alias: chain_alias.clone(), data: vec![digest.to_vec()], algorithm: SigningAlgorithm::Secp256k1 })
}
