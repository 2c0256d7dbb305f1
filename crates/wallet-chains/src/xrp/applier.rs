//! Splices the signature into `TxnSignature` and serialises the full
//! transaction. XRPL's hash (used for the `tx` RPC lookup) is
//! `SHA-512-half` of the serialised blob prefixed with the "transaction ID"
//! namespace code `0x54584E00` ("TXN\0").

use super::{codec, raw::XrpRawTx};
use wallet_codec::hash::sha512_half;
use wallet_primitives::{ChainAlias, EngineError, RawSignature, SignedTransaction};

const TRANSACTION_ID_PREFIX: [u8; 4] = [0x54, 0x58, 0x4e, 0x00];

pub fn apply_signature(chain_alias: &ChainAlias, tx: XrpRawTx, signatures: Vec<RawSignature>) -> Result<SignedTransaction, EngineError> {
    if signatures.len() != 1 {
        return Err(EngineError::Signature { chain_alias: chain_alias.clone(), expected: 1, got: signatures.len() });
    }
    let signed_bytes = codec::serialize_signed(&tx, &signatures[0].0)?;

    let mut hash_input = TRANSACTION_ID_PREFIX.to_vec();
    hash_input.extend_from_slice(&signed_bytes);
    let hash = sha512_half(&hash_input);

    Ok(SignedTransaction { chain_alias: chain_alias.clone(), serialized: hex::encode(signed_bytes).to_uppercase(), hash: hex::encode(hash).to_uppercase() })
}
