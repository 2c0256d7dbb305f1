//! base58check, shared by Tron (`0x41` version byte) and Bitcoin legacy
//! addresses. XRPL uses the same checksum scheme over a different alphabet
//! (base58-xrpl), which `wallet-chains::xrp::address` implements directly
//! against `bs58`'s alphabet customisation rather than through here.

use crate::{hash::sha256d, CodecError};

/// Encodes `payload` (version byte + body) with a trailing 4-byte
/// SHA-256d checksum, the scheme Bitcoin and Tron both use.
pub fn encode_check(payload: &[u8]) -> String {
    let checksum = sha256d(payload);
    let mut full = Vec::with_capacity(payload.len() + 4);
    full.extend_from_slice(payload);
    full.extend_from_slice(&checksum[..4]);
    bs58::encode(full).into_string()
}

/// Decodes and verifies a base58check string, returning the payload
/// (version byte + body) with the checksum stripped.
pub fn decode_check(s: &str) -> Result<Vec<u8>, CodecError> {
    let full = bs58::decode(s).into_vec().map_err(|e| CodecError::Base58(e.to_string()))?;
    if full.len() < 4 {
        return Err(CodecError::Base58("payload shorter than checksum".into()));
    }
    let (payload, checksum) = full.split_at(full.len() - 4);
    let expected = sha256d(payload);
    if checksum != &expected[..4] {
        return Err(CodecError::Base58("checksum mismatch".into()));
    }
    Ok(payload.to_vec())
}
