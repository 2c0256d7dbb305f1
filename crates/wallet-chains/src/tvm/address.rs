//! Tron addresses: base58check over a 21-byte payload (`0x41` version byte
//! + 20-byte account identifier), the same checksum scheme Bitcoin legacy
//! addresses use but a different version byte.

use wallet_codec::base58;
use wallet_primitives::{ChainAlias, EngineError};

pub const TRON_ADDRESS_VERSION: u8 = 0x41;

/// Validates a base58check Tron address, returning the raw 21-byte payload
/// (version byte + 20-byte identifier) on success.
pub fn validate(chain_alias: &ChainAlias, address: &str) -> Result<Vec<u8>, EngineError> {
    let payload = base58::decode_check(address)
        .map_err(|e| EngineError::invalid_address(chain_alias, address, e.to_string()))?;
    if payload.len() != 21 {
        return Err(EngineError::invalid_address(chain_alias, address, "Tron address payload must be 21 bytes"));
    }
    if payload[0] != TRON_ADDRESS_VERSION {
        return Err(EngineError::invalid_address(chain_alias, address, "Tron address must use the 0x41 version byte"));
    }
    Ok(payload)
}

/// Renders a 20-byte account identifier as a base58check Tron address.
pub fn encode(identifier_20_bytes: &[u8]) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(TRON_ADDRESS_VERSION);
    payload.extend_from_slice(identifier_20_bytes);
    base58::encode_check(&payload)
}

/// Extracts the 20-byte account identifier (without the version byte) for
/// embedding in protobuf fields.
pub fn identifier(chain_alias: &ChainAlias, address: &str) -> Result<[u8; 20], EngineError> {
    let payload = validate(chain_alias, address)?;
    let mut out = [0u8; 20];
    out.copy_from_slice(&payload[1..]);
    Ok(out)
}

/// Renders an EVM-shaped (low 20-bytes, `0x`-prefixed) log address as a
/// Tron base58 address — used when decoding Transfer-topic logs.
pub fn from_hex_low20(hex_address: &str) -> Result<String, EngineError> {
    let stripped = hex_address.trim_start_matches("0x");
    let bytes = hex::decode(stripped).map_err(|e| EngineError::InvalidAddress {
        chain_alias: ChainAlias::new("tron"),
        address: hex_address.to_string(),
        reason: e.to_string(),
    })?;
    if bytes.len() != 20 {
        return Err(EngineError::InvalidAddress { chain_alias: ChainAlias::new("tron"), address: hex_address.to_string(), reason: "expected 20 bytes".into() });
    }
    Ok(encode(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_an_identifier_through_encode_and_validate() {
        let identifier = [0x11u8; 20];
        let address = encode(&identifier);
        let payload = validate(&ChainAlias::new("tron"), &address).unwrap();
        assert_eq!(&payload[1..], &identifier);
    }

    #[test]
    fn rejects_a_corrupted_checksum() {
        let mut address = encode(&[0x22u8; 20]);
        address.push('1');
        assert!(validate(&ChainAlias::new("tron"), &address).is_err());
    }
}
