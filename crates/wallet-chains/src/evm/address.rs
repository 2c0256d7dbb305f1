//! EVM address validation, normalisation, and EIP-55 checksum encoding.

use wallet_codec::hash::keccak256;
use wallet_primitives::{ChainAlias, EngineError};

/// Lower-cases and validates a `0x` + 40 hex-char address. Checksum form is
/// accepted as input but never required.
pub fn normalise(chain_alias: &ChainAlias, address: &str) -> Result<String, EngineError> {
    let stripped = address.strip_prefix("0x").ok_or_else(|| {
        EngineError::invalid_address(chain_alias, address, "missing 0x prefix")
    })?;
    if stripped.len() != 40 || !stripped.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(EngineError::invalid_address(chain_alias, address, "expected 40 hex chars after 0x"));
    }
    Ok(format!("0x{}", stripped.to_lowercase()))
}

/// Computes the EIP-55 mixed-case checksum form of a lowercase `0x` address.
pub fn to_checksum(lowercase_address: &str) -> String {
    let hex_part = lowercase_address.trim_start_matches("0x");
    let digest = keccak256(hex_part.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in hex_part.chars().enumerate() {
        if c.is_ascii_digit() {
            out.push(c);
            continue;
        }
        // nibble i of the keccak digest of the lowercase hex string
        let nibble = if i % 2 == 0 { digest[i / 2] >> 4 } else { digest[i / 2] & 0x0f };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Derives a contract address from a deployer address + nonce:
/// `keccak256(rlp([sender, nonce]))[-20:]`.
pub fn derive_contract_address(sender: &str, nonce: u64) -> Result<String, EngineError> {
    let sender_bytes = hex::decode(sender.trim_start_matches("0x"))
        .map_err(|e| EngineError::InvalidAddress { chain_alias: ChainAlias::new("evm"), address: sender.to_string(), reason: e.to_string() })?;
    let mut stream = rlp::RlpStream::new_list(2);
    stream.append(&sender_bytes);
    stream.append(&nonce);
    let digest = keccak256(&stream.out());
    Ok(format!("0x{}", hex::encode(&digest[12..])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_matches_eip55_reference_vector() {
        // Reference vector from EIP-55.
        assert_eq!(
            to_checksum("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn rejects_missing_prefix_and_wrong_length() {
        let chain = ChainAlias::new("ethereum");
        assert!(normalise(&chain, "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_err());
        assert!(normalise(&chain, "0x5aaeb605").is_err());
    }
}
