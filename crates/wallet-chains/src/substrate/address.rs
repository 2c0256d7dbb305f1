//! SS58 address encoding: `base58(prefix ++ accountId32 ++ checksum)`, with
//! the checksum being the leading two bytes of `Blake2b-512("SS58PRE" ++
//! prefix ++ accountId32)`. Bittensor uses network prefix 42.

use wallet_codec::hash::blake2b_512;
use wallet_primitives::{ChainAlias, EngineError};

pub const BITTENSOR_SS58_PREFIX: u16 = 42;
const CHECKSUM_LEN: usize = 2;

fn prefix_bytes(prefix: u16) -> Vec<u8> {
    if prefix < 64 {
        vec![prefix as u8]
    } else {
        let first = ((prefix & 0b0000_0000_1111_1100) >> 2) as u8;
        let second = ((prefix >> 8) as u8) | (((prefix & 0b0000_0000_0000_0011) as u8) << 6);
        vec![first | 0b0100_0000, second]
    }
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut input = b"SS58PRE".to_vec();
    input.extend_from_slice(payload);
    let digest = blake2b_512(&input);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

pub fn encode(account_id: &[u8; 32], prefix: u16) -> String {
    let mut payload = prefix_bytes(prefix);
    payload.extend_from_slice(account_id);
    let check = checksum(&payload);
    payload.extend_from_slice(&check);
    bs58::encode(payload).into_string()
}

/// Decodes and checksum-verifies an SS58 address, returning the raw
/// 32-byte account id. Rejects addresses whose network prefix doesn't
/// match `expected_prefix`.
pub fn validate(chain_alias: &ChainAlias, address: &str, expected_prefix: u16) -> Result<[u8; 32], EngineError> {
    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|e| EngineError::invalid_address(chain_alias, address, e.to_string()))?;

    let prefix_len = prefix_bytes(expected_prefix).len();
    if decoded.len() != prefix_len + 32 + CHECKSUM_LEN {
        return Err(EngineError::invalid_address(chain_alias, address, "unexpected SS58 payload length"));
    }
    let (payload, check) = decoded.split_at(prefix_len + 32);
    if checksum(payload) != check {
        return Err(EngineError::invalid_address(chain_alias, address, "SS58 checksum mismatch"));
    }
    if payload[..prefix_len] != prefix_bytes(expected_prefix)[..] {
        return Err(EngineError::invalid_address(chain_alias, address, "unexpected SS58 network prefix"));
    }

    let mut account_id = [0u8; 32];
    account_id.copy_from_slice(&payload[prefix_len..]);
    Ok(account_id)
}
