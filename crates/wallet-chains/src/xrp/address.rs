//! XRPL classic addresses: base58check over the same SHA-256d checksum
//! scheme Bitcoin/Tron use, but XRPL's own reordered alphabet
//! ("base58-xrpl") and a `0x00` version byte.

use once_cell::sync::Lazy;
use wallet_primitives::{ChainAlias, EngineError};

const XRPL_ALPHABET_STR: &[u8; 58] = b"rpshnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCg65jkm8oFqi1tuvAxyz";
const CLASSIC_ADDRESS_VERSION: u8 = 0x00;

static XRPL_ALPHABET: Lazy<bs58::Alphabet> = Lazy::new(|| bs58::Alphabet::new(XRPL_ALPHABET_STR).expect("valid 58-byte alphabet"));

/// Validates an XRPL classic address, returning the 20-byte account ID.
pub fn validate(chain_alias: &ChainAlias, address: &str) -> Result<[u8; 20], EngineError> {
    let payload = bs58::decode(address)
        .with_alphabet(&XRPL_ALPHABET)
        .with_check(Some(CLASSIC_ADDRESS_VERSION))
        .into_vec()
        .map_err(|e| EngineError::invalid_address(chain_alias, address, e.to_string()))?;
    if payload.len() != 21 {
        return Err(EngineError::invalid_address(chain_alias, address, "XRPL address payload must be 21 bytes"));
    }
    let mut account_id = [0u8; 20];
    account_id.copy_from_slice(&payload[1..]);
    Ok(account_id)
}

/// Renders a 20-byte account ID as an XRPL classic address.
pub fn encode(account_id: &[u8; 20]) -> String {
    bs58::encode(account_id).with_alphabet(&XRPL_ALPHABET).with_check_version(CLASSIC_ADDRESS_VERSION).into_string()
}
