//! Bitcoin address validation. Only SegWit v0 (P2WPKH) and v1 (P2TR)
//! outputs are accepted; legacy base58check (P2PKH) is rejected at build
//! time.

use bitcoin::{Address, Network};
use std::str::FromStr;
use wallet_primitives::{ChainAlias, EngineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptType {
    P2wpkh,
    P2tr,
}

/// Classifies a scriptPubKey's witness program version from its raw bytes,
/// the reverse of what [`validate`] derives from a parsed address.
pub fn classify_script_pubkey(script_pubkey: &[u8]) -> Option<ScriptType> {
    if script_pubkey.len() == 22 && script_pubkey[0] == 0x00 {
        return Some(ScriptType::P2wpkh);
    }
    if script_pubkey.len() == 34 && script_pubkey[0] == 0x51 {
        return Some(ScriptType::P2tr);
    }
    None
}

/// Validates `address` and returns its scriptPubKey bytes plus witness
/// program type. Rejects anything that isn't a bech32(m) SegWit address.
pub fn validate(chain_alias: &ChainAlias, address: &str) -> Result<(Vec<u8>, ScriptType), EngineError> {
    let parsed = Address::from_str(address)
        .map_err(|e| EngineError::invalid_address(chain_alias, address, e.to_string()))?
        .require_network(Network::Bitcoin)
        .map_err(|e| EngineError::invalid_address(chain_alias, address, e.to_string()))?;

    let script_pubkey = parsed.script_pubkey().to_bytes();

    match classify_script_pubkey(&script_pubkey) {
        Some(script_type) => Ok((script_pubkey, script_type)),
        None => Err(EngineError::invalid_address(chain_alias, address, "only SegWit v0 (P2WPKH) and v1 (P2TR) addresses are supported")),
    }
}
