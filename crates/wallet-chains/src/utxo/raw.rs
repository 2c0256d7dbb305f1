//! The UTXO intermediate representation: a PSBT-equivalent set of inputs
//! and outputs carrying the per-input metadata (value, scriptPubKey,
//! script type) needed to sign and finalise without a further network
//! lookup.

use super::address::ScriptType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoInput {
    /// Big-endian display-order txid (as shown by explorers and RPCs).
    pub txid: String,
    pub vout: u32,
    pub value_sat: u64,
    #[serde(skip)]
    pub script_pubkey: Vec<u8>,
    #[serde(skip)]
    pub script_type: Option<ScriptType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoOutput {
    pub address: String,
    #[serde(skip)]
    pub script_pubkey: Vec<u8>,
    pub value_sat: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoRawTx {
    pub version: u32,
    pub locktime: u32,
    pub inputs: Vec<UtxoInput>,
    pub outputs: Vec<UtxoOutput>,
    pub rbf: bool,
}

impl UtxoRawTx {
    pub fn sequence(&self) -> u32 {
        if self.rbf { 0xffff_fffd } else { 0xffff_ffff }
    }
}

/// A caller-supplied, already-selected UTXO to spend. Builders calling the
/// coin selector don't need this; it exists so `EvmOverrides`-style manual
/// input pinning is possible for UTXO too.
#[derive(Debug, Clone)]
pub struct UtxoCandidate {
    pub txid: String,
    pub vout: u32,
    pub value_sat: u64,
    pub address: String,
}

#[derive(Debug, Clone, Default)]
pub struct UtxoOverrides {
    pub fee_rate_sat_per_vb: Option<f64>,
    pub absolute_fee_sat: Option<u64>,
    pub rbf: Option<bool>,
}
