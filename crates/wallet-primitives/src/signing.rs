//! `SigningPayload` and `SignedTransaction` — the wire contract between the
//! engine and the remote MPC signer.

use crate::chain::ChainAlias;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SigningAlgorithm {
    Secp256k1,
    Ed25519,
}

/// `{chainAlias, data: [bytes], algorithm}`. `data` has one element per
/// UTXO input, or exactly one element for every other ecosystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPayload {
    pub chain_alias: ChainAlias,
    pub data: Vec<Vec<u8>>,
    pub algorithm: SigningAlgorithm,
}

impl SigningPayload {
    /// Wire rendering: hex strings with no `0x` prefix.
    pub fn data_hex(&self) -> Vec<String> {
        self.data.iter().map(hex::encode).collect()
    }
}

/// A single secp256k1/Ed25519 signature the MPC sidecar returns. Always
/// canonical 64-byte `r‖s` — never DER.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSignature(pub [u8; 64]);

impl RawSignature {
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 64 {
            return None;
        }
        let mut buf = [0u8; 64];
        buf.copy_from_slice(bytes);
        Some(RawSignature(buf))
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..]
    }
}

/// `{chainAlias, serialized, hash}` — produced by the applier, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub chain_alias: ChainAlias,
    pub serialized: String,
    pub hash: String,
}

/// The outcome of a broadcast attempt. A *local* failure (bad input,
/// network error reaching the node) is a thrown `EngineError`; a *remote*
/// refusal is returned here so callers can tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub success: bool,
    pub error: Option<String>,
}
