//! `ChainAlias`, `Ecosystem` and `ChainConfig` — an opaque chain alias
//! belonging to exactly one ecosystem, and the immutable configuration
//! that hangs off it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six ecosystems this engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Ecosystem {
    Evm,
    Svm,
    Utxo,
    Tvm,
    Xrp,
    Substrate,
}

/// An opaque string tag identifying a concrete chain (e.g. `"ethereum"`,
/// `"bitcoin"`, `"tron"`). The mapping to an [`Ecosystem`] is static and
/// total over the recognised set — see [`crate::registry`] in
/// `wallet-chains`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainAlias(String);

impl ChainAlias {
    pub fn new(alias: impl Into<String>) -> Self {
        ChainAlias(alias.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChainAlias {
    fn from(value: &str) -> Self {
        ChainAlias(value.to_string())
    }
}

impl From<String> for ChainAlias {
    fn from(value: String) -> Self {
        ChainAlias(value)
    }
}

/// `{symbol, decimals}` for a chain's native currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub symbol: String,
    pub decimals: u8,
}

/// Feature flags that change builder/sighash behaviour per chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub eip1559: bool,
    pub segwit: bool,
    pub taproot: bool,
    /// RBF on by default for UTXO chains.
    pub rbf_default: bool,
}

/// `{alias, ecosystem, rpcUrl, native, feature flags}`. Immutable after
/// construction — callers needing a different RPC URL ask the Dispatcher
/// for a new provider rather than mutating this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub alias: ChainAlias,
    pub ecosystem: Ecosystem,
    pub rpc_url: String,
    pub native: NativeCurrency,
    pub features: FeatureFlags,
}
