//! The Chain Registry: a static, total mapping from [`ChainAlias`] to
//! [`ChainConfig`]. Ecosystems are selected at runtime by an opaque alias
//! string, so a `once_cell::sync::Lazy` static map stands in for the
//! compile-time chain/ecosystem binding a statically-typed runtime would use.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use wallet_primitives::{ChainAlias, ChainConfig, EngineError, Ecosystem, FeatureFlags, NativeCurrency};

fn config(alias: &str, ecosystem: Ecosystem, rpc_url: &str, symbol: &str, decimals: u8, features: FeatureFlags) -> ChainConfig {
    ChainConfig {
        alias: ChainAlias::new(alias),
        ecosystem,
        rpc_url: rpc_url.to_string(),
        native: NativeCurrency { symbol: symbol.to_string(), decimals },
        features,
    }
}

static DEFAULT_REGISTRY: Lazy<HashMap<String, ChainConfig>> = Lazy::new(|| {
    let mut m = HashMap::new();
    let insert = |m: &mut HashMap<String, ChainConfig>, c: ChainConfig| {
        m.insert(c.alias.as_str().to_string(), c);
    };

    insert(&mut m, config(
        "ethereum", Ecosystem::Evm, "https://eth.public-rpc.com", "ETH", 18,
        FeatureFlags { eip1559: true, ..Default::default() },
    ));
    insert(&mut m, config(
        "ethereum-legacy", Ecosystem::Evm, "https://eth.public-rpc.com", "ETH", 18,
        FeatureFlags::default(),
    ));
    insert(&mut m, config(
        "solana", Ecosystem::Svm, "https://api.mainnet-beta.solana.com", "SOL", 9,
        FeatureFlags::default(),
    ));
    insert(&mut m, config(
        "bitcoin", Ecosystem::Utxo, "https://bitcoin.public-rpc.com", "BTC", 8,
        FeatureFlags { segwit: true, taproot: true, rbf_default: true, ..Default::default() },
    ));
    insert(&mut m, config(
        "tron", Ecosystem::Tvm, "https://api.trongrid.io", "TRX", 6,
        FeatureFlags::default(),
    ));
    insert(&mut m, config(
        "xrpl", Ecosystem::Xrp, "https://xrplcluster.com", "XRP", 6,
        FeatureFlags::default(),
    ));
    insert(&mut m, config(
        "bittensor", Ecosystem::Substrate, "https://entrypoint-finney.opentensor.ai", "TAO", 9,
        FeatureFlags::default(),
    ));

    m
});

/// Looks up a chain's static configuration. Fails with
/// `UnsupportedChainError` for any alias outside the recognised set: the
/// mapping is static and total over that set, never partial.
pub fn lookup(alias: &ChainAlias) -> Result<ChainConfig, EngineError> {
    DEFAULT_REGISTRY
        .get(alias.as_str())
        .cloned()
        .ok_or_else(|| EngineError::UnsupportedChain { alias: alias.as_str().to_string() })
}

pub fn ecosystem_of(alias: &ChainAlias) -> Result<Ecosystem, EngineError> {
    lookup(alias).map(|c| c.ecosystem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_aliases_resolve() {
        assert_eq!(ecosystem_of(&ChainAlias::new("bitcoin")).unwrap(), Ecosystem::Utxo);
        assert_eq!(ecosystem_of(&ChainAlias::new("tron")).unwrap(), Ecosystem::Tvm);
        assert_eq!(ecosystem_of(&ChainAlias::new("bittensor")).unwrap(), Ecosystem::Substrate);
    }

    #[test]
    fn unknown_alias_is_unsupported_chain() {
        assert!(matches!(lookup(&ChainAlias::new("dogecoin")), Err(EngineError::UnsupportedChain { .. })));
    }
}
