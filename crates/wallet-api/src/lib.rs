//! The facade a host process links against: settle configuration, start
//! tracing, and hand back a [`wallet_chains::Dispatcher`] with its RPC
//! overrides already applied. Everything downstream — building
//! transactions, producing signing payloads, applying signatures,
//! decoding foreign transactions — goes through the `Dispatcher` and the
//! `Provider` it returns from [`get_chain_provider`].

pub mod config;
pub mod logging;

use std::sync::Arc;
use wallet_chains::{dispatcher::Provider, Dispatcher};
use wallet_primitives::{ChainAlias, EngineError};
use wallet_rpc::{HttpRpcCapability, RpcCapability};

pub use config::{EngineOptions, WalletEngineConfig};

/// Builds a `Dispatcher` from settled configuration: a default
/// `HttpRpcCapability` plus every `rpc_overrides` entry pinned up front via
/// `set_rpc_override`, so every subsequent [`get_chain_provider`] call
/// resolves consistently without the caller re-threading overrides.
pub fn build_dispatcher(config: &WalletEngineConfig) -> Dispatcher {
    build_dispatcher_with_rpc(config, Arc::new(HttpRpcCapability::default()))
}

pub fn build_dispatcher_with_rpc(config: &WalletEngineConfig, rpc: Arc<dyn RpcCapability>) -> Dispatcher {
    let dispatcher = Dispatcher::new(rpc);
    for override_entry in &config.rpc_overrides {
        dispatcher.set_rpc_override(&ChainAlias::new(&override_entry.alias), override_entry.url.clone());
    }
    dispatcher
}

/// The primary entry point: resolve a chain alias to its provider.
/// `rpc_url_override` takes precedence over any override baked in by
/// [`build_dispatcher`].
pub fn get_chain_provider(
    dispatcher: &Dispatcher,
    alias: &ChainAlias,
    rpc_url_override: Option<String>,
) -> Result<Provider, EngineError> {
    dispatcher.get_chain_provider(alias, rpc_url_override)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_rpc::mock::MockRpc;

    #[test]
    fn rpc_overrides_from_config_are_applied_on_build() {
        let config = WalletEngineConfig {
            log_level: "info".to_string(),
            log_json: false,
            rpc_overrides: vec![config::RpcOverride { alias: "ethereum".to_string(), url: "https://configured.example".to_string() }],
        };
        let dispatcher = build_dispatcher_with_rpc(&config, Arc::new(MockRpc::new()));
        let provider = get_chain_provider(&dispatcher, &ChainAlias::new("ethereum"), None).unwrap();
        assert_eq!(provider.chain_config().rpc_url, "https://configured.example");
    }

    #[test]
    fn caller_override_still_wins_over_configured_default() {
        let config = WalletEngineConfig {
            log_level: "info".to_string(),
            log_json: false,
            rpc_overrides: vec![config::RpcOverride { alias: "ethereum".to_string(), url: "https://configured.example".to_string() }],
        };
        let dispatcher = build_dispatcher_with_rpc(&config, Arc::new(MockRpc::new()));
        let provider = get_chain_provider(&dispatcher, &ChainAlias::new("ethereum"), Some("https://caller.example".to_string())).unwrap();
        assert_eq!(provider.chain_config().rpc_url, "https://caller.example");
    }
}
