//! Process configuration: command-line flags layered over a TOML file over
//! built-in defaults, the same `clap::Parser` + `config::Config` stack the
//! node's API binaries use for their settings structs.

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Parser, Debug, Clone, Default)]
#[clap(version, about = "Multi-chain transaction engine")]
pub struct EngineOptions {
    #[clap(long, help = "Path to a TOML config file layered over the built-in defaults.")]
    pub config_file: Option<String>,

    #[clap(long, help = "Override the RPC endpoint for a single chain, e.g. --rpc-override ethereum=https://...")]
    pub rpc_override: Vec<String>,

    #[clap(long, default_value = "info", help = "The tracing env-filter directive, e.g. \"info\" or \"wallet_chains=debug\".")]
    pub log_level: String,

    #[clap(long, help = "Emit logs as JSON lines instead of the human-readable format.")]
    pub log_json: bool,
}

/// Settled engine configuration: the env-filter directive, whether to emit
/// JSON logs, and a set of `alias=url` RPC endpoint overrides applied to
/// the [`wallet_chains::Dispatcher`] at startup.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WalletEngineConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,
    #[serde(default)]
    pub rpc_overrides: Vec<RpcOverride>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcOverride {
    pub alias: String,
    pub url: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl WalletEngineConfig {
    /// Merges, in increasing priority: built-in defaults, an optional TOML
    /// file, `WALLET_ENGINE__*` environment variables, and command-line
    /// flags.
    pub fn load(opts: &EngineOptions) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("log_level", default_log_level())?
            .set_default("log_json", false)?;

        if let Some(path) = &opts.config_file {
            builder = builder.add_source(File::with_name(path));
        }

        builder = builder.add_source(Environment::with_prefix("WALLET_ENGINE").separator("__"));

        if !opts.log_level.is_empty() {
            builder = builder.set_override("log_level", opts.log_level.clone())?;
        }
        if opts.log_json {
            builder = builder.set_override("log_json", true)?;
        }

        let mut config: WalletEngineConfig = builder.build()?.try_deserialize()?;

        for entry in &opts.rpc_override {
            let (alias, url) = entry.split_once('=').ok_or_else(|| {
                ConfigError::Message(format!("--rpc-override expects alias=url, got \"{entry}\""))
            })?;
            config.rpc_overrides.push(RpcOverride { alias: alias.to_string(), url: url.to_string() });
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_rpc_overrides_are_parsed() {
        let opts = EngineOptions {
            config_file: None,
            rpc_override: vec!["ethereum=https://example.com".to_string()],
            log_level: "info".to_string(),
            log_json: false,
        };
        let config = WalletEngineConfig::load(&opts).unwrap();
        assert_eq!(config.rpc_overrides.len(), 1);
        assert_eq!(config.rpc_overrides[0].alias, "ethereum");
        assert_eq!(config.rpc_overrides[0].url, "https://example.com");
    }

    #[test]
    fn malformed_rpc_override_is_rejected() {
        let opts = EngineOptions {
            config_file: None,
            rpc_override: vec!["not-a-kv-pair".to_string()],
            log_level: "info".to_string(),
            log_json: false,
        };
        assert!(WalletEngineConfig::load(&opts).is_err());
    }

    #[test]
    fn defaults_apply_with_no_overrides() {
        let opts = EngineOptions::default();
        let config = WalletEngineConfig::load(&opts).unwrap();
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert!(config.rpc_overrides.is_empty());
    }
}
