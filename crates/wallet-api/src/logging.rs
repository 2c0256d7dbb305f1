//! Tracing initialisation, mirroring the node's API binaries:
//! `tracing_subscriber::fmt` driven by an `EnvFilter`, with an optional
//! switch to JSON lines for log aggregation.

use crate::config::WalletEngineConfig;
use tracing_subscriber::EnvFilter;

pub fn init(config: &WalletEngineConfig) {
    let env_filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter);

    let result = if config.log_json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    if let Err(err) = result {
        tracing::debug!("tracing subscriber already initialised: {err}");
    }
}
