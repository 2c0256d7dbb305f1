//! Native balance via a Subscan-style indexer (`POST {rpc_url}/api/scan/account`),
//! the same convention `decoder.rs` uses for extrinsic lookups since there's
//! no native "get account balance" JSON-RPC method on a bare node.

use std::str::FromStr;
use wallet_primitives::{Amount, ChainConfig, EngineError, NativeBalance};
use wallet_rpc::RpcCapability;

pub async fn get_native_balance(chain_config: &ChainConfig, address: &str, rpc: &dyn RpcCapability) -> Result<NativeBalance, EngineError> {
    let url = format!("{}/api/scan/account", chain_config.rpc_url.trim_end_matches('/'));
    let body = serde_json::to_vec(&serde_json::json!({ "key": address })).unwrap_or_default();
    let bytes = rpc
        .http_post(&url, body, "application/json")
        .await
        .map_err(|e| EngineError::Rpc { method: "api/scan/account".into(), status: None, body: e.to_string() })?;
    let parsed: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| EngineError::Rpc { method: "api/scan/account".into(), status: None, body: e.to_string() })?;

    let account = &parsed["data"]["account"];
    let free: u128 = account["balance"].as_str().and_then(|s| s.parse().ok()).unwrap_or(0);
    let frozen: u128 = account["frozen"].as_str().and_then(|s| s.parse().ok()).unwrap_or(0);

    let balance = Amount::from_str(&free.to_string())
        .map_err(|_| EngineError::InvalidAmount { reason: "malformed free balance".into() })?;
    let transferable_raw = free.saturating_sub(frozen);
    let transferable = Amount::from_str(&transferable_raw.to_string())
        .map_err(|_| EngineError::InvalidAmount { reason: "malformed transferable balance".into() })?;

    Ok(NativeBalance::new(&balance, &transferable, chain_config.native.decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::{ChainAlias, Ecosystem, FeatureFlags, NativeCurrency};
    use wallet_rpc::mock::MockRpc;

    fn bittensor_config() -> ChainConfig {
        ChainConfig {
            alias: ChainAlias::new("bittensor"),
            ecosystem: Ecosystem::Substrate,
            rpc_url: "http://localhost".into(),
            native: NativeCurrency { symbol: "TAO".into(), decimals: 9 },
            features: FeatureFlags::default(),
        }
    }

    #[tokio::test]
    async fn free_balance_with_nothing_frozen_is_fully_transferable() {
        let rpc = MockRpc::new().with_http_response(
            "http://localhost/api/scan/account",
            serde_json::to_vec(&serde_json::json!({
                "data": { "account": { "balance": "100000000000", "frozen": "0" } }
            }))
            .unwrap(),
        );
        let balance = get_native_balance(&bittensor_config(), "5Example", &rpc).await.unwrap();
        assert_eq!(balance.formatted_balance, "100");
        assert_eq!(balance.transferable, "100000000000");
    }

    #[tokio::test]
    async fn frozen_balance_reduces_transferable() {
        let rpc = MockRpc::new().with_http_response(
            "http://localhost/api/scan/account",
            serde_json::to_vec(&serde_json::json!({
                "data": { "account": { "balance": "100000000000", "frozen": "40000000000" } }
            }))
            .unwrap(),
        );
        let balance = get_native_balance(&bittensor_config(), "5Example", &rpc).await.unwrap();
        assert_eq!(balance.balance, "100000000000");
        assert_eq!(balance.transferable, "60000000000");
    }
}
