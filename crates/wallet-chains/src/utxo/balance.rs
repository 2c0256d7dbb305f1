//! Native balance via Blockbook's `/api/v2/address/{address}`, the same
//! indexer convention `builder.rs` uses for UTXO set lookups.

use wallet_primitives::{Amount, ChainConfig, EngineError, NativeBalance};
use wallet_rpc::RpcCapability;

pub async fn get_native_balance(chain_config: &ChainConfig, address: &str, rpc: &dyn RpcCapability) -> Result<NativeBalance, EngineError> {
    let url = format!("{}/api/v2/address/{}", chain_config.rpc_url.trim_end_matches('/'), address);
    let bytes = rpc
        .http_get(&url)
        .await
        .map_err(|e| EngineError::Rpc { method: "address".into(), status: None, body: e.to_string() })?;
    let parsed: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| EngineError::Rpc { method: "address".into(), status: None, body: e.to_string() })?;

    let sat: u64 = parsed["balance"]
        .as_str()
        .and_then(|v| v.parse().ok())
        .or_else(|| parsed["balance"].as_u64())
        .ok_or_else(|| EngineError::Rpc { method: "address".into(), status: None, body: "missing balance".into() })?;
    let balance = Amount::from_u64(sat);

    Ok(NativeBalance::new(&balance, &balance, chain_config.native.decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::{ChainAlias, Ecosystem, FeatureFlags, NativeCurrency};
    use wallet_rpc::mock::MockRpc;

    fn btc_config() -> ChainConfig {
        ChainConfig {
            alias: ChainAlias::new("bitcoin"),
            ecosystem: Ecosystem::Utxo,
            rpc_url: "http://localhost".into(),
            native: NativeCurrency { symbol: "BTC".into(), decimals: 8 },
            features: FeatureFlags { segwit: true, ..Default::default() },
        }
    }

    #[tokio::test]
    async fn full_balance_is_transferable() {
        let rpc = MockRpc::new().with_http_response(
            "http://localhost/api/v2/address/bc1qexample",
            serde_json::to_vec(&serde_json::json!({ "balance": "100000000" })).unwrap(),
        );
        let balance = get_native_balance(&btc_config(), "bc1qexample", &rpc).await.unwrap();
        assert_eq!(balance.balance, "100000000");
        assert_eq!(balance.formatted_balance, "1");
    }
}
