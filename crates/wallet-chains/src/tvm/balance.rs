//! Native TRX balance via `POST /wallet/getaccount`.

use crate::tvm::address;
use wallet_primitives::{Amount, ChainConfig, EngineError, NativeBalance};
use wallet_rpc::RpcCapability;

pub async fn get_native_balance(chain_config: &ChainConfig, address: &str, rpc: &dyn RpcCapability) -> Result<NativeBalance, EngineError> {
    let url = format!("{}/wallet/getaccount", chain_config.rpc_url.trim_end_matches('/'));
    let body = serde_json::to_vec(&serde_json::json!({ "address": address, "visible": true })).unwrap_or_default();
    let bytes = rpc
        .http_post(&url, body, "application/json")
        .await
        .map_err(|e| EngineError::Rpc { method: "getaccount".into(), status: None, body: e.to_string() })?;
    let parsed: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| EngineError::Rpc { method: "getaccount".into(), status: None, body: e.to_string() })?;

    let sun = parsed["balance"].as_u64().unwrap_or(0);
    let balance = Amount::from_u64(sun);

    Ok(NativeBalance::new(&balance, &balance, chain_config.native.decimals))
}

/// TRC-20 balance via `wallet/triggerconstantcontract`, the read-only
/// simulation endpoint TronGrid exposes for calls that don't need to be
/// broadcast. `balanceOf(address)` shares ERC-20's selector.
pub async fn get_token_balance(
    chain_config: &ChainConfig,
    token_contract: &str,
    owner: &str,
    decimals: u8,
    rpc: &dyn RpcCapability,
) -> Result<NativeBalance, EngineError> {
    let owner_identifier = address::identifier(&chain_config.alias, owner)?;
    let mut parameter = Vec::with_capacity(32);
    parameter.extend(std::iter::repeat(0u8).take(12));
    parameter.extend_from_slice(&owner_identifier);

    let url = format!("{}/wallet/triggerconstantcontract", chain_config.rpc_url.trim_end_matches('/'));
    let body = serde_json::to_vec(&serde_json::json!({
        "owner_address": owner,
        "contract_address": token_contract,
        "function_selector": "balanceOf(address)",
        "parameter": hex::encode(&parameter),
        "visible": true,
    }))
    .unwrap_or_default();
    let bytes = rpc
        .http_post(&url, body, "application/json")
        .await
        .map_err(|e| EngineError::Rpc { method: "triggerconstantcontract".into(), status: None, body: e.to_string() })?;
    let parsed: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| EngineError::Rpc { method: "triggerconstantcontract".into(), status: None, body: e.to_string() })?;

    let hex_value = parsed["constant_result"][0]
        .as_str()
        .ok_or_else(|| EngineError::Rpc { method: "triggerconstantcontract".into(), status: None, body: "missing constant_result".into() })?;
    let balance = Amount::from_str_radix_hex(hex_value)
        .map_err(|_| EngineError::InvalidAmount { reason: format!("malformed hex balance {hex_value}") })?;

    Ok(NativeBalance::new(&balance, &balance, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::{ChainAlias, Ecosystem, FeatureFlags, NativeCurrency};
    use wallet_rpc::mock::MockRpc;

    fn tron_config() -> ChainConfig {
        ChainConfig {
            alias: ChainAlias::new("tron"),
            ecosystem: Ecosystem::Tvm,
            rpc_url: "http://localhost".into(),
            native: NativeCurrency { symbol: "TRX".into(), decimals: 6 },
            features: FeatureFlags::default(),
        }
    }

    #[tokio::test]
    async fn account_with_no_history_has_zero_balance() {
        let rpc = MockRpc::new().with_http_response(
            "http://localhost/wallet/getaccount",
            serde_json::to_vec(&serde_json::json!({})).unwrap(),
        );
        let balance = get_native_balance(&tron_config(), "TJCnKsPa7y5okkXvQAidZBzqx3QyQ6sxMW", &rpc).await.unwrap();
        assert_eq!(balance.balance, "0");
    }

    #[tokio::test]
    async fn funded_account_reports_balance_in_trx() {
        let rpc = MockRpc::new().with_http_response(
            "http://localhost/wallet/getaccount",
            serde_json::to_vec(&serde_json::json!({ "balance": 1_500_000u64 })).unwrap(),
        );
        let balance = get_native_balance(&tron_config(), "TJCnKsPa7y5okkXvQAidZBzqx3QyQ6sxMW", &rpc).await.unwrap();
        assert_eq!(balance.formatted_balance, "1.5");
    }

    #[tokio::test]
    async fn trc20_balance_is_scaled_by_token_decimals() {
        let rpc = MockRpc::new().with_http_response(
            "http://localhost/wallet/triggerconstantcontract",
            serde_json::to_vec(&serde_json::json!({
                "constant_result": ["0000000000000000000000000000000000000000000000000000000000004240"]
            }))
            .unwrap(),
        );
        let balance = get_token_balance(
            &tron_config(),
            "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t",
            "TJCnKsPa7y5okkXvQAidZBzqx3QyQ6sxMW",
            6,
            &rpc,
        )
        .await
        .unwrap();
        assert_eq!(balance.balance, "16960");
        assert_eq!(balance.formatted_balance, "0.01696");
    }
}
