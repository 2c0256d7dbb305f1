//! Classifies a Substrate extrinsic. There's no native "get extrinsic by
//! hash" JSON-RPC method, so this queries a Subscan-style indexer
//! (`POST {rpc_url}/api/scan/extrinsic`) rather than the node directly.

use std::str::FromStr;
use wallet_primitives::{
    Amount, ChainConfig, EngineError, NormalisedMetadata, NormalisedTransaction, TransactionType,
};
use wallet_rpc::RpcCapability;

async fn fetch_extrinsic(rpc: &dyn RpcCapability, rpc_url: &str, tx_hash: &str) -> Result<serde_json::Value, EngineError> {
    let url = format!("{}/api/scan/extrinsic", rpc_url.trim_end_matches('/'));
    let body = serde_json::to_vec(&serde_json::json!({ "hash": tx_hash })).unwrap_or_default();
    let bytes = rpc
        .http_post(&url, body, "application/json")
        .await
        .map_err(|e| EngineError::Rpc { method: "api/scan/extrinsic".into(), status: None, body: e.to_string() })?;
    let parsed: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| EngineError::Rpc { method: "api/scan/extrinsic".into(), status: None, body: e.to_string() })?;
    if parsed["data"].is_null() {
        return Err(EngineError::TransactionNotFound(tx_hash.to_string()));
    }
    Ok(parsed["data"].clone())
}

fn find_param(params: &serde_json::Value, name: &str) -> Option<String> {
    params.as_array()?.iter().find(|p| p["name"].as_str() == Some(name))?["value"].as_str().map(str::to_string)
}

pub async fn decode(
    chain_config: &ChainConfig,
    tx_hash: &str,
    rpc: &dyn RpcCapability,
) -> Result<NormalisedTransaction, EngineError> {
    let data = fetch_extrinsic(rpc, &chain_config.rpc_url, tx_hash).await?;

    let call_module = data["call_module"].as_str().unwrap_or("").to_lowercase();
    let call_function = data["call_module_function"].as_str().unwrap_or("").to_lowercase();
    let params = &data["params"];

    let (tx_type, to, value) = if call_module == "balances" && call_function.contains("transfer") {
        let dest = find_param(params, "dest").or_else(|| find_param(params, "Dest"));
        let amount = find_param(params, "value")
            .or_else(|| find_param(params, "Value"))
            .and_then(|s| Amount::from_str(&s).ok())
            .unwrap_or_else(Amount::zero);
        (TransactionType::NativeTransfer, dest, amount)
    } else {
        (TransactionType::Unknown, None, Amount::zero())
    };

    let from = data["account_id"].as_str().unwrap_or("").to_string();
    let status = data["success"].as_bool().map(|ok| if ok { "success".to_string() } else { "failed".to_string() });
    let fee = data["fee"].as_str().map(str::to_string);

    Ok(NormalisedTransaction {
        chain_alias: chain_config.alias.clone(),
        tx_type,
        from,
        to,
        value: value.to_decimal_string(),
        formatted_value: value.format_with_decimals(chain_config.native.decimals),
        symbol: chain_config.native.symbol.clone(),
        fee,
        metadata: NormalisedMetadata::default(),
        token_transfers: vec![],
        internal_transactions: vec![],
        status,
        block_number: data["block_num"].as_u64(),
        timestamp: data["block_timestamp"].as_u64(),
        confirmations: None,
        finalized: data["finalized"].as_bool(),
    })
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
    async fn balances_transfer_decodes_as_native_transfer() {
        let rpc = MockRpc::new().with_http_response(
            "http://localhost/api/scan/extrinsic",
            serde_json::to_vec(&serde_json::json!({
                "data": {
                    "call_module": "Balances",
                    "call_module_function": "transfer_keep_alive",
                    "account_id": "5Sender",
                    "success": true,
                    "params": [
                        {"name": "dest", "value": "5Recipient"},
                        {"name": "value", "value": "1000000000"},
                    ],
                }
            }))
            .unwrap(),
        );
        let decoded = decode(&bittensor_config(), "0xabc", &rpc).await.unwrap();
        assert_eq!(decoded.tx_type, TransactionType::NativeTransfer);
        assert_eq!(decoded.to.as_deref(), Some("5Recipient"));
        assert_eq!(decoded.value, "1000000000");
    }
}
