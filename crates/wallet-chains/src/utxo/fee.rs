//! Fee-rate estimation via `estimatesmartfee` at three confirmation
//! targets, falling back to an indexer's fee-bands endpoint when the node
//! RPC is unavailable (pruned nodes, light indexers).

use wallet_primitives::{Amount, ChainConfig, EngineError, FeeEstimate, FeeLevel};
use wallet_rpc::RpcCapability;

const SLOW_TARGET_BLOCKS: u64 = 25;
const STANDARD_TARGET_BLOCKS: u64 = 6;
const FAST_TARGET_BLOCKS: u64 = 2;
/// Typical single-input, two-output P2WPKH transaction size, for turning a
/// sat/vB rate into an absolute fee level.
const TYPICAL_VSIZE: u64 = 141;

async fn smart_fee_rate(rpc: &dyn RpcCapability, rpc_url: &str, target_blocks: u64) -> Result<f64, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "estimatesmartfee", serde_json::json!([target_blocks]))
        .await
        .map_err(|e| EngineError::Rpc { method: "estimatesmartfee".into(), status: None, body: e.to_string() })?;
    let btc_per_kvb = result["feerate"].as_f64().unwrap_or(0.00001);
    Ok((btc_per_kvb * 100_000_000.0 / 1000.0).max(1.0))
}

async fn indexer_fee_bands(rpc: &dyn RpcCapability, rpc_url: &str) -> Result<(f64, f64, f64), EngineError> {
    let url = format!("{}/api/v1/fees", rpc_url.trim_end_matches('/'));
    let bytes = rpc
        .http_get(&url)
        .await
        .map_err(|e| EngineError::Rpc { method: "fee_bands".into(), status: None, body: e.to_string() })?;
    let parsed: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| EngineError::Rpc { method: "fee_bands".into(), status: None, body: e.to_string() })?;
    let slow = parsed["slowFeePerVbyte"].as_f64().unwrap_or(1.0);
    let standard = parsed["standardFeePerVbyte"].as_f64().unwrap_or(slow);
    let fast = parsed["fastFeePerVbyte"].as_f64().unwrap_or(standard);
    Ok((slow, standard, fast))
}

pub async fn estimate(chain_config: &ChainConfig, rpc: &dyn RpcCapability) -> Result<FeeEstimate, EngineError> {
    let rates = async {
        let slow = smart_fee_rate(rpc, &chain_config.rpc_url, SLOW_TARGET_BLOCKS).await?;
        let standard = smart_fee_rate(rpc, &chain_config.rpc_url, STANDARD_TARGET_BLOCKS).await?;
        let fast = smart_fee_rate(rpc, &chain_config.rpc_url, FAST_TARGET_BLOCKS).await?;
        Ok::<_, EngineError>((slow, standard, fast))
    }
    .await;

    let (slow_rate, standard_rate, fast_rate) = match rates {
        Ok(rates) => rates,
        Err(_) => indexer_fee_bands(rpc, &chain_config.rpc_url).await?,
    };

    let decimals = chain_config.native.decimals;
    let level = |rate: f64| -> FeeLevel {
        let sat = (rate * TYPICAL_VSIZE as f64).ceil() as u64;
        FeeLevel::from_amount(&Amount::from_u64(sat), decimals)
    };

    Ok(FeeEstimate { slow: level(slow_rate), standard: level(standard_rate), fast: level(fast_rate) })
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
            features: FeatureFlags { segwit: true, taproot: true, rbf_default: true, ..Default::default() },
        }
    }

    #[tokio::test]
    async fn fast_is_never_below_standard_or_slow() {
        let rpc = MockRpc::new().with_response("estimatesmartfee", serde_json::json!({"feerate": 0.00002}));
        let estimate = estimate(&btc_config(), &rpc).await.unwrap();
        let slow: u128 = estimate.slow.fee.parse().unwrap();
        let standard: u128 = estimate.standard.fee.parse().unwrap();
        let fast: u128 = estimate.fast.fee.parse().unwrap();
        assert!(fast >= standard);
        assert!(standard >= slow);
    }

    #[tokio::test]
    async fn falls_back_to_indexer_fee_bands_when_the_node_rpc_fails() {
        let rpc = MockRpc::new().with_http_response(
            "http://localhost/api/v1/fees",
            serde_json::to_vec(&serde_json::json!({"slowFeePerVbyte": 1.0, "standardFeePerVbyte": 5.0, "fastFeePerVbyte": 10.0})).unwrap(),
        );
        let estimate = estimate(&btc_config(), &rpc).await.unwrap();
        assert!(estimate.fast.fee.parse::<u128>().unwrap() > estimate.slow.fee.parse::<u128>().unwrap());
    }
}
