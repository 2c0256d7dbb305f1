//! XRPL fee estimation: the open-ledger base fee from `server_info`,
//! scaled into slow/standard/fast tiers. There's no mempool auction on
//! XRPL, just a load-based fee escalator, so these tiers are a fixed
//! multiplier over the current base fee rather than distinct percentiles.

use wallet_primitives::{Amount, ChainConfig, EngineError, FeeEstimate, FeeLevel};
use wallet_rpc::RpcCapability;

async fn base_fee_drops(rpc: &dyn RpcCapability, rpc_url: &str) -> Result<u64, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "server_info", serde_json::json!({}))
        .await
        .map_err(|e| EngineError::Rpc { method: "server_info".into(), status: None, body: e.to_string() })?;
    let fee_xrp = result["info"]["validated_ledger"]["base_fee_xrp"].as_f64().unwrap_or(0.00001);
    Ok((fee_xrp * 1_000_000.0).round() as u64)
}

pub async fn estimate(chain_config: &ChainConfig, rpc: &dyn RpcCapability) -> Result<FeeEstimate, EngineError> {
    let base = base_fee_drops(rpc, &chain_config.rpc_url).await?;
    let decimals = chain_config.native.decimals;

    Ok(FeeEstimate {
        slow: FeeLevel::from_amount(&Amount::from_u64(base), decimals),
        standard: FeeLevel::from_amount(&Amount::from_u64(base.saturating_mul(12) / 10), decimals),
        fast: FeeLevel::from_amount(&Amount::from_u64(base.saturating_mul(3) / 2), decimals),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::{ChainAlias, Ecosystem, FeatureFlags, NativeCurrency};
    use wallet_rpc::mock::MockRpc;

    fn xrpl_config() -> ChainConfig {
        ChainConfig {
            alias: ChainAlias::new("xrpl"),
            ecosystem: Ecosystem::Xrp,
            rpc_url: "http://localhost".into(),
            native: NativeCurrency { symbol: "XRP".into(), decimals: 6 },
            features: FeatureFlags::default(),
        }
    }

    #[tokio::test]
    async fn fast_is_never_below_standard_or_slow() {
        let rpc = MockRpc::new().with_response(
            "server_info",
            serde_json::json!({"info": {"validated_ledger": {"base_fee_xrp": 0.00001}}}),
        );
        let estimate = estimate(&xrpl_config(), &rpc).await.unwrap();
        let slow: u128 = estimate.slow.fee.parse().unwrap();
        let standard: u128 = estimate.standard.fee.parse().unwrap();
        let fast: u128 = estimate.fast.fee.parse().unwrap();
        assert!(fast >= standard);
        assert!(standard >= slow);
        assert_eq!(slow, 10);
    }
}
