//! Tron fee estimation: bandwidth cost (`size × 1000 SUN`) for slow and
//! standard, with an energy-fee top-up for a typical TRC-20 call at the
//! fast level.

use wallet_primitives::{Amount, ChainConfig, EngineError, FeeEstimate, FeeLevel};
use wallet_rpc::RpcCapability;

const BANDWIDTH_PRICE_SUN_PER_BYTE: u64 = 1_000;
const TYPICAL_TX_SIZE_BYTES: u64 = 250;
/// Energy cost of a typical TRC-20 transfer, at the chain's default
/// energy price, added on top of bandwidth for the fast tier.
const TYPICAL_TRC20_ENERGY_FEE_SUN: u64 = 14_000_000;

async fn chain_parameters(rpc: &dyn RpcCapability, rpc_url: &str) -> Result<serde_json::Value, EngineError> {
    let url = format!("{}/wallet/getchainparameters", rpc_url.trim_end_matches('/'));
    let bytes = rpc
        .http_get(&url)
        .await
        .map_err(|e| EngineError::Rpc { method: "getchainparameters".into(), status: None, body: e.to_string() })?;
    serde_json::from_slice(&bytes).map_err(|e| EngineError::Rpc { method: "getchainparameters".into(), status: None, body: e.to_string() })
}

pub async fn estimate(chain_config: &ChainConfig, rpc: &dyn RpcCapability) -> Result<FeeEstimate, EngineError> {
    let energy_fee_sun = chain_parameters(rpc, &chain_config.rpc_url)
        .await
        .ok()
        .and_then(|params| {
            params["chainParameter"].as_array().and_then(|entries| {
                entries
                    .iter()
                    .find(|e| e["key"].as_str() == Some("getEnergyFee"))
                    .and_then(|e| e["value"].as_u64())
            })
        })
        .unwrap_or(TYPICAL_TRC20_ENERGY_FEE_SUN);

    let bandwidth_fee = TYPICAL_TX_SIZE_BYTES * BANDWIDTH_PRICE_SUN_PER_BYTE;
    let decimals = chain_config.native.decimals;

    Ok(FeeEstimate {
        slow: FeeLevel::from_amount(&Amount::from_u64(bandwidth_fee), decimals),
        standard: FeeLevel::from_amount(&Amount::from_u64(bandwidth_fee), decimals),
        fast: FeeLevel::from_amount(&Amount::from_u64(bandwidth_fee + energy_fee_sun), decimals),
    })
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
    async fn fast_is_never_below_standard_or_slow() {
        let rpc = MockRpc::new();
        let estimate = estimate(&tron_config(), &rpc).await.unwrap();
        let slow: u128 = estimate.slow.fee.parse().unwrap();
        let standard: u128 = estimate.standard.fee.parse().unwrap();
        let fast: u128 = estimate.fast.fee.parse().unwrap();
        assert!(fast >= standard);
        assert!(standard >= slow);
    }
}
