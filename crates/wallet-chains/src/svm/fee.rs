//! Prioritisation-fee estimation via `getRecentPrioritizationFees`: a
//! 25/50/75th-percentile band over the last slots' per-compute-unit fees.

use wallet_primitives::{Amount, ChainConfig, EngineError, FeeEstimate, FeeLevel};
use wallet_rpc::RpcCapability;

const BASE_SIGNATURE_FEE_LAMPORTS: u64 = 5_000;

pub async fn estimate(chain_config: &ChainConfig, rpc: &dyn RpcCapability) -> Result<FeeEstimate, EngineError> {
    let samples = rpc
        .rpc_call(&chain_config.rpc_url, "getRecentPrioritizationFees", serde_json::json!([[]]))
        .await
        .map_err(|e| EngineError::Rpc { method: "getRecentPrioritizationFees".into(), status: None, body: e.to_string() })?;

    let mut fees: Vec<u64> = samples
        .as_array()
        .map(|rows| rows.iter().filter_map(|row| row["prioritizationFee"].as_u64()).collect())
        .unwrap_or_default();
    fees.sort_unstable();

    let percentile = |p: f64| -> u64 {
        if fees.is_empty() {
            return 0;
        }
        let index = ((fees.len() as f64 - 1.0) * p).round() as usize;
        fees[index.min(fees.len() - 1)]
    };

    let decimals = chain_config.native.decimals;
    let slow = Amount::from_u64(BASE_SIGNATURE_FEE_LAMPORTS + percentile(0.25));
    let standard = Amount::from_u64(BASE_SIGNATURE_FEE_LAMPORTS + percentile(0.50));
    let fast = Amount::from_u64(BASE_SIGNATURE_FEE_LAMPORTS + percentile(0.75));

    Ok(FeeEstimate {
        slow: FeeLevel::from_amount(&slow, decimals),
        standard: FeeLevel::from_amount(&standard, decimals),
        fast: FeeLevel::from_amount(&fast, decimals),
    })
}
