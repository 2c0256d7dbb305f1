//! EIP-1559 fee estimation via `eth_feeHistory`: a 25/50/75th-percentile
//! priority-fee reward band on top of the most recent base fee.

use wallet_primitives::{Amount, ChainConfig, EngineError, FeeEstimate, FeeLevel};
use wallet_rpc::RpcCapability;

fn percentile_reward(reward_row: &serde_json::Value, index: usize) -> Amount {
    reward_row
        .as_array()
        .and_then(|rewards| rewards.get(index))
        .and_then(|v| v.as_str())
        .and_then(|s| Amount::from_str_radix_hex(s.trim_start_matches("0x")).ok())
        .unwrap_or_else(Amount::zero)
}

pub async fn estimate(chain_config: &ChainConfig, rpc: &dyn RpcCapability) -> Result<FeeEstimate, EngineError> {
    let history = rpc
        .rpc_call(
            &chain_config.rpc_url,
            "eth_feeHistory",
            serde_json::json!([10, "latest", [25, 50, 75]]),
        )
        .await
        .map_err(|e| EngineError::Rpc { method: "eth_feeHistory".into(), status: None, body: e.to_string() })?;

    let base_fees = history["baseFeePerGas"].as_array().cloned().unwrap_or_default();
    let latest_base_fee = base_fees
        .last()
        .and_then(|v| v.as_str())
        .and_then(|s| Amount::from_str_radix_hex(s.trim_start_matches("0x")).ok())
        .unwrap_or_else(Amount::zero);

    let rewards = history["reward"].as_array().cloned().unwrap_or_default();
    let averaged_percentile = |index: usize| -> Amount {
        if rewards.is_empty() {
            return Amount::zero();
        }
        let mut total = num_bigint::BigUint::from(0u8);
        for row in &rewards {
            total += percentile_reward(row, index).as_biguint();
        }
        let count = num_bigint::BigUint::from(rewards.len() as u64);
        Amount::from_str_radix_hex(&(total / count).to_str_radix(16)).unwrap_or_else(|_| Amount::zero())
    };

    let slow_priority = averaged_percentile(0);
    let standard_priority = averaged_percentile(1);
    let fast_priority = averaged_percentile(2);

    let decimals = chain_config.native.decimals;
    let slow = latest_base_fee.checked_add(&slow_priority).unwrap_or_else(|| latest_base_fee.clone());
    let standard = latest_base_fee.checked_add(&standard_priority).unwrap_or_else(|| latest_base_fee.clone());
    let fast = latest_base_fee.checked_add(&fast_priority).unwrap_or_else(|| latest_base_fee.clone());

    Ok(FeeEstimate {
        slow: FeeLevel::from_amount(&slow, decimals),
        standard: FeeLevel::from_amount(&standard, decimals),
        fast: FeeLevel::from_amount(&fast, decimals),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::{ChainAlias, Ecosystem, FeatureFlags, NativeCurrency};
    use wallet_rpc::mock::MockRpc;

    fn eth_config() -> ChainConfig {
        ChainConfig {
            alias: ChainAlias::new("ethereum"),
            ecosystem: Ecosystem::Evm,
            rpc_url: "http://localhost".into(),
            native: NativeCurrency { symbol: "ETH".into(), decimals: 18 },
            features: FeatureFlags { eip1559: true, ..Default::default() },
        }
    }

    #[tokio::test]
    async fn fast_is_never_below_standard_or_slow() {
        let rpc = MockRpc::new().with_response(
            "eth_feeHistory",
            serde_json::json!({
                "baseFeePerGas": ["0x3b9aca00"],
                "reward": [["0x5f5e100", "0xbebc200", "0x11e1a300"]],
            }),
        );
        let estimate = estimate(&eth_config(), &rpc).await.unwrap();
        let slow: u128 = estimate.slow.fee.parse().unwrap();
        let standard: u128 = estimate.standard.fee.parse().unwrap();
        let fast: u128 = estimate.fast.fee.parse().unwrap();
        assert!(fast >= standard);
        assert!(standard >= slow);
    }
}
