//! Native XRP balance via `account_info`. The reserve XRPL holds back from
//! spending is approximated by the network's base account reserve; this
//! does not account for owned objects (trust lines, offers) that raise it.
const BASE_RESERVE_DROPS: u64 = 10_000_000;

use wallet_primitives::{Amount, ChainConfig, EngineError, NativeBalance};
use wallet_rpc::RpcCapability;

pub async fn get_native_balance(chain_config: &ChainConfig, address: &str, rpc: &dyn RpcCapability) -> Result<NativeBalance, EngineError> {
    let result = rpc
        .rpc_call(&chain_config.rpc_url, "account_info", serde_json::json!({ "account": address }))
        .await
        .map_err(|e| EngineError::Rpc { method: "account_info".into(), status: None, body: e.to_string() })?;

    let drops: u64 = result["account_data"]["Balance"]
        .as_str()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| EngineError::Rpc { method: "account_info".into(), status: None, body: "missing account_data.Balance".into() })?;
    let balance = Amount::from_u64(drops);
    let transferable = Amount::from_u64(drops.saturating_sub(BASE_RESERVE_DROPS));

    Ok(NativeBalance::new(&balance, &transferable, chain_config.native.decimals))
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
    async fn transferable_balance_excludes_the_base_reserve() {
        let rpc = MockRpc::new().with_response(
            "account_info",
            serde_json::json!({ "account_data": { "Balance": "25000000" } }),
        );
        let balance = get_native_balance(&xrpl_config(), "rExampleAddress", &rpc).await.unwrap();
        assert_eq!(balance.balance, "25000000");
        assert_eq!(balance.transferable, "15000000");
    }

    #[tokio::test]
    async fn balance_at_the_reserve_has_nothing_transferable() {
        let rpc = MockRpc::new().with_response(
            "account_info",
            serde_json::json!({ "account_data": { "Balance": "10000000" } }),
        );
        let balance = get_native_balance(&xrpl_config(), "rExampleAddress", &rpc).await.unwrap();
        assert_eq!(balance.transferable, "0");
    }
}
