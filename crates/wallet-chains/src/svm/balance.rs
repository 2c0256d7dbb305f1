//! Native SOL balance via `getBalance`. Solana has no reserved/frozen
//! concept at the account level (rent-exemption aside), so the full
//! balance is transferable.

use crate::svm::address;
use std::str::FromStr;
use wallet_primitives::{Amount, ChainConfig, EngineError, NativeBalance};
use wallet_rpc::RpcCapability;

pub async fn get_native_balance(chain_config: &ChainConfig, address: &str, rpc: &dyn RpcCapability) -> Result<NativeBalance, EngineError> {
    let result = rpc
        .rpc_call(&chain_config.rpc_url, "getBalance", serde_json::json!([address]))
        .await
        .map_err(|e| EngineError::Rpc { method: "getBalance".into(), status: None, body: e.to_string() })?;

    let lamports = result["value"]
        .as_u64()
        .ok_or_else(|| EngineError::Rpc { method: "getBalance".into(), status: None, body: "missing value".into() })?;
    let balance = Amount::from_u64(lamports);

    Ok(NativeBalance::new(&balance, &balance, chain_config.native.decimals))
}

/// SPL token balance: derives the owner's associated token account for
/// `mint` the same way `builder.rs` does for a token transfer, then reads
/// its balance via `getTokenAccountBalance`. An account that doesn't exist
/// yet (owner never received this token) reports zero rather than erroring.
pub async fn get_token_balance(
    chain_config: &ChainConfig,
    mint: &str,
    owner: &str,
    rpc: &dyn RpcCapability,
) -> Result<NativeBalance, EngineError> {
    let ata = address::derive_associated_token_account(owner, mint)?;
    let result = rpc
        .rpc_call(&chain_config.rpc_url, "getTokenAccountBalance", serde_json::json!([ata]))
        .await
        .map_err(|e| EngineError::Rpc { method: "getTokenAccountBalance".into(), status: None, body: e.to_string() })?;

    if result["value"].is_null() {
        return Ok(NativeBalance::new(&Amount::zero(), &Amount::zero(), 0));
    }

    let amount_str = result["value"]["amount"]
        .as_str()
        .ok_or_else(|| EngineError::Rpc { method: "getTokenAccountBalance".into(), status: None, body: "missing value.amount".into() })?;
    let decimals = result["value"]["decimals"].as_u64().unwrap_or(0) as u8;
    let balance = Amount::from_str(amount_str)?;

    Ok(NativeBalance::new(&balance, &balance, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::{ChainAlias, Ecosystem, FeatureFlags, NativeCurrency};
    use wallet_rpc::mock::MockRpc;

    fn sol_config() -> ChainConfig {
        ChainConfig {
            alias: ChainAlias::new("solana"),
            ecosystem: Ecosystem::Svm,
            rpc_url: "http://localhost".into(),
            native: NativeCurrency { symbol: "SOL".into(), decimals: 9 },
            features: FeatureFlags::default(),
        }
    }

    #[tokio::test]
    async fn full_balance_is_transferable() {
        let rpc = MockRpc::new().with_response("getBalance", serde_json::json!({ "value": 1_000_000_000u64 }));
        let balance = get_native_balance(&sol_config(), "11111111111111111111111111111111", &rpc).await.unwrap();
        assert_eq!(balance.balance, "1000000000");
        assert_eq!(balance.transferable, balance.balance);
        assert_eq!(balance.formatted_balance, "1");
    }

    #[tokio::test]
    async fn token_balance_reads_the_derived_associated_token_account() {
        let owner = "11111111111111111111111111111111";
        let mint = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
        let rpc = MockRpc::new().with_response(
            "getTokenAccountBalance",
            serde_json::json!({ "value": { "amount": "2500000", "decimals": 6 } }),
        );
        let balance = get_token_balance(&sol_config(), mint, owner, &rpc).await.unwrap();
        assert_eq!(balance.balance, "2500000");
        assert_eq!(balance.formatted_balance, "2.5");
    }

    #[tokio::test]
    async fn missing_token_account_reports_zero() {
        let owner = "11111111111111111111111111111111";
        let mint = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
        let rpc = MockRpc::new().with_response("getTokenAccountBalance", serde_json::json!({ "value": null }));
        let balance = get_token_balance(&sol_config(), mint, owner, &rpc).await.unwrap();
        assert_eq!(balance.balance, "0");
    }
}
