//! Native ETH balance via `eth_getBalance`. EVM has no reserved/frozen
//! concept, so the full balance is transferable.

use wallet_primitives::{Amount, ChainConfig, EngineError, NativeBalance};
use wallet_rpc::RpcCapability;

const ERC20_BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

pub async fn get_native_balance(chain_config: &ChainConfig, address: &str, rpc: &dyn RpcCapability) -> Result<NativeBalance, EngineError> {
    let result = rpc
        .rpc_call(&chain_config.rpc_url, "eth_getBalance", serde_json::json!([address, "latest"]))
        .await
        .map_err(|e| EngineError::Rpc { method: "eth_getBalance".into(), status: None, body: e.to_string() })?;

    let hex = result.as_str().ok_or_else(|| EngineError::Rpc { method: "eth_getBalance".into(), status: None, body: "non-string balance".into() })?;
    let balance = Amount::from_str_radix_hex(hex.trim_start_matches("0x"))
        .map_err(|_| EngineError::InvalidAmount { reason: format!("malformed hex balance {hex}") })?;

    Ok(NativeBalance::new(&balance, &balance, chain_config.native.decimals))
}

/// ERC-20 balance via `eth_call` to `balanceOf(address)`; no reserved
/// concept at the token level either.
pub async fn get_token_balance(
    chain_config: &ChainConfig,
    token_contract: &str,
    owner: &str,
    decimals: u8,
    rpc: &dyn RpcCapability,
) -> Result<NativeBalance, EngineError> {
    let owner_bytes = hex::decode(owner.trim_start_matches("0x"))
        .map_err(|e| EngineError::InvalidAddress { chain_alias: chain_config.alias.clone(), address: owner.to_string(), reason: e.to_string() })?;
    let mut data = Vec::with_capacity(4 + 32);
    data.extend_from_slice(&ERC20_BALANCE_OF_SELECTOR);
    data.extend(std::iter::repeat(0u8).take(32 - owner_bytes.len()));
    data.extend_from_slice(&owner_bytes);

    let call = serde_json::json!({ "to": token_contract, "data": format!("0x{}", hex::encode(&data)) });
    let result = rpc
        .rpc_call(&chain_config.rpc_url, "eth_call", serde_json::json!([call, "latest"]))
        .await
        .map_err(|e| EngineError::Rpc { method: "eth_call".into(), status: None, body: e.to_string() })?;

    let hex_value = result.as_str().ok_or_else(|| EngineError::Rpc { method: "eth_call".into(), status: None, body: "non-string result".into() })?;
    let balance = Amount::from_str_radix_hex(hex_value.trim_start_matches("0x"))
        .map_err(|_| EngineError::InvalidAmount { reason: format!("malformed hex balance {hex_value}") })?;

    Ok(NativeBalance::new(&balance, &balance, decimals))
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
    async fn full_balance_is_transferable() {
        let rpc = MockRpc::new().with_response("eth_getBalance", serde_json::json!("0xde0b6b3a7640000"));
        let balance = get_native_balance(&eth_config(), "0x00000000000000000000000000000000000000", &rpc).await.unwrap();
        assert_eq!(balance.balance, "1000000000000000000");
        assert_eq!(balance.transferable, balance.balance);
        assert_eq!(balance.formatted_balance, "1");
    }

    #[tokio::test]
    async fn erc20_balance_is_scaled_by_token_decimals() {
        let rpc = MockRpc::new().with_response("eth_call", serde_json::json!("0x00000000000000000000000000000000000000000000000000000000004240"));
        let balance = get_token_balance(
            &eth_config(),
            "0x0000000000000000000000000000000000000000",
            "0x00000000000000000000000000000000000000aa",
            6,
            &rpc,
        )
        .await
        .unwrap();
        assert_eq!(balance.balance, "16960");
        assert_eq!(balance.formatted_balance, "0.01696");
    }
}
