//! Assembles an [`EvmRawTx`] from a [`TransferIntent`], filling in nonce and
//! gas pricing from the network unless the caller pins them via
//! [`EvmOverrides`].

use super::raw::{EvmOverrides, EvmRawTx};
use wallet_primitives::{Amount, ChainAlias, ChainConfig, EngineError, TransferIntent};
use wallet_rpc::RpcCapability;

const NATIVE_TRANSFER_GAS: u64 = 21_000;
const TOKEN_TRANSFER_GAS: u64 = 65_000;
const CONTRACT_CALL_GAS: u64 = 200_000;
const ERC20_TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

async fn fetch_nonce(rpc: &dyn RpcCapability, rpc_url: &str, address: &str) -> Result<u64, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "eth_getTransactionCount", serde_json::json!([address, "pending"]))
        .await
        .map_err(|e| EngineError::Rpc { method: "eth_getTransactionCount".into(), status: None, body: e.to_string() })?;
    let hex_str = result.as_str().ok_or_else(|| EngineError::Rpc {
        method: "eth_getTransactionCount".into(), status: None, body: "expected hex string".into(),
    })?;
    u64::from_str_radix(hex_str.trim_start_matches("0x"), 16)
        .map_err(|e| EngineError::Rpc { method: "eth_getTransactionCount".into(), status: None, body: e.to_string() })
}

struct FeeParams {
    gas_price: Option<Amount>,
    max_fee_per_gas: Option<Amount>,
    max_priority_fee_per_gas: Option<Amount>,
}

async fn fetch_fee_params(
    rpc: &dyn RpcCapability,
    rpc_url: &str,
    use_eip1559: bool,
) -> Result<FeeParams, EngineError> {
    if use_eip1559 {
        let base_fee_hex = rpc
            .rpc_call(rpc_url, "eth_gasPrice", serde_json::json!([]))
            .await
            .map_err(|e| EngineError::Rpc { method: "eth_gasPrice".into(), status: None, body: e.to_string() })?;
        let base_fee = hex_to_amount(&base_fee_hex)?;
        let priority_fee = Amount::from_u64(1_500_000_000);
        let max_fee = base_fee.checked_add(&priority_fee).unwrap_or(base_fee);
        Ok(FeeParams { gas_price: None, max_fee_per_gas: Some(max_fee), max_priority_fee_per_gas: Some(priority_fee) })
    } else {
        let gas_price_hex = rpc
            .rpc_call(rpc_url, "eth_gasPrice", serde_json::json!([]))
            .await
            .map_err(|e| EngineError::Rpc { method: "eth_gasPrice".into(), status: None, body: e.to_string() })?;
        let gas_price = hex_to_amount(&gas_price_hex)?;
        Ok(FeeParams { gas_price: Some(gas_price), max_fee_per_gas: None, max_priority_fee_per_gas: None })
    }
}

fn hex_to_amount(value: &serde_json::Value) -> Result<Amount, EngineError> {
    let hex_str = value.as_str().ok_or_else(|| EngineError::Rpc {
        method: "eth_gasPrice".into(), status: None, body: "expected hex string".into(),
    })?;
    let stripped = hex_str.trim_start_matches("0x");
    let padded = if stripped.is_empty() { "0".to_string() } else { stripped.to_string() };
    Amount::from_str_radix_hex(&padded).map_err(|e| EngineError::Rpc { method: "eth_gasPrice".into(), status: None, body: e })
}

async fn assemble(
    chain_config: &ChainConfig,
    from: &str,
    to: Option<String>,
    value: Amount,
    data: Vec<u8>,
    default_gas: u64,
    overrides: &EvmOverrides,
    rpc: &dyn RpcCapability,
) -> Result<EvmRawTx, EngineError> {
    let chain_id = overrides.chain_id.unwrap_or_else(|| default_chain_id(chain_config));
    let nonce = match overrides.nonce {
        Some(nonce) => nonce,
        None => fetch_nonce(rpc, &chain_config.rpc_url, from).await?,
    };
    let gas_limit = overrides.gas_limit.unwrap_or(default_gas);
    let use_eip1559 = chain_config.features.eip1559 && !overrides.force_legacy;

    let (gas_price, max_fee_per_gas, max_priority_fee_per_gas) =
        if overrides.gas_price.is_some() || overrides.max_fee_per_gas.is_some() {
            (overrides.gas_price.clone(), overrides.max_fee_per_gas.clone(), overrides.max_priority_fee_per_gas.clone())
        } else {
            let fetched = fetch_fee_params(rpc, &chain_config.rpc_url, use_eip1559).await?;
            (fetched.gas_price, fetched.max_fee_per_gas, fetched.max_priority_fee_per_gas)
        };

    Ok(EvmRawTx {
        chain_id,
        nonce,
        to,
        value,
        data,
        gas_limit,
        gas_price,
        max_fee_per_gas,
        max_priority_fee_per_gas,
        access_list: vec![],
    })
}

fn default_chain_id(chain_config: &ChainConfig) -> u64 {
    match chain_config.alias.as_str() {
        "ethereum" | "ethereum-legacy" => 1,
        _ => 1,
    }
}

pub async fn build(
    chain_config: &ChainConfig,
    intent: &TransferIntent,
    overrides: &EvmOverrides,
    rpc: &dyn RpcCapability,
) -> Result<EvmRawTx, EngineError> {
    match intent {
        TransferIntent::NativeTransfer { from, to, value } => {
            assemble(chain_config, from, Some(to.clone()), value.clone(), vec![], NATIVE_TRANSFER_GAS, overrides, rpc).await
        }
        TransferIntent::TokenTransfer { from, to, token_contract, value, .. } => {
            let data = encode_erc20_transfer(to, value)?;
            assemble(chain_config, from, Some(token_contract.clone()), Amount::zero(), data, TOKEN_TRANSFER_GAS, overrides, rpc).await
        }
        TransferIntent::ContractCall { from, contract, data, value } => {
            assemble(chain_config, from, Some(contract.clone()), value.clone().unwrap_or_else(Amount::zero), data.clone(), CONTRACT_CALL_GAS, overrides, rpc).await
        }
        TransferIntent::ContractDeploy { from, bytecode, constructor_args } => {
            let mut data = bytecode.clone();
            if let Some(args) = constructor_args {
                data.extend_from_slice(args);
            }
            assemble(chain_config, from, None, Amount::zero(), data, CONTRACT_CALL_GAS, overrides, rpc).await
        }
    }
}

/// Encodes `transfer(address,uint256)`: 4-byte selector, 32-byte
/// left-padded address, 32-byte big-endian value.
fn encode_erc20_transfer(to: &str, value: &Amount) -> Result<Vec<u8>, EngineError> {
    let to_bytes = hex::decode(to.trim_start_matches("0x"))
        .map_err(|e| EngineError::InvalidAddress { chain_alias: ChainAlias::new("evm"), address: to.to_string(), reason: e.to_string() })?;
    if to_bytes.len() != 20 {
        return Err(EngineError::InvalidAddress { chain_alias: ChainAlias::new("evm"), address: to.to_string(), reason: "expected 20-byte address".into() });
    }
    let mut data = Vec::with_capacity(4 + 32 + 32);
    data.extend_from_slice(&ERC20_TRANSFER_SELECTOR);
    data.extend(std::iter::repeat(0u8).take(12));
    data.extend_from_slice(&to_bytes);
    let value_bytes = value.as_biguint().to_bytes_be();
    data.extend(std::iter::repeat(0u8).take(32 - value_bytes.len()));
    data.extend_from_slice(&value_bytes);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::{Ecosystem, FeatureFlags, NativeCurrency};
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
    async fn builds_eip1559_native_transfer_with_default_gas() {
        let rpc = MockRpc::new()
            .with_response("eth_getTransactionCount", serde_json::json!("0x2"))
            .with_response("eth_gasPrice", serde_json::json!("0x3b9aca00"));
        let intent = TransferIntent::NativeTransfer {
            from: "0x00000000000000000000000000000000000001".into(),
            to: "0x00000000000000000000000000000000000002".into(),
            value: Amount::from_u64(1_000_000_000_000_000_000),
        };
        let tx = build(&eth_config(), &intent, &EvmOverrides::default(), &rpc).await.unwrap();
        assert_eq!(tx.nonce, 2);
        assert_eq!(tx.gas_limit, NATIVE_TRANSFER_GAS);
        assert!(tx.is_eip1559());
    }

    #[tokio::test]
    async fn builds_erc20_transfer_with_correct_selector() {
        let rpc = MockRpc::new()
            .with_response("eth_getTransactionCount", serde_json::json!("0x0"))
            .with_response("eth_gasPrice", serde_json::json!("0x3b9aca00"));
        let intent = TransferIntent::TokenTransfer {
            from: "0x00000000000000000000000000000000000001".into(),
            to: "0x00000000000000000000000000000000000000aa".into(),
            token_contract: "0x0000000000000000000000000000000000000000".into(),
            value: Amount::from_u64(1_000_000),
            standard: wallet_primitives::TokenStandard::Erc20,
        };
        let tx = build(&eth_config(), &intent, &EvmOverrides::default(), &rpc).await.unwrap();
        assert_eq!(&tx.data[..4], &ERC20_TRANSFER_SELECTOR);
        assert_eq!(tx.gas_limit, TOKEN_TRANSFER_GAS);
    }

    #[tokio::test]
    async fn force_legacy_override_disables_eip1559() {
        let rpc = MockRpc::new()
            .with_response("eth_getTransactionCount", serde_json::json!("0x0"))
            .with_response("eth_gasPrice", serde_json::json!("0x3b9aca00"));
        let intent = TransferIntent::NativeTransfer {
            from: "0x00000000000000000000000000000000000001".into(),
            to: "0x00000000000000000000000000000000000002".into(),
            value: Amount::zero(),
        };
        let overrides = EvmOverrides { force_legacy: true, ..Default::default() };
        let tx = build(&eth_config(), &intent, &overrides, &rpc).await.unwrap();
        assert!(!tx.is_eip1559());
    }
}
