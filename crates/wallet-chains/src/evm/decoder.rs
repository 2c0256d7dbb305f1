//! Classifies an arbitrary EVM transaction (fetched by hash) into a
//! [`NormalisedTransaction`]. Rules are applied in order: contract
//! deployment, ERC-20 transfer, ERC-20 approval, generic contract call,
//! native transfer, unknown.

use wallet_primitives::{
    Amount, ChainConfig, EngineError, NormalisedMetadata, NormalisedTransaction, TokenTransferEvent,
    TransactionType,
};
use wallet_rpc::RpcCapability;

const ERC20_TRANSFER_SELECTOR: &str = "a9059cbb";
const ERC20_APPROVE_SELECTOR: &str = "095ea7b3";
/// `keccak256("Transfer(address,address,uint256)")`.
const TRANSFER_TOPIC: &str = "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

async fn fetch_tx(rpc: &dyn RpcCapability, rpc_url: &str, tx_hash: &str) -> Result<serde_json::Value, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "eth_getTransactionByHash", serde_json::json!([tx_hash]))
        .await
        .map_err(|e| EngineError::Rpc { method: "eth_getTransactionByHash".into(), status: None, body: e.to_string() })?;
    if result.is_null() {
        return Err(EngineError::TransactionNotFound(tx_hash.to_string()));
    }
    Ok(result)
}

async fn fetch_receipt(rpc: &dyn RpcCapability, rpc_url: &str, tx_hash: &str) -> Result<serde_json::Value, EngineError> {
    rpc.rpc_call(rpc_url, "eth_getTransactionReceipt", serde_json::json!([tx_hash]))
        .await
        .map_err(|e| EngineError::Rpc { method: "eth_getTransactionReceipt".into(), status: None, body: e.to_string() })
}

fn hex_str(value: &serde_json::Value) -> &str {
    value.as_str().unwrap_or("0x0")
}

fn hex_to_amount(value: &serde_json::Value) -> Amount {
    let stripped = hex_str(value).trim_start_matches("0x");
    let padded = if stripped.is_empty() { "0" } else { stripped };
    Amount::from_str_radix_hex(padded).unwrap_or_else(|_| Amount::zero())
}

fn decode_log_address(topic: &str) -> String {
    let stripped = topic.trim_start_matches("0x");
    format!("0x{}", &stripped[stripped.len().saturating_sub(40)..])
}

pub async fn decode(
    chain_config: &ChainConfig,
    tx_hash: &str,
    rpc: &dyn RpcCapability,
) -> Result<NormalisedTransaction, EngineError> {
    let tx = fetch_tx(rpc, &chain_config.rpc_url, tx_hash).await?;
    let receipt = fetch_receipt(rpc, &chain_config.rpc_url, tx_hash).await.ok();

    let from = hex_str(&tx["from"]).to_string();
    let to = tx["to"].as_str().map(str::to_string);
    let value = hex_to_amount(&tx["value"]);
    let data = tx["input"].as_str().unwrap_or("0x").to_string();
    let selector = data.trim_start_matches("0x").get(0..8).unwrap_or("");

    let mut token_transfers = Vec::new();
    if let Some(receipt) = &receipt {
        if let Some(logs) = receipt["logs"].as_array() {
            for log in logs {
                let topics = log["topics"].as_array().cloned().unwrap_or_default();
                if topics.len() == 3 && topics[0].as_str() == Some(&format!("0x{TRANSFER_TOPIC}")) {
                    token_transfers.push(TokenTransferEvent {
                        standard: "ERC20".into(),
                        token_address: hex_str(&log["address"]).to_string(),
                        from: decode_log_address(topics[1].as_str().unwrap_or("")),
                        to: decode_log_address(topics[2].as_str().unwrap_or("")),
                        value: hex_to_amount(&log["data"]).to_decimal_string(),
                        decimals: None,
                        symbol: None,
                    });
                }
            }
        }
    }

    let (tx_type, resolved_to) = classify(to.as_deref(), selector, &token_transfers);

    let status = receipt.as_ref().and_then(|r| r["status"].as_str().map(|s| {
        if s == "0x1" { "success".to_string() } else { "failed".to_string() }
    }));
    let block_number = receipt.as_ref().and_then(|r| r["blockNumber"].as_str())
        .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok());

    let gas_used = receipt.as_ref().and_then(|r| r["gasUsed"].as_str().map(|_| hex_to_amount(&r["gasUsed"])));
    let gas_price = tx["gasPrice"].as_str().map(|_| hex_to_amount(&tx["gasPrice"]));
    let fee = match (gas_used, gas_price) {
        (Some(used), Some(price)) => Some((used.as_biguint() * price.as_biguint()).to_string()),
        _ => None,
    };

    Ok(NormalisedTransaction {
        chain_alias: chain_config.alias.clone(),
        tx_type,
        from,
        to: resolved_to,
        value: value.to_decimal_string(),
        formatted_value: value.format_with_decimals(chain_config.native.decimals),
        symbol: chain_config.native.symbol.clone(),
        fee,
        metadata: NormalisedMetadata {
            is_contract_deployment: to.is_none(),
            input_count: None,
            output_count: None,
            token_address: token_transfers.first().map(|t| t.token_address.clone()),
        },
        token_transfers,
        internal_transactions: vec![],
        status,
        block_number,
        timestamp: None,
        confirmations: None,
        finalized: None,
    })
}

fn classify(to: Option<&str>, selector: &str, token_transfers: &[TokenTransferEvent]) -> (TransactionType, Option<String>) {
    if to.is_none() {
        return (TransactionType::ContractDeployment, None);
    }
    if selector == ERC20_TRANSFER_SELECTOR || !token_transfers.is_empty() {
        return (TransactionType::TokenTransfer, to.map(str::to_string));
    }
    if selector == ERC20_APPROVE_SELECTOR {
        return (TransactionType::Approval, to.map(str::to_string));
    }
    if !selector.is_empty() {
        return (TransactionType::ContractCall, to.map(str::to_string));
    }
    (TransactionType::NativeTransfer, to.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::classify;
    use wallet_primitives::TransactionType;

    #[test]
    fn no_recipient_is_a_deployment() {
        let (tx_type, to) = classify(None, "", &[]);
        assert_eq!(tx_type, TransactionType::ContractDeployment);
        assert!(to.is_none());
    }

    #[test]
    fn transfer_selector_is_a_token_transfer() {
        let (tx_type, _) = classify(Some("0xabc"), "a9059cbb", &[]);
        assert_eq!(tx_type, TransactionType::TokenTransfer);
    }

    #[test]
    fn approve_selector_is_an_approval() {
        let (tx_type, _) = classify(Some("0xabc"), "095ea7b3", &[]);
        assert_eq!(tx_type, TransactionType::Approval);
    }

    #[test]
    fn empty_calldata_with_recipient_is_a_native_transfer() {
        let (tx_type, _) = classify(Some("0xabc"), "", &[]);
        assert_eq!(tx_type, TransactionType::NativeTransfer);
    }

    #[test]
    fn unrecognised_selector_is_a_contract_call() {
        let (tx_type, _) = classify(Some("0xabc"), "deadbeef", &[]);
        assert_eq!(tx_type, TransactionType::ContractCall);
    }
}
