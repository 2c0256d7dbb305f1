//! Classifies a Tron transaction. Shares the EVM decoder's ERC-20
//! selector/topic rules (TRC-20 reuses the same ABI), adapted for Tron's
//! `0x41`-prefixed base58 addressing.

use super::address;
use wallet_primitives::{
    Amount, ChainConfig, EngineError, NormalisedMetadata, NormalisedTransaction, TokenTransferEvent,
    TransactionType,
};
use wallet_rpc::RpcCapability;

const ERC20_TRANSFER_SELECTOR: &str = "a9059cbb";
const ERC20_APPROVE_SELECTOR: &str = "095ea7b3";
const TRANSFER_TOPIC: &str = "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

async fn fetch_tx(rpc: &dyn RpcCapability, rpc_url: &str, tx_hash: &str) -> Result<serde_json::Value, EngineError> {
    let url = format!("{}/wallet/gettransactionbyid", rpc_url.trim_end_matches('/'));
    let body = serde_json::to_vec(&serde_json::json!({ "value": tx_hash })).unwrap_or_default();
    let bytes = rpc
        .http_post(&url, body, "application/json")
        .await
        .map_err(|e| EngineError::Rpc { method: "gettransactionbyid".into(), status: None, body: e.to_string() })?;
    let parsed: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| EngineError::Rpc { method: "gettransactionbyid".into(), status: None, body: e.to_string() })?;
    if parsed.as_object().map(|o| o.is_empty()).unwrap_or(true) {
        return Err(EngineError::TransactionNotFound(tx_hash.to_string()));
    }
    Ok(parsed)
}

fn classify(selector: &str, token_transfers: &[TokenTransferEvent]) -> TransactionType {
    if selector == ERC20_TRANSFER_SELECTOR || !token_transfers.is_empty() {
        TransactionType::TokenTransfer
    } else if selector == ERC20_APPROVE_SELECTOR {
        TransactionType::Approval
    } else if !selector.is_empty() {
        TransactionType::ContractCall
    } else {
        TransactionType::NativeTransfer
    }
}

pub async fn decode(
    chain_config: &ChainConfig,
    tx_hash: &str,
    rpc: &dyn RpcCapability,
) -> Result<NormalisedTransaction, EngineError> {
    let tx = fetch_tx(rpc, &chain_config.rpc_url, tx_hash).await?;
    let contract = &tx["raw_data"]["contract"][0];
    let contract_type = contract["type"].as_str().unwrap_or("");
    let parameter = &contract["parameter"]["value"];

    let (from, to, value, selector, token_address) = if contract_type == "TriggerSmartContract" {
        let owner = parameter["owner_address"].as_str().unwrap_or("");
        let contract_address = parameter["contract_address"].as_str().map(str::to_string);
        let data = parameter["data"].as_str().unwrap_or("");
        (owner.to_string(), contract_address, Amount::zero(), data.get(0..8).unwrap_or("").to_string(), parameter["contract_address"].as_str().map(str::to_string))
    } else {
        let owner = parameter["owner_address"].as_str().unwrap_or("");
        let recipient = parameter["to_address"].as_str().map(str::to_string);
        let amount = parameter["amount"].as_u64().unwrap_or(0);
        (owner.to_string(), recipient, Amount::from_u64(amount), String::new(), None)
    };

    let mut token_transfers = Vec::new();
    if let Some(logs) = tx["log"].as_array() {
        for log in logs {
            let topics = log["topics"].as_array().cloned().unwrap_or_default();
            if topics.len() == 3 && topics[0].as_str() == Some(TRANSFER_TOPIC) {
                let from_addr = address::from_hex_low20(topics[1].as_str().unwrap_or("")).unwrap_or_default();
                let to_addr = address::from_hex_low20(topics[2].as_str().unwrap_or("")).unwrap_or_default();
                token_transfers.push(TokenTransferEvent {
                    standard: "TRC20".into(),
                    token_address: log["address"].as_str().unwrap_or("").to_string(),
                    from: from_addr,
                    to: to_addr,
                    value: log["data"].as_str().and_then(|s| Amount::from_str_radix_hex(s).ok()).unwrap_or_else(Amount::zero).to_decimal_string(),
                    decimals: None,
                    symbol: None,
                });
            }
        }
    }

    let tx_type = classify(&selector, &token_transfers);

    Ok(NormalisedTransaction {
        chain_alias: chain_config.alias.clone(),
        tx_type,
        from,
        to,
        value: value.to_decimal_string(),
        formatted_value: value.format_with_decimals(chain_config.native.decimals),
        symbol: chain_config.native.symbol.clone(),
        fee: None,
        metadata: NormalisedMetadata { is_contract_deployment: contract_type == "CreateSmartContract", input_count: None, output_count: None, token_address },
        token_transfers,
        internal_transactions: vec![],
        status: None,
        block_number: None,
        timestamp: tx["raw_data"]["timestamp"].as_u64(),
        confirmations: None,
        finalized: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_selector_classifies_as_token_transfer() {
        assert_eq!(classify("a9059cbb", &[]), TransactionType::TokenTransfer);
    }

    #[test]
    fn empty_selector_classifies_as_native_transfer() {
        assert_eq!(classify("", &[]), TransactionType::NativeTransfer);
    }
}
