//! Classifies a Solana transaction (fetched by its base58 signature) using
//! the parsed instruction list `getTransaction` returns with
//! `jsonParsed` encoding.

use wallet_primitives::{
    Amount, ChainConfig, EngineError, NormalisedMetadata, NormalisedTransaction, TokenTransferEvent, TransactionType,
};
use wallet_rpc::RpcCapability;

const SPL_TOKEN_TRANSFER_TAG: u8 = 3;
const SPL_TOKEN_TRANSFER_CHECKED_TAG: u8 = 12;

async fn fetch_tx(rpc: &dyn RpcCapability, rpc_url: &str, signature: &str) -> Result<serde_json::Value, EngineError> {
    let result = rpc
        .rpc_call(
            rpc_url,
            "getTransaction",
            serde_json::json!([signature, {"encoding": "jsonParsed", "maxSupportedTransactionVersion": 0}]),
        )
        .await
        .map_err(|e| EngineError::Rpc { method: "getTransaction".into(), status: None, body: e.to_string() })?;
    if result.is_null() {
        return Err(EngineError::TransactionNotFound(signature.to_string()));
    }
    Ok(result)
}

pub async fn decode(chain_config: &ChainConfig, signature: &str, rpc: &dyn RpcCapability) -> Result<NormalisedTransaction, EngineError> {
    let tx = fetch_tx(rpc, &chain_config.rpc_url, signature).await?;

    let account_keys = tx["transaction"]["message"]["accountKeys"].as_array().cloned().unwrap_or_default();
    let from = account_keys.first().and_then(|k| k["pubkey"].as_str().or_else(|| k.as_str())).unwrap_or("").to_string();

    let instructions = tx["transaction"]["message"]["instructions"].as_array().cloned().unwrap_or_default();
    let mut token_transfers = Vec::new();
    let mut tx_type = TransactionType::NativeTransfer;
    let mut to: Option<String> = None;
    let mut value = Amount::zero();

    for instruction in &instructions {
        let program = instruction["program"].as_str().unwrap_or("");
        if program == "spl-token" {
            let info = &instruction["parsed"]["info"];
            tx_type = TransactionType::TokenTransfer;
            to = info["destination"].as_str().map(str::to_string);
            let raw_amount = info["amount"].as_str().unwrap_or("0").parse::<u64>().unwrap_or(0);
            value = Amount::from_u64(raw_amount);
            token_transfers.push(TokenTransferEvent {
                standard: "SPL".into(),
                token_address: info["mint"].as_str().unwrap_or("").to_string(),
                from: info["source"].as_str().unwrap_or("").to_string(),
                to: info["destination"].as_str().unwrap_or("").to_string(),
                value: raw_amount.to_string(),
                decimals: None,
                symbol: None,
            });
        } else if program == "system" {
            let info = &instruction["parsed"]["info"];
            to = info["destination"].as_str().map(str::to_string);
            let lamports = info["lamports"].as_u64().unwrap_or(0);
            value = Amount::from_u64(lamports);
        } else {
            tx_type = TransactionType::ContractCall;
        }
    }

    let status = tx["meta"]["err"].as_null().map(|_| "success".to_string())
        .or_else(|| Some("failed".to_string()));
    let fee = tx["meta"]["fee"].as_u64().map(|f| f.to_string());
    let block_number = tx["slot"].as_u64();

    Ok(NormalisedTransaction {
        chain_alias: chain_config.alias.clone(),
        tx_type,
        from,
        to,
        value: value.to_decimal_string(),
        formatted_value: value.format_with_decimals(chain_config.native.decimals),
        symbol: chain_config.native.symbol.clone(),
        fee,
        metadata: NormalisedMetadata {
            is_contract_deployment: false,
            input_count: None,
            output_count: None,
            token_address: token_transfers.first().map(|t| t.token_address.clone()),
        },
        token_transfers,
        internal_transactions: vec![],
        status,
        block_number,
        timestamp: tx["blockTime"].as_u64(),
        confirmations: None,
        finalized: None,
    })
}

/// Classifies a raw SPL-Token instruction tag, surfaced for tests that
/// don't want to build a full `jsonParsed` fixture.
pub fn classify_spl_token_tag(tag: u8) -> TransactionType {
    match tag {
        SPL_TOKEN_TRANSFER_TAG | SPL_TOKEN_TRANSFER_CHECKED_TAG => TransactionType::TokenTransfer,
        _ => TransactionType::ContractCall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_and_transfer_checked_tags_are_token_transfers() {
        assert_eq!(classify_spl_token_tag(3), TransactionType::TokenTransfer);
        assert_eq!(classify_spl_token_tag(12), TransactionType::TokenTransfer);
    }

    #[test]
    fn other_tags_are_contract_calls() {
        assert_eq!(classify_spl_token_tag(7), TransactionType::ContractCall);
    }
}
