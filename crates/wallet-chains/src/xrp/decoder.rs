//! Classifies an XRPL transaction fetched via the `tx` RPC method.

use wallet_primitives::{
    Amount, ChainConfig, EngineError, NormalisedMetadata, NormalisedTransaction, TransactionType,
};
use wallet_rpc::RpcCapability;

async fn fetch_tx(rpc: &dyn RpcCapability, rpc_url: &str, tx_hash: &str) -> Result<serde_json::Value, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "tx", serde_json::json!({ "transaction": tx_hash }))
        .await
        .map_err(|e| EngineError::Rpc { method: "tx".into(), status: None, body: e.to_string() })?;
    if result["validated"].as_bool() != Some(true) && result["TransactionType"].is_null() {
        return Err(EngineError::TransactionNotFound(tx_hash.to_string()));
    }
    Ok(result)
}

pub async fn decode(
    chain_config: &ChainConfig,
    tx_hash: &str,
    rpc: &dyn RpcCapability,
) -> Result<NormalisedTransaction, EngineError> {
    let tx = fetch_tx(rpc, &chain_config.rpc_url, tx_hash).await?;

    let transaction_type = tx["TransactionType"].as_str().unwrap_or("");
    let from = tx["Account"].as_str().unwrap_or("").to_string();
    let to = tx["Destination"].as_str().map(str::to_string);

    let (tx_type, value) = match transaction_type {
        "Payment" => {
            let amount = &tx["Amount"];
            if let Some(drops) = amount.as_str() {
                (TransactionType::NativeTransfer, Amount::from_u64(drops.parse().unwrap_or(0)))
            } else {
                (TransactionType::TokenTransfer, Amount::zero())
            }
        }
        "TrustSet" => (TransactionType::Approval, Amount::zero()),
        _ => (TransactionType::Unknown, Amount::zero()),
    };

    let fee = tx["Fee"].as_str().map(str::to_string);
    let status = tx["meta"]["TransactionResult"].as_str().map(|r| if r == "tesSUCCESS" { "success".to_string() } else { "failed".to_string() });

    Ok(NormalisedTransaction {
        chain_alias: chain_config.alias.clone(),
        tx_type,
        from,
        to,
        value: value.to_decimal_string(),
        formatted_value: value.format_with_decimals(chain_config.native.decimals),
        symbol: chain_config.native.symbol.clone(),
        fee,
        metadata: NormalisedMetadata::default(),
        token_transfers: vec![],
        internal_transactions: vec![],
        status,
        block_number: tx["ledger_index"].as_u64(),
        timestamp: None,
        confirmations: None,
        finalized: tx["validated"].as_bool(),
    })
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
    async fn native_payment_decodes_correctly() {
        let rpc = MockRpc::new().with_response(
            "tx",
            serde_json::json!({
                "validated": true,
                "TransactionType": "Payment",
                "Account": "rSender",
                "Destination": "rRecipient",
                "Amount": "1000000",
                "Fee": "12",
                "meta": {"TransactionResult": "tesSUCCESS"},
            }),
        );
        let decoded = decode(&xrpl_config(), "abc", &rpc).await.unwrap();
        assert_eq!(decoded.tx_type, TransactionType::NativeTransfer);
        assert_eq!(decoded.value, "1000000");
        assert_eq!(decoded.status.as_deref(), Some("success"));
    }
}
