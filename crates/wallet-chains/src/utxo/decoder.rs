//! Classifies a Bitcoin-family transaction into a [`NormalisedTransaction`].
//! There is no token layer on UTXO chains: every decoded transaction is
//! either a native transfer or unknown, and `token_transfers` is always
//! empty.

use wallet_primitives::{
    Amount, ChainConfig, EngineError, NormalisedMetadata, NormalisedTransaction, TransactionType,
};
use wallet_rpc::RpcCapability;

/// Converts a BTC-decimal JSON amount to integer satoshis without routing the
/// scaling through float multiplication; bitcoind emits these with exactly
/// 8 fractional digits, so formatting to fixed precision and dropping the
/// decimal point is lossless where `value_btc * 100_000_000.0` is not.
fn btc_to_sat(value_btc: f64) -> u64 {
    let formatted = format!("{value_btc:.8}");
    let digits: String = formatted.chars().filter(|c| *c != '.').collect();
    digits.parse::<u64>().unwrap_or(0)
}

async fn fetch_tx(rpc: &dyn RpcCapability, rpc_url: &str, tx_hash: &str) -> Result<serde_json::Value, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "getrawtransaction", serde_json::json!([tx_hash, true]))
        .await
        .map_err(|e| EngineError::Rpc { method: "getrawtransaction".into(), status: None, body: e.to_string() })?;
    if result.is_null() {
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

    let vin = tx["vin"].as_array().cloned().unwrap_or_default();
    let vout = tx["vout"].as_array().cloned().unwrap_or_default();

    let from = vin
        .first()
        .and_then(|v| v["prevout"]["scriptPubKey"]["address"].as_str())
        .unwrap_or("")
        .to_string();

    let primary_output = vout
        .iter()
        .find(|out| out["scriptPubKey"]["address"].as_str() != Some(from.as_str()))
        .or_else(|| vout.first());
    let to = primary_output.and_then(|out| out["scriptPubKey"]["address"].as_str()).map(str::to_string);
    let value_sat = primary_output.and_then(|out| out["value"].as_f64()).map(btc_to_sat).unwrap_or(0);
    let value = Amount::from_u64(value_sat);

    let total_in_sat: u64 = vin.iter().filter_map(|v| v["prevout"]["value"].as_f64()).map(btc_to_sat).sum();
    let total_out_sat: u64 = vout.iter().filter_map(|v| v["value"].as_f64()).map(btc_to_sat).sum();
    let fee = if total_in_sat > 0 { Some(total_in_sat.saturating_sub(total_out_sat).to_string()) } else { None };

    let confirmations = tx["confirmations"].as_u64();
    let block_number = tx["height"].as_u64();

    Ok(NormalisedTransaction {
        chain_alias: chain_config.alias.clone(),
        tx_type: if to.is_some() { TransactionType::NativeTransfer } else { TransactionType::Unknown },
        from,
        to,
        value: value.to_decimal_string(),
        formatted_value: value.format_with_decimals(chain_config.native.decimals),
        symbol: chain_config.native.symbol.clone(),
        fee,
        metadata: NormalisedMetadata {
            is_contract_deployment: false,
            input_count: Some(vin.len() as u32),
            output_count: Some(vout.len() as u32),
            token_address: None,
        },
        token_transfers: vec![],
        internal_transactions: vec![],
        status: confirmations.map(|c| if c > 0 { "success".to_string() } else { "pending".to_string() }),
        block_number,
        timestamp: tx["time"].as_u64(),
        confirmations,
        finalized: confirmations.map(|c| c >= 6),
    })
}
