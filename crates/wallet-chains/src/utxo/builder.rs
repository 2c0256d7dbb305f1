//! Builds a [`UtxoRawTx`] by fetching the sender's UTXO set, running
//! largest-first coin selection, and emitting a recipient output plus an
//! optional change output back to the sender.

use super::{
    address::{self, ScriptType},
    coin_select::{self, InputKind},
    raw::{UtxoCandidate, UtxoInput, UtxoOutput, UtxoOverrides, UtxoRawTx},
};
use wallet_primitives::{Amount, ChainConfig, EngineError, TransferIntent};
use wallet_rpc::RpcCapability;

async fn fetch_utxos(rpc: &dyn RpcCapability, rpc_url: &str, address: &str) -> Result<Vec<UtxoCandidate>, EngineError> {
    let url = format!("{}/api/v2/utxo/{}", rpc_url.trim_end_matches('/'), address);
    let bytes = rpc
        .http_get(&url)
        .await
        .map_err(|e| EngineError::Rpc { method: "utxo".into(), status: None, body: e.to_string() })?;
    let parsed: Vec<serde_json::Value> = serde_json::from_slice(&bytes)
        .map_err(|e| EngineError::Rpc { method: "utxo".into(), status: None, body: e.to_string() })?;
    Ok(parsed
        .into_iter()
        .filter_map(|entry| {
            Some(UtxoCandidate {
                txid: entry["txid"].as_str()?.to_string(),
                vout: entry["vout"].as_u64()? as u32,
                value_sat: entry["value"].as_str().and_then(|v| v.parse().ok()).or_else(|| entry["value"].as_u64())?,
                address: address.to_string(),
            })
        })
        .collect())
}

async fn fetch_fee_rate(rpc: &dyn RpcCapability, rpc_url: &str) -> Result<f64, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "estimatesmartfee", serde_json::json!([6]))
        .await
        .map_err(|e| EngineError::Rpc { method: "estimatesmartfee".into(), status: None, body: e.to_string() })?;
    let btc_per_kvb = result["feerate"].as_f64().unwrap_or(0.00001);
    Ok((btc_per_kvb * 100_000_000.0 / 1000.0).max(1.0))
}

pub async fn build(
    chain_config: &ChainConfig,
    intent: &TransferIntent,
    overrides: &UtxoOverrides,
    rpc: &dyn RpcCapability,
) -> Result<UtxoRawTx, EngineError> {
    let (from, to, value) = match intent {
        TransferIntent::NativeTransfer { from, to, value } => (from, to, value),
        other => {
            return Err(EngineError::unsupported_operation(
                &chain_config.alias,
                format!("{other:?} is not supported on a UTXO chain"),
            ))
        }
    };

    let (_, from_script_type) = address::validate(&chain_config.alias, from)?;
    let (recipient_script, _) = address::validate(&chain_config.alias, to)?;

    let candidates = fetch_utxos(rpc, &chain_config.rpc_url, from).await?;
    let target_sat: u64 = value.to_decimal_string().parse().map_err(|_| EngineError::InvalidAmount { reason: "UTXO amounts must fit in u64 satoshis".into() })?;

    let input_kind = match from_script_type {
        ScriptType::P2wpkh => InputKind::P2wpkh,
        ScriptType::P2tr => InputKind::P2tr,
    };
    let fee_rate = match overrides.fee_rate_sat_per_vb {
        Some(rate) => rate,
        None => fetch_fee_rate(rpc, &chain_config.rpc_url).await?,
    };

    let selection = coin_select::select(&candidates, target_sat, input_kind, Some(fee_rate), overrides.absolute_fee_sat)?;

    let inputs = selection
        .selected
        .iter()
        .map(|candidate| {
            let (script_pubkey, script_type) = address::validate(&chain_config.alias, &candidate.address)?;
            Ok(UtxoInput {
                txid: candidate.txid.clone(),
                vout: candidate.vout,
                value_sat: candidate.value_sat,
                script_pubkey,
                script_type: Some(script_type),
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    let mut outputs = vec![UtxoOutput { address: to.clone(), script_pubkey: recipient_script, value_sat: target_sat }];
    if selection.has_change_output {
        let (change_script, _) = address::validate(&chain_config.alias, from)?;
        outputs.push(UtxoOutput { address: from.clone(), script_pubkey: change_script, value_sat: selection.change_sat });
    }

    Ok(UtxoRawTx {
        version: 2,
        locktime: 0,
        rbf: overrides.rbf.unwrap_or(chain_config.features.rbf_default),
        inputs,
        outputs,
    })
}

pub fn actual_fee(tx: &UtxoRawTx, total_input_sat: u64) -> Amount {
    let total_output: u64 = tx.outputs.iter().map(|o| o.value_sat).sum();
    Amount::from_u64(total_input_sat.saturating_sub(total_output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::{ChainAlias, Ecosystem, FeatureFlags, NativeCurrency};
    use wallet_rpc::mock::MockRpc;

    fn btc_config() -> ChainConfig {
        ChainConfig {
            alias: ChainAlias::new("bitcoin"),
            ecosystem: Ecosystem::Utxo,
            rpc_url: "http://localhost".into(),
            native: NativeCurrency { symbol: "BTC".into(), decimals: 8 },
            features: FeatureFlags { segwit: true, taproot: true, rbf_default: true, ..Default::default() },
        }
    }

    #[tokio::test]
    async fn single_input_send_reproduces_the_documented_fee_and_change() {
        let from = "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq";
        let to = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
        let rpc = MockRpc::new()
            .with_http_response(
                &format!("http://localhost/api/v2/utxo/{from}"),
                serde_json::to_vec(&serde_json::json!([{"txid": "a".repeat(64), "vout": 0, "value": "100000000"}])).unwrap(),
            );
        let intent = TransferIntent::NativeTransfer { from: from.into(), to: to.into(), value: Amount::from_u64(50_000_000) };
        let overrides = UtxoOverrides { fee_rate_sat_per_vb: Some(10.0), ..Default::default() };
        let tx = build(&btc_config(), &intent, &overrides, &rpc).await.unwrap();
        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(tx.outputs.len(), 2);
        assert_eq!(tx.outputs[1].value_sat, 49_998_590);
    }

    #[tokio::test]
    async fn insufficient_funds_propagates_as_an_engine_error() {
        let from = "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq";
        let to = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
        let rpc = MockRpc::new().with_http_response(
            &format!("http://localhost/api/v2/utxo/{from}"),
            serde_json::to_vec(&serde_json::json!([{"txid": "a".repeat(64), "vout": 0, "value": "1000"}])).unwrap(),
        );
        let intent = TransferIntent::NativeTransfer { from: from.into(), to: to.into(), value: Amount::from_u64(1_000_000) };
        let overrides = UtxoOverrides { fee_rate_sat_per_vb: Some(10.0), ..Default::default() };
        let err = build(&btc_config(), &intent, &overrides, &rpc).await.unwrap_err();
        assert!(matches!(err, EngineError::InsufficientFunds { .. }));
    }
}
