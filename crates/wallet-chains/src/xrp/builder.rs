//! Assembles an [`XrpRawTx`] from a [`TransferIntent`], fetching the
//! account sequence via `account_info` and the open-ledger fee via
//! `server_info` when the caller hasn't pinned either.

use super::raw::{XrpAmount, XrpOverrides, XrpRawTx, XrpTransactionData};
use wallet_primitives::{ChainConfig, EngineError, TransferIntent};
use wallet_rpc::RpcCapability;

async fn fetch_sequence(rpc: &dyn RpcCapability, rpc_url: &str, account: &str) -> Result<u32, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "account_info", serde_json::json!({ "account": account, "ledger_index": "current" }))
        .await
        .map_err(|e| EngineError::Rpc { method: "account_info".into(), status: None, body: e.to_string() })?;
    result["account_data"]["Sequence"]
        .as_u64()
        .map(|s| s as u32)
        .ok_or_else(|| EngineError::Rpc { method: "account_info".into(), status: None, body: "missing Sequence".into() })
}

async fn fetch_base_fee_drops(rpc: &dyn RpcCapability, rpc_url: &str) -> Result<u64, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "server_info", serde_json::json!({}))
        .await
        .map_err(|e| EngineError::Rpc { method: "server_info".into(), status: None, body: e.to_string() })?;
    let fee_xrp = result["info"]["validated_ledger"]["base_fee_xrp"].as_f64().unwrap_or(0.00001);
    Ok((fee_xrp * 1_000_000.0).round() as u64)
}

pub async fn build(
    chain_config: &ChainConfig,
    intent: &TransferIntent,
    overrides: &XrpOverrides,
    rpc: &dyn RpcCapability,
) -> Result<XrpRawTx, EngineError> {
    let from = intent.from_address();
    let signing_pub_key = overrides
        .signing_pub_key
        .clone()
        .ok_or_else(|| EngineError::Psbt { phase: "build", cause: "XRPL transactions need the signing account's public key".into() })?;

    let sequence = match overrides.sequence {
        Some(sequence) => sequence,
        None => fetch_sequence(rpc, &chain_config.rpc_url, from).await?,
    };
    let fee_drops = match overrides.fee_drops {
        Some(fee_drops) => fee_drops,
        None => fetch_base_fee_drops(rpc, &chain_config.rpc_url).await?,
    };

    let data = match intent {
        TransferIntent::NativeTransfer { to, value, .. } => {
            let drops: u64 = value.to_decimal_string().parse().map_err(|_| EngineError::InvalidAmount { reason: "XRP amounts must fit in u64 drops".into() })?;
            XrpTransactionData::Payment { destination: to.clone(), amount: XrpAmount::Native { drops } }
        }
        TransferIntent::TokenTransfer { to, token_contract, value, .. } => {
            XrpTransactionData::Payment {
                destination: to.clone(),
                amount: XrpAmount::Issued { value: value.to_decimal_string(), currency: "USD".into(), issuer: token_contract.clone() },
            }
        }
        other => return Err(EngineError::unsupported_operation(&chain_config.alias, format!("{other:?} is not supported on XRPL"))),
    };

    Ok(XrpRawTx {
        account: from.to_string(),
        fee_drops,
        sequence,
        last_ledger_sequence: overrides.last_ledger_sequence,
        signing_pub_key,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xrp::address;
    use wallet_primitives::{Amount, ChainAlias, Ecosystem, FeatureFlags, NativeCurrency};
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
    async fn native_payment_uses_fetched_sequence_and_fee() {
        let from = address::encode(&[0x11u8; 20]);
        let to = address::encode(&[0x22u8; 20]);
        let rpc = MockRpc::new()
            .with_response("account_info", serde_json::json!({"account_data": {"Sequence": 42}}))
            .with_response("server_info", serde_json::json!({"info": {"validated_ledger": {"base_fee_xrp": 0.00001}}}));
        let intent = TransferIntent::NativeTransfer { from: from.clone(), to, value: Amount::from_u64(1_000_000) };
        let overrides = XrpOverrides { signing_pub_key: Some(vec![0x02; 33]), ..Default::default() };
        let tx = build(&xrpl_config(), &intent, &overrides, &rpc).await.unwrap();
        assert_eq!(tx.sequence, 42);
        assert_eq!(tx.fee_drops, 10);
    }
}
