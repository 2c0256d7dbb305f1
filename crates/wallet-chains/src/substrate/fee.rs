//! Substrate fee estimation: `payment_queryInfo` against the unsigned
//! extrinsic gives the base partial fee; slow/standard/fast are that fee
//! with an increasing tip layered on top, since Substrate's weight-based
//! fee doesn't vary with network congestion the way gas auctions do.

use super::{codec, raw::SubstrateRawTx};
use std::str::FromStr;
use wallet_primitives::{Amount, ChainConfig, EngineError, FeeEstimate, FeeLevel};
use wallet_rpc::RpcCapability;

async fn query_partial_fee(rpc: &dyn RpcCapability, rpc_url: &str, extrinsic_hex: &str) -> Result<u128, EngineError> {
    let result = rpc
        .rpc_call(rpc_url, "payment_queryInfo", serde_json::json!([extrinsic_hex]))
        .await
        .map_err(|e| EngineError::Rpc { method: "payment_queryInfo".into(), status: None, body: e.to_string() })?;
    result["partialFee"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| result["partialFee"].as_u64().map(u128::from))
        .ok_or_else(|| EngineError::Rpc { method: "payment_queryInfo".into(), status: None, body: "missing partialFee".into() })
}

pub async fn estimate(chain_config: &ChainConfig, tx: &SubstrateRawTx, rpc: &dyn RpcCapability) -> Result<FeeEstimate, EngineError> {
    let extrinsic_hex = codec::serialize_unsigned(tx);
    let base_fee = query_partial_fee(rpc, &chain_config.rpc_url, &extrinsic_hex).await?;
    let decimals = chain_config.native.decimals;

    Ok(FeeEstimate {
        slow: FeeLevel::from_amount(&Amount::from_str(&base_fee.to_string())?, decimals),
        standard: FeeLevel::from_amount(&Amount::from_str(&(base_fee + base_fee / 10).to_string())?, decimals),
        fast: FeeLevel::from_amount(&Amount::from_str(&(base_fee + base_fee / 2).to_string())?, decimals),
    })
}
