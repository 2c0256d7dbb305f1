//! Submits the signed transaction to `POST {rpc_url}/wallet/broadcasttransaction`,
//! TronGrid's REST broadcast endpoint. A `false` `result` is a remote
//! refusal (the `message` field is base64-encoded); anything else reaching
//! the node (malformed response, transport failure) is thrown.

use wallet_primitives::{BroadcastResult, EngineError, SignedTransaction};
use wallet_rpc::RpcCapability;

pub async fn broadcast(rpc_url: &str, tx: &SignedTransaction, rpc: &dyn RpcCapability) -> Result<BroadcastResult, EngineError> {
    let url = format!("{}/wallet/broadcasttransaction", rpc_url.trim_end_matches('/'));
    let body = serde_json::to_vec(&serde_json::json!({ "transaction": tx.serialized })).unwrap_or_default();
    let bytes = rpc
        .http_post(&url, body, "application/json")
        .await
        .map_err(|e| EngineError::Rpc { method: "wallet/broadcasttransaction".into(), status: None, body: e.to_string() })?;
    let parsed: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| EngineError::Rpc { method: "wallet/broadcasttransaction".into(), status: None, body: e.to_string() })?;

    if parsed["result"].as_bool() == Some(true) {
        return Ok(BroadcastResult { success: true, error: None });
    }

    let message = parsed["message"]
        .as_str()
        .and_then(|encoded| base64::Engine::decode(&base64::engine::general_purpose::STANDARD, encoded).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .or_else(|| parsed["code"].as_str().map(str::to_string))
        .unwrap_or_else(|| "broadcast rejected".to_string());

    Ok(BroadcastResult { success: false, error: Some(message) })
}
