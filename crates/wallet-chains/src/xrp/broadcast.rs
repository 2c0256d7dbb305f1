//! Submits the signed transaction blob via the `submit` RPC method. Any
//! `engine_result` other than a `"tes*"` success code is a remote refusal.

use wallet_primitives::{BroadcastResult, EngineError, SignedTransaction};
use wallet_rpc::{RpcCapability, RpcError};

pub async fn broadcast(rpc_url: &str, tx: &SignedTransaction, rpc: &dyn RpcCapability) -> Result<BroadcastResult, EngineError> {
    let result = match rpc.rpc_call(rpc_url, "submit", serde_json::json!([{ "tx_blob": tx.serialized }])).await {
        Ok(result) => result,
        Err(RpcError::Remote { message, .. }) => return Ok(BroadcastResult { success: false, error: Some(message) }),
        Err(e) => return Err(EngineError::Rpc { method: "submit".into(), status: None, body: e.to_string() }),
    };

    let engine_result = result["engine_result"].as_str().unwrap_or("");
    if engine_result.starts_with("tes") {
        Ok(BroadcastResult { success: true, error: None })
    } else {
        let message = result["engine_result_message"].as_str().unwrap_or(engine_result).to_string();
        Ok(BroadcastResult { success: false, error: Some(message) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::ChainAlias;
    use wallet_rpc::mock::MockRpc;

    fn sample_tx() -> SignedTransaction {
        SignedTransaction { chain_alias: ChainAlias::new("xrpl"), serialized: "1200...".into(), hash: "ABC".into() }
    }

    #[tokio::test]
    async fn tes_success_reports_success() {
        let rpc = MockRpc::new().with_response("submit", serde_json::json!({ "engine_result": "tesSUCCESS" }));
        let result = broadcast("http://localhost", &sample_tx(), &rpc).await.unwrap();
        assert!(result.success);
    }

    #[tokio::test]
    async fn ter_rejection_is_returned_not_thrown() {
        let rpc = MockRpc::new().with_response(
            "submit",
            serde_json::json!({ "engine_result": "terPRE_SEQ", "engine_result_message": "sequence too high" }),
        );
        let result = broadcast("http://localhost", &sample_tx(), &rpc).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("sequence too high"));
    }
}
