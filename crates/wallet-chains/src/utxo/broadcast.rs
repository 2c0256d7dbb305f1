//! Submits a raw signed transaction via `sendrawtransaction`.

use wallet_primitives::{BroadcastResult, EngineError, SignedTransaction};
use wallet_rpc::{RpcCapability, RpcError};

pub async fn broadcast(rpc_url: &str, tx: &SignedTransaction, rpc: &dyn RpcCapability) -> Result<BroadcastResult, EngineError> {
    match rpc.rpc_call(rpc_url, "sendrawtransaction", serde_json::json!([tx.serialized])).await {
        Ok(_) => Ok(BroadcastResult { success: true, error: None }),
        Err(RpcError::Remote { message, .. }) => Ok(BroadcastResult { success: false, error: Some(message) }),
        Err(e) => Err(EngineError::Rpc { method: "sendrawtransaction".into(), status: None, body: e.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::ChainAlias;
    use wallet_rpc::mock::MockRpc;

    fn sample_tx() -> SignedTransaction {
        SignedTransaction { chain_alias: ChainAlias::new("bitcoin"), serialized: "0100...".into(), hash: "abc".into() }
    }

    #[tokio::test]
    async fn accepted_transaction_reports_success() {
        let rpc = MockRpc::new().with_response("sendrawtransaction", serde_json::json!("abc"));
        let result = broadcast("http://localhost", &sample_tx(), &rpc).await.unwrap();
        assert!(result.success);
    }

    #[tokio::test]
    async fn remote_rejection_is_returned_not_thrown() {
        let rpc = MockRpc::new();
        let result = broadcast("http://localhost", &sample_tx(), &rpc).await.unwrap();
        assert!(!result.success);
        assert!(result.error.is_some());
    }
}
