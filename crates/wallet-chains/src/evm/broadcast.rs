//! Submits a signed EIP-1559/legacy envelope via `eth_sendRawTransaction`.
//! A JSON-RPC error response is a remote refusal (bad nonce, underpriced,
//! etc.) and comes back as a [`BroadcastResult`]; a transport/decode
//! failure reaching the node at all is thrown.

use wallet_primitives::{BroadcastResult, EngineError, SignedTransaction};
use wallet_rpc::{RpcCapability, RpcError};

pub async fn broadcast(rpc_url: &str, tx: &SignedTransaction, rpc: &dyn RpcCapability) -> Result<BroadcastResult, EngineError> {
    match rpc.rpc_call(rpc_url, "eth_sendRawTransaction", serde_json::json!([tx.serialized])).await {
        Ok(_) => Ok(BroadcastResult { success: true, error: None }),
        Err(RpcError::Remote { message, .. }) => Ok(BroadcastResult { success: false, error: Some(message) }),
        Err(e) => Err(EngineError::Rpc { method: "eth_sendRawTransaction".into(), status: None, body: e.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_primitives::ChainAlias;
    use wallet_rpc::mock::MockRpc;

    fn sample_tx() -> SignedTransaction {
        SignedTransaction { chain_alias: ChainAlias::new("ethereum"), serialized: "0x02f8...".into(), hash: "0xabc".into() }
    }

    #[tokio::test]
    async fn accepted_transaction_reports_success() {
        let rpc = MockRpc::new().with_response("eth_sendRawTransaction", serde_json::json!("0xabc"));
        let result = broadcast("http://localhost", &sample_tx(), &rpc).await.unwrap();
        assert!(result.success);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn remote_rejection_is_returned_not_thrown() {
        let rpc = MockRpc::new();
        let result = broadcast("http://localhost", &sample_tx(), &rpc).await.unwrap();
        assert!(!result.success);
        assert!(result.error.is_some());
    }
}
