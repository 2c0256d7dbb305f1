// Copyright 2025 Chainflip Labs GmbH
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! The injected RPC capability. Every ecosystem builder, fee estimator and
//! decoder in `wallet-chains` reaches the network exclusively through an
//! `Arc<dyn RpcCapability>` — no component holds a client of its own.
//!
//! Generalises `engine/src/rpc_utils.rs::call_rpc_raw` ("Common utilities
//! for JSON-RPC calls across different blockchains... used by Solana, Tron,
//! etc.") from a handful of call sites to the single capability every
//! ecosystem module in this workspace is built against.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("transport error calling {method}: {source}")]
    Transport { method: String, #[source] source: reqwest::Error },
    #[error("JSON decode error calling {method}: {source}")]
    Json { method: String, #[source] source: serde_json::Error },
    #[error("RPC error response from {method}: {code} {message}")]
    Remote { method: String, code: i64, message: String },
}

/// The capability the core is built against: `rpcCall(url, method, params)`
/// plus raw HTTP get/post for indexer-style REST endpoints (Blockbook,
/// Esplora fee bands, Solana priority-fee samplers hit over HTTP rather
/// than JSON-RPC).
#[async_trait]
pub trait RpcCapability: Send + Sync + fmt::Debug {
    async fn rpc_call(&self, url: &str, method: &str, params: Value) -> Result<Value, RpcError>;
    async fn http_get(&self, url: &str) -> Result<Vec<u8>, RpcError>;
    async fn http_post(&self, url: &str, body: Vec<u8>, content_type: &str) -> Result<Vec<u8>, RpcError>;
}

/// The default capability, a thin `reqwest` client. Mirrors
/// `engine/src/rpc_utils.rs::call_rpc_raw`'s request/response shape
/// (`jsonrpc: "2.0"`, `id: 0`) and its "not a valid json object" warning
/// path for malformed indexer responses.
#[derive(Clone)]
pub struct HttpRpcCapability {
    client: reqwest::Client,
}

impl Default for HttpRpcCapability {
    fn default() -> Self {
        HttpRpcCapability { client: reqwest::Client::new() }
    }
}

impl fmt::Debug for HttpRpcCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRpcCapability").finish()
    }
}

#[async_trait]
impl RpcCapability for HttpRpcCapability {
    async fn rpc_call(&self, url: &str, method: &str, params: Value) -> Result<Value, RpcError> {
        let request_body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|source| RpcError::Transport { method: method.to_string(), source })?;

        let response_text = response
            .text()
            .await
            .map_err(|source| RpcError::Transport { method: method.to_string(), source })?;

        let mut json = serde_json::from_str::<Value>(&response_text)
            .map_err(|source| RpcError::Json { method: method.to_string(), source })?;

        if json.is_object() && json.get("error").map(Value::is_object).unwrap_or(false) {
            let error = json["error"].take();
            return Err(RpcError::Remote {
                method: method.to_string(),
                code: error.get("code").and_then(Value::as_i64).unwrap_or(-1),
                message: error.get("message").and_then(Value::as_str).unwrap_or("unknown error").to_string(),
            });
        }

        if json.is_object() {
            Ok(json["result"].take())
        } else {
            tracing::warn!(method, "rpc response was not a json object: {json:?}");
            Ok(json)
        }
    }

    async fn http_get(&self, url: &str) -> Result<Vec<u8>, RpcError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| RpcError::Transport { method: "http_get".into(), source })?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| RpcError::Transport { method: "http_get".into(), source })?;
        Ok(bytes.to_vec())
    }

    async fn http_post(&self, url: &str, body: Vec<u8>, content_type: &str) -> Result<Vec<u8>, RpcError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type.to_string())
            .body(body)
            .send()
            .await
            .map_err(|source| RpcError::Transport { method: "http_post".into(), source })?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| RpcError::Transport { method: "http_post".into(), source })?;
        Ok(bytes.to_vec())
    }
}

/// An in-memory capability for tests: returns canned JSON-RPC responses
/// keyed by method name, a hand-rolled double rather than a `mockall` mock
/// given the interface is only three methods wide.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::{collections::HashMap, sync::Mutex};

    #[derive(Default, Debug)]
    pub struct MockRpc {
        responses: Mutex<HashMap<String, Value>>,
        http_responses: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl MockRpc {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(self, method: &str, response: Value) -> Self {
            self.responses.lock().unwrap().insert(method.to_string(), response);
            self
        }

        pub fn with_http_response(self, url: &str, response: Vec<u8>) -> Self {
            self.http_responses.lock().unwrap().insert(url.to_string(), response);
            self
        }
    }

    #[async_trait]
    impl RpcCapability for MockRpc {
        async fn rpc_call(&self, _url: &str, method: &str, _params: Value) -> Result<Value, RpcError> {
            self.responses
                .lock()
                .unwrap()
                .get(method)
                .cloned()
                .ok_or_else(|| RpcError::Remote { method: method.to_string(), code: -32601, message: "method not mocked".into() })
        }

        async fn http_get(&self, url: &str) -> Result<Vec<u8>, RpcError> {
            self.http_responses
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| RpcError::Remote { method: "http_get".into(), code: -1, message: format!("url not mocked: {url}") })
        }

        async fn http_post(&self, url: &str, _body: Vec<u8>, _content_type: &str) -> Result<Vec<u8>, RpcError> {
            self.http_get(url).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockRpc;
    use super::*;

    #[tokio::test]
    async fn mock_rpc_returns_canned_response() {
        let mock = MockRpc::new().with_response("eth_getTransactionCount", serde_json::json!("0x5"));
        let result = mock.rpc_call("http://localhost", "eth_getTransactionCount", serde_json::json!([])).await.unwrap();
        assert_eq!(result, serde_json::json!("0x5"));
    }

    #[tokio::test]
    async fn mock_rpc_errors_on_unmocked_method() {
        let mock = MockRpc::new();
        assert!(mock.rpc_call("http://localhost", "eth_chainId", serde_json::json!([])).await.is_err());
    }
}
