//! JSON-RPC gateway to an Ethereum node.
//!
//! One request per call, sequential, no retries. Failures are classified at
//! this boundary: transport problems, remote-reported errors, and responses
//! with no result each map to their own error kind, so callers only ever see
//! a method-specific `result` payload or a typed failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProofGenError, Result};

/// JSON-RPC request wrapper.
#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

/// JSON-RPC response wrapper.
#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Client bound to one RPC endpoint.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Perform one JSON-RPC call and return the raw `result` payload.
    ///
    /// The payload's shape is method-specific and validated by the caller.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        tracing::debug!(method, "sending RPC request");

        let req = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let resp = self
            .http
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| ProofGenError::Transport {
                method: method.to_string(),
                source,
            })?;

        let body: RpcResponse = resp.json().await.map_err(|source| ProofGenError::Transport {
            method: method.to_string(),
            source,
        })?;

        classify(method, body)
    }

    /// Fetch `eth_blockNumber` and return it as a u64.
    pub async fn block_number(&self) -> Result<u64> {
        let result = self.call("eth_blockNumber", serde_json::json!([])).await?;
        let hex_str = result
            .as_str()
            .ok_or_else(|| ProofGenError::missing_field("eth_blockNumber", "result"))?;
        crate::normalize::parse_hex_u64(hex_str)
    }
}

/// Map a decoded response body to its result payload or a typed failure.
fn classify(method: &str, resp: RpcResponse) -> Result<Value> {
    if let Some(err) = resp.error {
        return Err(ProofGenError::Rpc {
            method: method.to_string(),
            code: err.code,
            message: err.message,
        });
    }
    resp.result
        .ok_or_else(|| ProofGenError::missing_field(method, "result"))
}
