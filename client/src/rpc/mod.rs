//! # Cell-Node RPC Envelopes
//!
//! The two JSON-RPC 2.0 wire shapes the cell node accepts:
//!
//! **Public** — `params` is the raw data, no signature anywhere:
//!
//! ```json
//! { "jsonrpc": "2.0", "method": "fetchPublic", "id": 301, "params": { "key": "abc" } }
//! ```
//!
//! **Authenticated** — `params` wraps the data in a payload/template pair
//! and attaches the agent's signature block:
//!
//! ```json
//! { "jsonrpc": "2.0", "method": "createProject", "id": 302,
//!   "params": {
//!     "payload": { "data": { ... }, "template": { "name": "create_project" } },
//!     "signature": { "type": "ed25519-sha-256", "created": "...", "creator": "did:ixo:...",
//!                    "signatureValue": "<base64>" } } }
//! ```
//!
//! Request ids are drawn from a non-cryptographic RNG in `[1, 1_000_000]`.
//! They are a correlation hint for matching responses to requests, not a
//! uniqueness guarantee — collisions are accepted.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::{JSONRPC_VERSION, RPC_ID_MAX};

/// Errors surfaced by cell-node RPC exchanges.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The remote service returned an explicit error body.
    #[error("remote service error: {0}")]
    Remote(String),

    /// The response body did not have the expected JSON-RPC shape.
    #[error("malformed remote response: {0}")]
    MalformedResponse(String),
}

/// A JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcMessage {
    /// Always "2.0".
    pub jsonrpc: String,
    /// Remote method name.
    pub method: String,
    /// Correlation id in `[1, 1_000_000]`.
    pub id: u64,
    /// Method parameters; shape depends on public vs authenticated.
    pub params: Value,
}

/// The signature block attached to authenticated cell-node calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellnodeSignature {
    /// Signing algorithm label (the agent account's `algo`).
    #[serde(rename = "type")]
    pub type_: String,
    /// ISO-8601 timestamp of signature creation.
    pub created: String,
    /// The signer's DID.
    pub creator: String,
    /// Base64 signature over the canonicalized request data.
    #[serde(rename = "signatureValue")]
    pub signature_value: String,
}

/// Draw a request id from the non-cryptographic RNG.
pub fn generate_rpc_id() -> u64 {
    rand::thread_rng().gen_range(1..=RPC_ID_MAX)
}

/// Build a public (unsigned) RPC envelope.
pub fn public_rpc_msg(method: &str, data: Value) -> RpcMessage {
    RpcMessage {
        jsonrpc: JSONRPC_VERSION.to_string(),
        method: method.to_string(),
        id: generate_rpc_id(),
        params: data,
    }
}

/// Build an authenticated RPC envelope.
///
/// `template_name` is omitted from the payload entirely when absent, which
/// the cell node distinguishes from an empty template object.
pub fn authenticated_rpc_msg(
    method: &str,
    template_name: Option<&str>,
    data: Value,
    signature: CellnodeSignature,
) -> RpcMessage {
    let mut payload = json!({ "data": data });
    if let Some(name) = template_name {
        payload["template"] = json!({ "name": name });
    }

    RpcMessage {
        jsonrpc: JSONRPC_VERSION.to_string(),
        method: method.to_string(),
        id: generate_rpc_id(),
        params: json!({
            "payload": payload,
            "signature": signature,
        }),
    }
}

/// Extract the `result` member of a cell-node response body.
///
/// An `error` member wins over `result`; a body with neither is malformed.
pub fn extract_result(body: Value) -> Result<Value, RpcError> {
    if let Some(error) = body.get("error") {
        if !error.is_null() {
            return Err(RpcError::Remote(error.to_string()));
        }
    }
    match body.get("result") {
        Some(result) => Ok(result.clone()),
        None => Err(RpcError::MalformedResponse(
            "response has neither result nor error".to_string(),
        )),
    }
}
