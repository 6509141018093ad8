//! # HTTP Transport
//!
//! The seam between the SDK and the network. Everything remote goes through
//! the [`Transport`] trait, so tests drive the full client against a mock
//! and production uses the `reqwest`-backed [`HttpTransport`].
//!
//! POST bodies are serialized in canonical (sorted-key) form. The remote
//! services re-canonicalize signed payloads themselves, but posting the
//! sorted form keeps request bytes reproducible across SDK implementations.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::signing::canonical_json;

/// Request timeout for remote calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Connect timeout for remote calls.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A remote call failed before producing a usable response body.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Generic HTTP failure (timeouts, TLS, protocol errors).
    #[error("transport failure: {0}")]
    Http(String),

    /// The host could not be reached at all.
    #[error("cannot connect to {0}")]
    Connection(String),

    /// The response body was not JSON.
    #[error("failed to parse response body: {0}")]
    Parse(String),

    /// The remote answered with a non-success status code.
    #[error("remote returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for the error message.
        body: String,
    },
}

/// A decoded remote response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, lower-cased names.
    pub headers: HashMap<String, String>,
    /// Parsed JSON body.
    pub body: Value,
}

impl TransportResponse {
    /// Return the body of a 2xx response, or a [`TransportError::Status`].
    pub fn into_body(self) -> Result<Value, TransportError> {
        if (200..300).contains(&self.status) {
            Ok(self.body)
        } else {
            let mut body = self.body.to_string();
            body.truncate(512);
            Err(TransportError::Status {
                status: self.status,
                body,
            })
        }
    }
}

/// The remote-call seam.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a URL with optional query parameters.
    async fn get(
        &self,
        url: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<TransportResponse, TransportError>;

    /// POST a JSON body to a URL.
    async fn post(&self, url: &str, body: &Value) -> Result<TransportResponse, TransportError>;
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// Production transport over `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with the SDK's default timeouts.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Http(e.to_string()))?;
        Ok(Self { client })
    }

    async fn decode(response: reqwest::Response) -> Result<TransportResponse, TransportError> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_lowercase(), v.to_string()))
            })
            .collect();

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;
        // Some endpoints answer errors with empty or plain-text bodies.
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }

    fn map_error(url: &str, error: reqwest::Error) -> TransportError {
        if error.is_connect() {
            TransportError::Connection(url.to_string())
        } else {
            TransportError::Http(error.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<TransportResponse, TransportError> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(params) = params {
            request = request.query(params);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::map_error(url, e))?;
        Self::decode(response).await
    }

    async fn post(&self, url: &str, body: &Value) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(canonical_json(body))
            .send()
            .await
            .map_err(|e| Self::map_error(url, e))?;
        Self::decode(response).await
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_status_yields_body() {
        let response = TransportResponse {
            status: 200,
            headers: HashMap::new(),
            body: serde_json::json!({"ok": true}),
        };
        assert_eq!(response.into_body().unwrap(), serde_json::json!({"ok": true}));
    }

    #[test]
    fn error_status_yields_status_error() {
        let response = TransportResponse {
            status: 404,
            headers: HashMap::new(),
            body: serde_json::json!({"error": "not found"}),
        };
        assert!(matches!(
            response.into_body(),
            Err(TransportError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn transport_builds() {
        assert!(HttpTransport::new().is_ok());
    }
}
