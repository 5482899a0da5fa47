//! HTTP transport seam.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::HttpMethod;

/// A fully resolved outgoing request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Absolute URL including query string.
    pub url: Url,
    /// Bearer token for the `Authorization` header.
    pub bearer: Option<SecretString>,
    /// JSON body.
    pub body: Option<Value>,
}

/// A response as seen by the client adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded body: JSON when it parses, a string otherwise, `null` when empty.
    pub body: Value,
}

impl TransportResponse {
    /// Build a response from a status and JSON body.
    #[must_use]
    pub const fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Whether the status is in the `2xx` range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Sends requests over the network.
///
/// [`ReqwestTransport`] is the production implementation; tests substitute
/// an in-memory backend.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Dispatch `request` and return whatever status the server answered with.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` only when no response was received.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(TransportResponse {
            status,
            body: decode_body(&text),
        })
    }
}

/// Decode a response body leniently: JSON, else the raw text, else `null`.
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body(r#"{"ok":true}"#), json!({ "ok": true }));
        assert_eq!(
            decode_body("Bad Gateway"),
            Value::String("Bad Gateway".to_string())
        );
    }

    #[test]
    fn test_response_is_success() {
        assert!(TransportResponse::new(204, Value::Null).is_success());
        assert!(!TransportResponse::new(401, Value::Null).is_success());
        assert!(!TransportResponse::new(302, Value::Null).is_success());
    }
}
