//! REST API client adapter.
//!
//! Wraps an HTTP transport, injects the bearer token from durable storage,
//! clears the stored session on `401`, and normalizes every failure into the
//! uniform [`ApiError`] shape `{ status, data }`. Nothing is thrown past this
//! boundary: callers always get a `Result`.
//!
//! # Architecture
//!
//! - [`ApiRequest`] describes a call (`method`, path segments, query params, JSON body)
//! - [`ApiClient`] resolves it against the configured base URL and dispatches it
//! - [`HttpTransport`] is the seam to the network; [`ReqwestTransport`] is the real one

pub mod client;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;

pub use client::ApiClient;
pub use transport::{
    HttpTransport, ReqwestTransport, TransportError, TransportRequest, TransportResponse,
};

use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

// =============================================================================
// Requests
// =============================================================================

/// HTTP verbs used by the back-office API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Upper-case verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path segments below the base URL (each one is percent-encoded on send).
    pub segments: Vec<String>,
    /// Query parameters, in insertion order.
    pub params: Vec<(String, String)>,
    /// JSON request body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request for `segments` (e.g. `["users", "42"]`).
    pub fn new<I, S>(method: HttpMethod, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            params: Vec::new(),
            body: None,
        }
    }

    /// `GET` request.
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Get, segments)
    }

    /// `POST` request.
    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Post, segments)
    }

    /// `PUT` request.
    pub fn put<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Put, segments)
    }

    /// `PATCH` request.
    pub fn patch<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Patch, segments)
    }

    /// `DELETE` request.
    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Delete, segments)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_owned(), value.to_string()));
        self
    }

    /// Append a query parameter unless it is `None` or blank.
    #[must_use]
    pub fn opt_param(self, key: &str, value: Option<impl ToString>) -> Self {
        match value.map(|v| v.to_string()) {
            Some(v) if !v.trim().is_empty() => self.param(key, v),
            _ => self,
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns a `PARSE_ERROR` `ApiError` if `body` cannot be represented as JSON.
    pub fn json(mut self, body: &impl Serialize) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::parse(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Slash-joined path, for logging and cache keys.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Query parameters rendered as `a=1&b=2`, sorted by key.
    #[must_use]
    pub fn canonical_params(&self) -> String {
        let mut params = self.params.clone();
        params.sort();
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish()
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Status half of the uniform error shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiStatus {
    /// The server answered with a non-success HTTP status.
    Http(u16),
    /// No response was received (network unreachable, timeout, bad URL).
    FetchError,
    /// A response arrived but could not be decoded into the expected shape.
    ParseError,
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(code) => write!(f, "{code}"),
            Self::FetchError => f.write_str("FETCH_ERROR"),
            Self::ParseError => f.write_str("PARSE_ERROR"),
        }
    }
}

impl Serialize for ApiStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Http(code) => serializer.serialize_u16(*code),
            Self::FetchError => serializer.serialize_str("FETCH_ERROR"),
            Self::ParseError => serializer.serialize_str("PARSE_ERROR"),
        }
    }
}

/// Uniform API failure: `{ status, data }`.
///
/// `data` is the server's response body when there was one, or the failure
/// description as a JSON string otherwise.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("API request failed ({status}): {}", self.message().unwrap_or("no message"))]
pub struct ApiError {
    /// HTTP status or failure class.
    pub status: ApiStatus,
    /// Response body or failure description.
    pub data: Value,
}

impl ApiError {
    /// Non-success HTTP response.
    #[must_use]
    pub const fn http(status: u16, data: Value) -> Self {
        Self {
            status: ApiStatus::Http(status),
            data,
        }
    }

    /// Request never produced a response.
    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::FetchError,
            data: Value::String(message.into()),
        }
    }

    /// Response could not be decoded.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::ParseError,
            data: Value::String(message.into()),
        }
    }

    /// HTTP status code, if the server answered.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self.status {
            ApiStatus::Http(code) => Some(code),
            _ => None,
        }
    }

    /// Whether this is a `401 Unauthorized`.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status, ApiStatus::Http(401))
    }

    /// Human-readable message: `data.message` when present, or `data` itself when it is a string.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.data {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Object(map) => map
                .get("message")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}
