//! Back-office REST API client.

use std::sync::Arc;
use std::time::Instant;

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::{ApiError, ApiRequest, HttpTransport, TransportRequest};
use crate::storage::{AUTH_TOKEN_KEY, AUTH_USER_KEY, SharedStore};

/// REST API client.
///
/// Cheap to clone. Reads the bearer token from durable storage on every
/// request, so a login or logout in another [`crate::state::AppState`]
/// sharing the same store takes effect on the next call.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    storage: SharedStore,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url`.
    #[must_use]
    pub fn new(base_url: Url, transport: Arc<dyn HttpTransport>, storage: SharedStore) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                base_url,
                transport,
                storage,
            }),
        }
    }

    /// Base URL every request path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Durable storage holding the session token.
    #[must_use]
    pub fn storage(&self) -> &SharedStore {
        &self.inner.storage
    }

    /// Resolve `request` to an absolute URL with its query string.
    ///
    /// # Errors
    ///
    /// Returns a `FETCH_ERROR` if the base URL cannot carry path segments.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::fetch(format!("invalid API base URL: {}", self.inner.base_url)))?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.params);
        }
        Ok(url)
    }

    /// Execute a request and return the raw JSON body.
    ///
    /// On `401` the stored session (`authToken`, `authUser`) is removed
    /// before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` with `FETCH_ERROR` when no response arrived, or the
    /// HTTP status and response body for any non-`2xx` answer.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path()))]
    pub async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url_for(&request)?;
        let bearer = self.stored_token();

        let started = Instant::now();
        let outcome = self
            .inner
            .transport
            .send(TransportRequest {
                method: request.method,
                url,
                bearer,
                body: request.body,
            })
            .await;
        let elapsed_ms = started.elapsed().as_millis();

        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, elapsed_ms, "API request failed to complete");
                return Err(ApiError::fetch(e.0));
            }
        };

        tracing::debug!(status = response.status, elapsed_ms, "API response");

        if response.is_success() {
            return Ok(response.body);
        }

        if response.status == 401 {
            tracing::warn!("API returned 401, clearing stored session");
            self.clear_stored_session();
        }

        Err(ApiError::http(response.status, response.body))
    }

    /// Execute a request and decode the response body into `T`.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::request`], plus `PARSE_ERROR` when
    /// the body does not match `T`.
    pub async fn request_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let path = request.path();
        let body = self.request(request).await?;
        serde_json::from_value(body).map_err(|e| {
            tracing::warn!(path = %path, error = %e, "API response did not match expected shape");
            ApiError::parse(e.to_string())
        })
    }

    fn stored_token(&self) -> Option<SecretString> {
        match self.inner.storage.get(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read auth token, sending unauthenticated");
                None
            }
        }
    }

    fn clear_stored_session(&self) {
        for key in [AUTH_TOKEN_KEY, AUTH_USER_KEY] {
            if let Err(e) = self.inner.storage.remove(key) {
                tracing::warn!(key, error = %e, "Failed to clear stored session");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;
    use crate::api::ApiStatus;
    use crate::api::testing::ScriptedTransport;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn client(transport: &Arc<ScriptedTransport>, store: &MemoryStore) -> ApiClient {
        ApiClient::new(
            Url::parse("http://localhost:3000/api/").unwrap(),
            Arc::clone(transport) as Arc<dyn HttpTransport>,
            Arc::new(store.clone()),
        )
    }

    #[test]
    fn test_url_for_encodes_segments_and_params() {
        let api = client(&ScriptedTransport::new(), &MemoryStore::default());

        let request = ApiRequest::get(["faqs", "p 1"]).param("page", 2).param("search", "a&b");
        assert_eq!(
            api.url_for(&request).unwrap().as_str(),
            "http://localhost:3000/api/faqs/p%201?page=2&search=a%26b"
        );

        let bare = ApiRequest::get(["users"]);
        assert_eq!(
            api.url_for(&bare).unwrap().as_str(),
            "http://localhost:3000/api/users"
        );
    }

    #[tokio::test]
    async fn test_request_attaches_stored_token() {
        let store = MemoryStore::default();
        store.set(AUTH_TOKEN_KEY, "abc").unwrap();
        let transport = ScriptedTransport::new();
        transport.push(200, json!({ "ok": true }));
        let api = client(&transport, &store);

        let body = api.request(ApiRequest::get(["users"])).await.unwrap();
        assert_eq!(body, json!({ "ok": true }));
        assert_eq!(transport.last().bearer.unwrap().expose_secret(), "abc");
    }

    #[tokio::test]
    async fn test_request_without_token_is_unauthenticated() {
        let transport = ScriptedTransport::new();
        transport.push(200, Value::Null);
        let api = client(&transport, &MemoryStore::default());

        api.request(ApiRequest::get(["products"])).await.unwrap();
        assert!(transport.last().bearer.is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_clears_stored_session() {
        let store = MemoryStore::default();
        store.set(AUTH_TOKEN_KEY, "abc").unwrap();
        store.set(AUTH_USER_KEY, r#"{"id":"u1"}"#).unwrap();
        let transport = ScriptedTransport::new();
        transport.push(401, json!({ "message": "Token expired" }));
        let api = client(&transport, &store);

        let err = api.request(ApiRequest::get(["orders"])).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.message(), Some("Token expired"));
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(AUTH_USER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_server_error_keeps_session() {
        let store = MemoryStore::default();
        store.set(AUTH_TOKEN_KEY, "abc").unwrap();
        let transport = ScriptedTransport::new();
        transport.push(500, json!({ "message": "boom" }));
        let api = client(&transport, &store);

        let err = api.request(ApiRequest::get(["orders"])).await.unwrap_err();
        assert_eq!(err.status, ApiStatus::Http(500));
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_fetch_error() {
        let transport = ScriptedTransport::new();
        transport.push_error("connection refused");
        let api = client(&transport, &MemoryStore::default());

        let err = api.request(ApiRequest::get(["users"])).await.unwrap_err();
        assert_eq!(err.status, ApiStatus::FetchError);
        assert_eq!(err.message(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_request_json_shape_mismatch_is_parse_error() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Expected {
            token: String,
        }

        let transport = ScriptedTransport::new();
        transport.push(200, json!({ "nope": 1 }));
        let api = client(&transport, &MemoryStore::default());

        let err = api
            .request_json::<Expected>(ApiRequest::post(["auth", "login"]))
            .await
            .unwrap_err();
        assert_eq!(err.status, ApiStatus::ParseError);
    }
}
