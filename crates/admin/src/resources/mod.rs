//! Per-resource queries and mutations.
//!
//! [`AdminApi`] pairs the [`ApiClient`] with the [`QueryCache`]. Reads go
//! through the cache under their resource [`Tag`]; writes go straight to the
//! server and, once they succeed, invalidate the tags they affect so active
//! list views refetch.
//!
//! Each resource lives in its own module and adds its operations to
//! `AdminApi` in a separate `impl` block.

pub mod analytics;
pub mod auth;
pub mod faqs;
pub mod filter;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

pub use faqs::FaqsEndpoint;
pub use filter::{FilterState, Sort, SortOrder};
pub use orders::OrdersEndpoint;
pub use products::ProductsEndpoint;
pub use reviews::ReviewsEndpoint;
pub use users::UsersEndpoint;

use serde::de::DeserializeOwned;
use serde_json::Value;

use backoffice_core::Paginated;

use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::cache::{QueryCache, Tag};
use crate::config::AdminConfig;

// =============================================================================
// Endpoint traits
// =============================================================================

/// A paginated list endpoint.
pub trait ListEndpoint: Send + Sync {
    /// Row type.
    type Item: DeserializeOwned + Clone + Send + Sync + 'static;

    /// Tag the list is cached under.
    const TAG: Tag;

    /// Filter dimensions applied to the fetched page instead of the server
    /// when a list runs in page-local search mode.
    const LOCAL_FILTERS: &'static [&'static str] = &[];

    /// Default page size for this list.
    fn default_limit(config: &AdminConfig) -> u32;

    /// Request for one page.
    fn request(&self, filter: &FilterState) -> ApiRequest;

    /// Whether `item` passes the page-local search and filters in `filter`.
    fn matches_locally(_item: &Self::Item, _filter: &FilterState) -> bool {
        true
    }
}

/// A list endpoint whose rows can be deleted.
pub trait DeletableEndpoint: ListEndpoint {
    /// Row identifier.
    type Id: std::fmt::Display + Send + Sync;

    /// Lower-case noun for toasts (`"user"`, `"FAQ"`).
    const NOUN: &'static str;

    /// Tags invalidated by a delete.
    const DELETE_INVALIDATES: &'static [Tag];

    /// Request deleting the row `id`.
    fn delete_request(&self, id: &Self::Id) -> ApiRequest;
}

// =============================================================================
// AdminApi
// =============================================================================

/// Cached access to the back-office REST API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AdminApi {
    api: ApiClient,
    cache: QueryCache,
}

impl AdminApi {
    #[must_use]
    pub const fn new(api: ApiClient, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Cached read decoded into `T`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body does not decode.
    pub async fn query<T: DeserializeOwned>(
        &self,
        tag: Tag,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let body = self.cache.query(&self.api, tag, request).await?;
        decode(body)
    }

    /// Read that always hits the server, then updates the cache.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body does not decode.
    pub async fn refetch<T: DeserializeOwned>(
        &self,
        tag: Tag,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let body = self.cache.refetch(&self.api, tag, request).await?;
        decode(body)
    }

    /// Run a write and invalidate `tags` once it succeeds.
    ///
    /// The response body is returned undecoded; callers that need the written
    /// entity read it back through the invalidated queries.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails. Nothing is invalidated then,
    /// except on a `401`, which clears the whole cache.
    pub async fn mutate(&self, request: ApiRequest, tags: &[Tag]) -> Result<Value, ApiError> {
        let body = self.api.request(request).await.inspect_err(|e| {
            if e.is_unauthorized() {
                self.cache.clear();
            }
        })?;
        self.cache.invalidate(tags);
        Ok(body)
    }

    /// One page of `endpoint`, from the cache when possible.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the page is malformed.
    pub async fn list<E: ListEndpoint>(
        &self,
        endpoint: &E,
        filter: &FilterState,
    ) -> Result<Paginated<E::Item>, ApiError> {
        self.query(E::TAG, endpoint.request(filter)).await
    }

    /// Delete one row of `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the delete.
    pub async fn delete<E: DeletableEndpoint>(
        &self,
        endpoint: &E,
        id: &E::Id,
    ) -> Result<(), ApiError> {
        self.mutate(endpoint.delete_request(id), E::DELETE_INVALIDATES)
            .await
            .map(|_| ())
    }
}

/// Decode a response body into `T`.
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::parse(e.to_string()))
}

/// Decode a single entity that may arrive bare or wrapped as `{ <key>: ... }` / `{ data: ... }`.
pub(crate) fn decode_entity<T: DeserializeOwned>(body: Value, key: &str) -> Result<T, ApiError> {
    match serde_json::from_value::<T>(body.clone()) {
        Ok(entity) => Ok(entity),
        Err(direct) => [key, "data"]
            .into_iter()
            .find_map(|k| body.get(k).cloned())
            .map_or_else(
                || Err(ApiError::parse(direct.to_string())),
                decode::<T>,
            ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::api::HttpTransport;
    use crate::api::testing::ScriptedTransport;
    use crate::cache::CacheKey;
    use crate::config::CacheConfig;
    use crate::storage::MemoryStore;

    pub(crate) fn admin_api(transport: &Arc<ScriptedTransport>) -> AdminApi {
        let api = ApiClient::new(
            Url::parse("http://localhost:3000/api/").unwrap(),
            Arc::clone(transport) as Arc<dyn HttpTransport>,
            Arc::new(MemoryStore::default()),
        );
        AdminApi::new(api, QueryCache::new(CacheConfig::default()))
    }

    #[test]
    fn test_decode_entity_accepts_wrappers() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Thing {
            name: String,
        }

        let bare: Thing = decode_entity(json!({ "name": "a" }), "thing").unwrap();
        let keyed: Thing = decode_entity(json!({ "thing": { "name": "b" } }), "thing").unwrap();
        let data: Thing = decode_entity(json!({ "data": { "name": "c" } }), "thing").unwrap();
        assert_eq!(bare.name, "a");
        assert_eq!(keyed.name, "b");
        assert_eq!(data.name, "c");

        assert!(decode_entity::<Thing>(json!({ "other": 1 }), "thing").is_err());
    }

    #[tokio::test]
    async fn test_failed_mutation_does_not_invalidate() {
        let transport = ScriptedTransport::new();
        transport.push(500, json!({ "message": "boom" }));
        let admin = admin_api(&transport);

        let err = admin
            .mutate(ApiRequest::delete(["users", "u1"]), &[Tag::User])
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), Some(500));
        assert_eq!(admin.cache().generation(Tag::User), 0);
    }

    #[tokio::test]
    async fn test_successful_mutation_invalidates() {
        let transport = ScriptedTransport::new();
        transport.push(200, json!({ "message": "deleted" }));
        let admin = admin_api(&transport);

        admin
            .mutate(ApiRequest::delete(["users", "u1"]), &[Tag::User, Tag::Analytics])
            .await
            .unwrap();
        assert_eq!(admin.cache().generation(Tag::User), 1);
        assert_eq!(admin.cache().generation(Tag::Analytics), 1);
        assert_eq!(admin.cache().generation(Tag::Order), 0);
    }

    #[tokio::test]
    async fn test_unauthorized_mutation_clears_cache() {
        let transport = ScriptedTransport::new();
        transport.push(200, json!({ "items": [] }));
        transport.push(401, json!({ "message": "Not authorized, token failed" }));
        let admin = admin_api(&transport);
        let products = ApiRequest::get(["products"]);

        admin
            .query::<Value>(Tag::Product, products.clone())
            .await
            .unwrap();
        let err = admin
            .mutate(ApiRequest::delete(["users", "u1"]), &[Tag::User])
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert!(admin.cache().get(&CacheKey::new(Tag::Product, &products)).is_none());
        assert_eq!(admin.cache().generation(Tag::Product), 1);
    }
}
