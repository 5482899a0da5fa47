//! `/reviews` endpoints.

use tracing::instrument;

use backoffice_core::{ProductId, ReviewId};

use super::{AdminApi, DeletableEndpoint, FilterState, ListEndpoint};
use crate::api::{ApiError, ApiRequest};
use crate::cache::Tag;
use crate::config::AdminConfig;
use crate::models::Review;

/// `GET /reviews` with `page`, `limit`, `sortBy`, `sortOrder`, optionally
/// narrowed to one product.
#[derive(Debug, Clone, Default)]
pub struct ReviewsEndpoint {
    pub product_id: Option<ProductId>,
}

impl ReviewsEndpoint {
    /// Reviews across every product.
    #[must_use]
    pub const fn all() -> Self {
        Self { product_id: None }
    }

    /// Reviews of one product.
    #[must_use]
    pub const fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
        }
    }
}

impl ListEndpoint for ReviewsEndpoint {
    type Item = Review;
    const TAG: Tag = Tag::Review;

    fn default_limit(config: &AdminConfig) -> u32 {
        config.product_page_size
    }

    fn request(&self, filter: &FilterState) -> ApiRequest {
        filter
            .apply(ApiRequest::get(["reviews"]))
            .opt_param("productId", self.product_id.as_ref())
    }
}

impl DeletableEndpoint for ReviewsEndpoint {
    type Id = ReviewId;
    const NOUN: &'static str = "review";
    const DELETE_INVALIDATES: &'static [Tag] = &[Tag::Review];

    fn delete_request(&self, id: &ReviewId) -> ApiRequest {
        ApiRequest::delete(["reviews", id.as_str()])
    }
}

impl AdminApi {
    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the delete.
    #[instrument(skip(self), fields(review_id = %id))]
    pub async fn delete_review(&self, id: &ReviewId) -> Result<(), ApiError> {
        self.delete(&ReviewsEndpoint::all(), id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_scopes_to_product() {
        let filter = FilterState::new(10);
        let all = ReviewsEndpoint::all().request(&filter);
        assert_eq!(all.canonical_params(), "limit=10&page=1");

        let scoped = ReviewsEndpoint::for_product(ProductId::new("p1")).request(&filter);
        assert_eq!(scoped.path(), "/reviews");
        assert_eq!(scoped.canonical_params(), "limit=10&page=1&productId=p1");
    }
}
