//! `/faqs` endpoints.
//!
//! FAQs are listed and created under their product (`/faqs/{productId}`) but
//! updated and deleted by their own id (`/faqs/{id}`).

use tracing::instrument;

use backoffice_core::{FaqId, ProductId};

use super::{AdminApi, DeletableEndpoint, FilterState, ListEndpoint};
use crate::api::{ApiError, ApiRequest};
use crate::cache::Tag;
use crate::config::AdminConfig;
use crate::models::{Faq, FaqPayload};

/// `GET /faqs/{productId}` with `page` and `limit`.
#[derive(Debug, Clone)]
pub struct FaqsEndpoint {
    pub product_id: ProductId,
}

impl FaqsEndpoint {
    #[must_use]
    pub const fn new(product_id: ProductId) -> Self {
        Self { product_id }
    }
}

impl ListEndpoint for FaqsEndpoint {
    type Item = Faq;
    const TAG: Tag = Tag::Faq;

    fn default_limit(config: &AdminConfig) -> u32 {
        config.product_page_size
    }

    fn request(&self, filter: &FilterState) -> ApiRequest {
        ApiRequest::get(["faqs", self.product_id.as_str()])
            .param("page", filter.page())
            .param("limit", filter.limit())
    }
}

impl DeletableEndpoint for FaqsEndpoint {
    type Id = FaqId;
    const NOUN: &'static str = "FAQ";
    const DELETE_INVALIDATES: &'static [Tag] = &[Tag::Faq];

    fn delete_request(&self, id: &FaqId) -> ApiRequest {
        ApiRequest::delete(["faqs", id.as_str()])
    }
}

impl AdminApi {
    /// Add a FAQ to a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the FAQ.
    #[instrument(skip(self, payload), fields(product_id = %product_id))]
    pub async fn create_faq(
        &self,
        product_id: &ProductId,
        payload: &FaqPayload,
    ) -> Result<(), ApiError> {
        let request = ApiRequest::post(["faqs", product_id.as_str()]).json(payload)?;
        self.mutate(request, &[Tag::Faq]).await?;
        tracing::info!("FAQ created");
        Ok(())
    }

    /// Edit a FAQ.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the update.
    #[instrument(skip(self, payload), fields(faq_id = %id))]
    pub async fn update_faq(&self, id: &FaqId, payload: &FaqPayload) -> Result<(), ApiError> {
        let request = ApiRequest::patch(["faqs", id.as_str()]).json(payload)?;
        self.mutate(request, &[Tag::Faq]).await?;
        tracing::info!("FAQ updated");
        Ok(())
    }

    /// Delete a FAQ.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the delete.
    #[instrument(skip(self), fields(faq_id = %id))]
    pub async fn delete_faq(&self, id: &FaqId) -> Result<(), ApiError> {
        self.mutate(ApiRequest::delete(["faqs", id.as_str()]), &[Tag::Faq])
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::HttpMethod;
    use crate::api::testing::ScriptedTransport;
    use crate::resources::tests::admin_api;

    #[test]
    fn test_list_request_ignores_search() {
        let mut filter = FilterState::new(10);
        filter.set_search("shipping");
        let request = FaqsEndpoint::new(ProductId::new("p1")).request(&filter);
        assert_eq!(request.path(), "/faqs/p1");
        assert_eq!(request.canonical_params(), "limit=10&page=1");
    }

    #[tokio::test]
    async fn test_create_and_update_use_different_paths() {
        let transport = ScriptedTransport::new();
        transport.push(201, json!({}));
        transport.push(200, json!({}));
        let admin = admin_api(&transport);
        let payload = FaqPayload {
            question: "Is it machine washable?".to_string(),
            answer: "Yes, on a cold cycle.".to_string(),
        };

        admin.create_faq(&ProductId::new("p1"), &payload).await.unwrap();
        admin.update_faq(&FaqId::new("f1"), &payload).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].url.path(), "/api/faqs/p1");
        assert_eq!(sent[1].method, HttpMethod::Patch);
        assert_eq!(sent[1].url.path(), "/api/faqs/f1");
        assert_eq!(
            sent[1].body,
            Some(json!({ "question": "Is it machine washable?", "answer": "Yes, on a cold cycle." }))
        );
        assert_eq!(admin.cache().generation(Tag::Faq), 2);
    }
}
