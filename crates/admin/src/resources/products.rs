//! `/products` endpoints.

use tracing::instrument;

use backoffice_core::ProductId;

use super::{AdminApi, DeletableEndpoint, FilterState, ListEndpoint, decode_entity};
use crate::api::{ApiError, ApiRequest};
use crate::cache::Tag;
use crate::config::AdminConfig;
use crate::models::{Product, ProductPayload, ProductStockPayload};

/// `GET /products` with `page`, `limit`, `search`, `category`, `sortBy`, `sortOrder`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductsEndpoint;

impl ListEndpoint for ProductsEndpoint {
    type Item = Product;
    const TAG: Tag = Tag::Product;
    const LOCAL_FILTERS: &'static [&'static str] = &["category"];

    fn default_limit(config: &AdminConfig) -> u32 {
        config.product_page_size
    }

    fn request(&self, filter: &FilterState) -> ApiRequest {
        filter.apply(ApiRequest::get(["products"]))
    }

    /// Case-insensitive name substring and case-insensitive category match.
    fn matches_locally(product: &Product, filter: &FilterState) -> bool {
        let search = filter.search().trim().to_lowercase();
        let name_matches = search.is_empty() || product.name.to_lowercase().contains(&search);
        let category_matches = filter
            .filter("category")
            .is_none_or(|category| product.category.eq_ignore_ascii_case(category.trim()));
        name_matches && category_matches
    }
}

impl DeletableEndpoint for ProductsEndpoint {
    type Id = ProductId;
    const NOUN: &'static str = "product";
    const DELETE_INVALIDATES: &'static [Tag] = &[Tag::Product, Tag::Faq, Tag::Review];

    fn delete_request(&self, id: &ProductId) -> ApiRequest {
        ApiRequest::delete(["products", id.as_str()])
    }
}

impl AdminApi {
    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the product does not decode.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let body = self
            .cache
            .query(
                &self.api,
                Tag::Product,
                ApiRequest::get(["products", id.as_str()]),
            )
            .await?;
        decode_entity(body, "product")
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the product.
    #[instrument(skip(self, payload), fields(name = %payload.name))]
    pub async fn create_product(&self, payload: &ProductPayload) -> Result<(), ApiError> {
        let request = ApiRequest::post(["products"]).json(payload)?;
        self.mutate(request, &[Tag::Product]).await?;
        tracing::info!("Product created");
        Ok(())
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the update.
    #[instrument(skip(self, payload), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        payload: &ProductPayload,
    ) -> Result<(), ApiError> {
        let request = ApiRequest::patch(["products", id.as_str()]).json(payload)?;
        self.mutate(request, &[Tag::Product]).await?;
        tracing::info!("Product updated");
        Ok(())
    }

    /// Change only a product's price and stock.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the update.
    #[instrument(skip(self, payload), fields(product_id = %id, stock = payload.stock))]
    pub async fn update_product_stock(
        &self,
        id: &ProductId,
        payload: &ProductStockPayload,
    ) -> Result<(), ApiError> {
        let request = ApiRequest::patch(["products", id.as_str()]).json(payload)?;
        self.mutate(request, &[Tag::Product]).await?;
        tracing::info!("Product price and stock updated");
        Ok(())
    }

    /// Delete a product. Its FAQs and reviews are invalidated too.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the delete.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        self.delete(&ProductsEndpoint, id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::api::HttpMethod;
    use crate::api::testing::ScriptedTransport;
    use crate::resources::tests::admin_api;

    fn product(name: &str, category: &str) -> Product {
        serde_json::from_value(json!({
            "_id": name,
            "name": name,
            "category": category,
            "price": 10
        }))
        .unwrap()
    }

    #[test]
    fn test_matches_locally() {
        let tee = product("Classic White Tee", "Casual");
        let mut filter = FilterState::new(10);
        assert!(ProductsEndpoint::matches_locally(&tee, &filter));

        filter.set_search("white");
        assert!(ProductsEndpoint::matches_locally(&tee, &filter));

        filter.set_filter("category", "casual");
        assert!(ProductsEndpoint::matches_locally(&tee, &filter));

        filter.set_filter("category", "Formal");
        assert!(!ProductsEndpoint::matches_locally(&tee, &filter));

        filter.clear_filter("category");
        filter.set_search("gown");
        assert!(!ProductsEndpoint::matches_locally(&tee, &filter));
    }

    #[tokio::test]
    async fn test_create_product_posts_payload() {
        let transport = ScriptedTransport::new();
        transport.push(201, json!({ "_id": "p9" }));
        let admin = admin_api(&transport);

        let payload = ProductPayload {
            name: "Tee".to_string(),
            description: "A plain cotton tee".to_string(),
            price: Decimal::new(1999, 2),
            old_price: None,
            discount_percentage: None,
            category: "Casual".to_string(),
            dress_style: "Casual".to_string(),
            stock: 3,
            in_stock: true,
            colors: vec![],
            sizes: vec![],
        };
        admin.create_product(&payload).await.unwrap();

        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.url.path(), "/api/products");
        assert_eq!(sent.body.unwrap()["price"], json!(19.99));
        assert_eq!(admin.cache().generation(Tag::Product), 1);
    }

    #[tokio::test]
    async fn test_update_product_stock_sends_only_price_and_stock() {
        let transport = ScriptedTransport::new();
        transport.push(200, json!({ "_id": "p1" }));
        let admin = admin_api(&transport);

        let payload = ProductStockPayload {
            price: Decimal::new(2450, 2),
            stock: 7,
        };
        admin
            .update_product_stock(&ProductId::new("p1"), &payload)
            .await
            .unwrap();

        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.url.path(), "/api/products/p1");
        assert_eq!(sent.body.unwrap(), json!({ "price": 24.5, "stock": 7 }));
        assert_eq!(admin.cache().generation(Tag::Product), 1);
    }

    #[tokio::test]
    async fn test_delete_product_invalidates_dependents() {
        let transport = ScriptedTransport::new();
        transport.push(204, serde_json::Value::Null);
        let admin = admin_api(&transport);

        admin.delete_product(&ProductId::new("p1")).await.unwrap();
        for tag in [Tag::Product, Tag::Faq, Tag::Review] {
            assert_eq!(admin.cache().generation(tag), 1);
        }
    }
}
