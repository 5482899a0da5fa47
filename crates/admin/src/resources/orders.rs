//! `/orders` endpoints.

use serde::Serialize;
use tracing::instrument;

use backoffice_core::{OrderId, OrderStatus};

use super::{AdminApi, FilterState, ListEndpoint, decode_entity};
use crate::api::{ApiError, ApiRequest};
use crate::cache::Tag;
use crate::config::AdminConfig;
use crate::models::Order;

/// `GET /orders` with `page`, `limit`, `status`, `search`, `sortBy`, `sortOrder`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdersEndpoint;

impl ListEndpoint for OrdersEndpoint {
    type Item = Order;
    const TAG: Tag = Tag::Order;

    fn default_limit(config: &AdminConfig) -> u32 {
        config.page_size
    }

    fn request(&self, filter: &FilterState) -> ApiRequest {
        filter.apply(ApiRequest::get(["orders"]))
    }
}

#[derive(Serialize)]
struct StatusBody {
    status: OrderStatus,
}

impl AdminApi {
    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the order does not decode.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let body = self
            .cache
            .query(&self.api, Tag::Order, ApiRequest::get(["orders", id.as_str()]))
            .await?;
        decode_entity(body, "order")
    }

    /// Move an order to `status`. Revenue figures are invalidated with it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the transition.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), ApiError> {
        let request =
            ApiRequest::patch(["orders", id.as_str(), "status"]).json(&StatusBody { status })?;
        self.mutate(request, &[Tag::Order, Tag::Analytics]).await?;
        tracing::info!("Order status updated");
        Ok(())
    }
}
