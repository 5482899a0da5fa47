//! `/analytics` endpoints backing the dashboard and analytics pages.

use tracing::instrument;

use super::{AdminApi, decode_entity};
use crate::api::{ApiError, ApiRequest};
use crate::cache::Tag;
use crate::models::{BusinessMetrics, CategorySales, MonthlyRevenue};

/// Months of revenue shown when the caller does not choose.
pub const DEFAULT_REVENUE_MONTHS: u32 = 12;

impl AdminApi {
    /// Revenue per month for the last `months` months (default 12).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the series does not decode.
    #[instrument(skip(self))]
    pub async fn monthly_revenue(&self, months: Option<u32>) -> Result<Vec<MonthlyRevenue>, ApiError> {
        let months = months.unwrap_or(DEFAULT_REVENUE_MONTHS).max(1);
        let request = ApiRequest::get(["analytics", "monthly-revenue"]).param("months", months);
        let body = self.cache.query(&self.api, Tag::Analytics, request).await?;
        decode_entity(body, "revenue")
    }

    /// Sales per product category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the breakdown does not decode.
    #[instrument(skip(self))]
    pub async fn sales_by_category(&self) -> Result<Vec<CategorySales>, ApiError> {
        let request = ApiRequest::get(["analytics", "sales-by-category"]);
        let body = self.cache.query(&self.api, Tag::Analytics, request).await?;
        decode_entity(body, "categories")
    }

    /// Headline dashboard figures.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the metrics do not decode.
    #[instrument(skip(self))]
    pub async fn business_metrics(&self) -> Result<BusinessMetrics, ApiError> {
        let request = ApiRequest::get(["analytics", "business-metrics"]);
        let body = self.cache.query(&self.api, Tag::Analytics, request).await?;
        decode_entity(body, "metrics")
    }
}
