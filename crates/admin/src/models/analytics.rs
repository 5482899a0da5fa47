//! Dashboard and analytics aggregates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Revenue for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// Month label as sent by the server (e.g. `"Jan"` or `"2026-01"`).
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(default)]
    pub orders: u64,
}

/// Sales share of one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySales {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub sales: Decimal,
    #[serde(default)]
    pub percentage: f64,
}

/// Headline figures for the dashboard cards.
///
/// Growth values are percentages relative to the previous period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessMetrics {
    pub total_users: u64,
    pub user_growth: f64,
    pub total_products: u64,
    pub product_growth: f64,
    pub total_orders: u64,
    pub order_growth: f64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub revenue_growth: f64,
}
