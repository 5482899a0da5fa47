//! Catalogue products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_core::ProductId;

/// Stock level at or below which a product is flagged on the dashboard.
pub const LOW_STOCK_THRESHOLD: u32 = 15;

/// A product as listed by `GET /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub dress_style: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub old_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount_percentage: Option<Decimal>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub average_ratings: Option<f64>,
    #[serde(default, alias = "image")]
    pub images: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether stock is at or below `threshold`.
    #[must_use]
    pub const fn is_low_stock(&self, threshold: u32) -> bool {
        self.stock <= threshold
    }

    /// Whether the product is on sale (`old_price` above `price`).
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.old_price.is_some_and(|old| old > self.price)
    }

    /// First image, used as the table thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Body of `POST /products` and `PATCH /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub old_price: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_percentage: Option<Decimal>,
    pub category: String,
    pub dress_style: String,
    pub stock: u32,
    pub in_stock: bool,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
}

/// Body of the quick-edit `PATCH /products/{id}`: only price and stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStockPayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_minimal_product() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Classic White T-Shirt",
            "price": 19.99,
            "image": ["https://cdn.example.com/tee.jpg"]
        }))
        .unwrap();

        assert_eq!(product.price, Decimal::new(1999, 2));
        assert_eq!(product.old_price, None);
        assert_eq!(product.stock, 0);
        assert_eq!(product.thumbnail(), Some("https://cdn.example.com/tee.jpg"));
        assert!(product.created_at.is_none());
    }

    #[test]
    fn test_low_stock_and_discount() {
        let product: Product = serde_json::from_value(json!({
            "id": "p2",
            "name": "Velvet Blazer",
            "category": "Formal",
            "price": 120,
            "oldPrice": 150,
            "discountPercentage": 20,
            "stock": 15,
            "inStock": true
        }))
        .unwrap();

        assert_eq!(product.discount_percentage, Some(Decimal::new(20, 0)));
        assert_eq!(product.in_stock, Some(true));

        assert!(product.is_low_stock(LOW_STOCK_THRESHOLD));
        assert!(!product.is_low_stock(10));
        assert!(product.is_discounted());
    }

    #[test]
    fn test_payload_serializes_numbers() {
        let payload = ProductPayload {
            name: "Tee".to_string(),
            description: "A plain cotton tee".to_string(),
            price: Decimal::new(1999, 2),
            old_price: None,
            discount_percentage: Some(Decimal::new(15, 0)),
            category: "Casual".to_string(),
            dress_style: "Casual".to_string(),
            stock: 4,
            in_stock: true,
            colors: vec!["white".to_string()],
            sizes: vec!["M".to_string(), "L".to_string()],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["price"], json!(19.99));
        assert_eq!(value["dressStyle"], "Casual");
        assert_eq!(value["discountPercentage"], json!(15.0));
        assert_eq!(value["inStock"], json!(true));
        assert!(value.get("oldPrice").is_none());
    }

    #[test]
    fn test_stock_payload_is_partial() {
        let payload = ProductStockPayload {
            price: Decimal::new(2450, 2),
            stock: 7,
        };
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            json!({ "price": 24.5, "stock": 7 })
        );
    }
}
