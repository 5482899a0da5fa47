//! Customer orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_core::{OrderId, OrderStatus, ProductId, UserId};

/// Customer reference on an order: a bare email or an embedded user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderCustomer {
    Email(String),
    User {
        #[serde(default, alias = "_id")]
        id: Option<UserId>,
        email: String,
        #[serde(default, rename = "firstName")]
        first_name: Option<String>,
        #[serde(default, rename = "lastName")]
        last_name: Option<String>,
    },
}

impl OrderCustomer {
    /// Customer email in either shape.
    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::Email(email) | Self::User { email, .. } => email,
        }
    }
}

/// Product reference on an order line: a bare id or an embedded product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderProduct {
    Id(ProductId),
    Embedded {
        #[serde(alias = "_id")]
        id: ProductId,
        name: String,
    },
}

impl OrderProduct {
    /// Product id in either shape.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        match self {
            Self::Id(id) | Self::Embedded { id, .. } => id,
        }
    }

    /// Product name, when embedded.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Embedded { name, .. } => Some(name),
        }
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: OrderProduct,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl OrderItem {
    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Delivery address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// Non-empty parts joined with `", "`.
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// An order as listed by `GET /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: OrderId,
    /// Human-facing order number, when the backend assigns one.
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(alias = "customer")]
    pub user: OrderCustomer,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub sub_total: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Order number to display: `order_id` when set, the record id otherwise.
    #[must_use]
    pub fn display_number(&self) -> &str {
        self.order_id.as_deref().unwrap_or_else(|| self.id.as_str())
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
