//! Product FAQs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{FaqId, ProductId};

/// A question and answer attached to one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    #[serde(alias = "_id")]
    pub id: FaqId,
    pub product_id: ProductId,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /faqs/{productId}` and `PATCH /faqs/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqPayload {
    pub question: String,
    pub answer: String,
}
