//! Product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{ProductId, ReviewId};

/// Star rating between 1 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Numeric value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Filled and empty stars, e.g. `★★★☆☆`.
    #[must_use]
    pub fn stars(self) -> String {
        let filled = usize::from(self.0);
        let empty = usize::from(Self::MAX) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("rating must be between 1 and 5, got {value}"))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(alias = "_id")]
    pub id: ReviewId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    pub rating: Rating,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Reviewer shown in tables: name, then email, then `"Anonymous"`.
    #[must_use]
    pub fn author(&self) -> &str {
        self.user_name
            .as_deref()
            .or(self.user_email.as_deref())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("Anonymous")
    }
}
