//! Status and role enums for back-office entities.

use serde::{Deserialize, Serialize};

/// Error returned when parsing one of the enums in this module.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    /// Name of the enum being parsed.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}

/// Badge styling used when rendering a status or role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeVariant {
    Default,
    Success,
    Info,
    Warning,
    Danger,
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire value (`"processing"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Badge variant shown in order tables.
    #[must_use]
    pub const fn badge(self) -> BadgeVariant {
        match self {
            Self::Delivered => BadgeVariant::Success,
            Self::Processing => BadgeVariant::Info,
            Self::Cancelled => BadgeVariant::Danger,
            Self::Shipped => BadgeVariant::Warning,
            Self::Pending => BadgeVariant::Default,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "order status",
                value: s.to_owned(),
            })
    }
}

/// Role attached to a user account.
///
/// `User` is the backend's legacy spelling of a customer account; it can be
/// read but the user form only offers `Admin`, `Staff` and `Customer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Staff,
    #[default]
    Customer,
    User,
}

impl UserRole {
    /// Roles an administrator may assign through the user form.
    pub const ASSIGNABLE: [Self; 3] = [Self::Admin, Self::Staff, Self::Customer];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Customer => "customer",
            Self::User => "user",
        }
    }

    /// Whether the user form may assign this role.
    #[must_use]
    pub const fn is_assignable(self) -> bool {
        !matches!(self, Self::User)
    }

    /// Badge variant shown in the users table.
    #[must_use]
    pub const fn badge(self) -> BadgeVariant {
        match self {
            Self::Admin => BadgeVariant::Danger,
            _ => BadgeVariant::Default,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "customer" => Ok(Self::Customer),
            "user" => Ok(Self::User),
            _ => Err(ParseEnumError {
                kind: "user role",
                value: s.to_owned(),
            }),
        }
    }
}

/// Severity of an in-app notification or toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}
