//! Cache keys and invalidation tags.

use crate::api::ApiRequest;

/// Coarse invalidation label shared by the reads and writes of one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    User,
    Product,
    Order,
    Review,
    Faq,
    Analytics,
}

impl Tag {
    /// Every tag.
    pub const ALL: [Self; 6] = [
        Self::User,
        Self::Product,
        Self::Order,
        Self::Review,
        Self::Faq,
        Self::Analytics,
    ];

    /// Tag name as used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Product => "Product",
            Self::Order => "Order",
            Self::Review => "Review",
            Self::Faq => "Faq",
            Self::Analytics => "Analytics",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a cached read: resource tag, endpoint path and sorted query parameters.
///
/// Two requests with the same parameters in a different order map to the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Resource tag the read belongs to.
    pub tag: Tag,
    /// Endpoint path, e.g. `/faqs/p1`.
    pub endpoint: String,
    /// Query string with parameters sorted by key.
    pub params: String,
}

impl CacheKey {
    /// Derive the key for `request` under `tag`.
    #[must_use]
    pub fn new(tag: Tag, request: &ApiRequest) -> Self {
        Self {
            tag,
            endpoint: request.path(),
            params: request.canonical_params(),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}:{}", self.tag, self.endpoint)
        } else {
            write!(f, "{}:{}?{}", self.tag, self.endpoint, self.params)
        }
    }
}
