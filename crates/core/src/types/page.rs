//! Paginated list envelope shared by every list endpoint.
//!
//! The backend answers list requests in one of two envelopes:
//!
//! ```json
//! { "items": [...], "meta": { "page": 1, "limit": 10, "totalItems": 42, "totalPages": 5 } }
//! { "users": [...], "pagination": { "page": 1, "limit": 20, "total": 42, "pages": 3 } }
//! ```
//!
//! Both decode into [`Paginated`]. `totalPages` is always recomputed from
//! `totalItems` and `limit`, and a page holding more items than `limit` is
//! rejected, so every `Paginated` satisfies
//! `items.len() <= limit` and `total_pages == ceil(total_items / limit)`.

use serde::{Deserialize, Serialize};

/// Errors raised when a page envelope violates its invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// `limit` was zero.
    #[error("page limit must be at least 1")]
    ZeroLimit,
    /// More items than `limit` were returned.
    #[error("page holds {len} items but limit is {limit}")]
    Overfull {
        /// Number of items received.
        len: usize,
        /// Declared page size.
        limit: u32,
    },
}

/// Pagination metadata for one page snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// 1-based page number the server answered for.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Items across all pages.
    pub total_items: u64,
    /// `ceil(total_items / limit)`.
    pub total_pages: u32,
}

impl PageMeta {
    /// Build metadata, deriving `total_pages`.
    ///
    /// # Errors
    ///
    /// Returns `PageError::ZeroLimit` if `limit` is zero.
    pub fn new(page: u32, limit: u32, total_items: u64) -> Result<Self, PageError> {
        Ok(Self {
            page: page.max(1),
            limit,
            total_items,
            total_pages: Self::pages_for(total_items, limit)?,
        })
    }

    /// Number of pages needed for `total_items` at `limit` per page.
    ///
    /// # Errors
    ///
    /// Returns `PageError::ZeroLimit` if `limit` is zero.
    pub fn pages_for(total_items: u64, limit: u32) -> Result<u32, PageError> {
        if limit == 0 {
            return Err(PageError::ZeroLimit);
        }
        let pages = total_items.div_ceil(u64::from(limit));
        Ok(u32::try_from(pages).unwrap_or(u32::MAX))
    }

    /// Clamp a requested page into `1..=max(1, total_pages)`.
    #[must_use]
    pub fn clamp_page(&self, requested: u32) -> u32 {
        requested.min(self.total_pages).max(1)
    }

    /// "Showing X-Y of Z" bounds for `page`.
    ///
    /// Returns `(0, 0, 0)` when the result set is empty.
    #[must_use]
    pub fn showing(&self, page: u32) -> (u64, u64, u64) {
        if self.total_items == 0 {
            return (0, 0, 0);
        }
        let page = u64::from(self.clamp_page(page));
        let limit = u64::from(self.limit);
        let from = (page - 1) * limit + 1;
        let to = (page * limit).min(self.total_items);
        (from, to, self.total_items)
    }
}

/// One immutable page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPage<T>")]
#[serde(bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize"))]
pub struct Paginated<T> {
    /// Items on this page, in server order.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Build a page, checking invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if `limit` is zero or `items` exceeds `limit`.
    pub fn new(items: Vec<T>, page: u32, limit: u32, total_items: u64) -> Result<Self, PageError> {
        let meta = PageMeta::new(page, limit, total_items)?;
        if items.len() > limit as usize {
            return Err(PageError::Overfull {
                len: items.len(),
                limit,
            });
        }
        Ok(Self { items, meta })
    }

    /// An empty first page.
    #[must_use]
    pub const fn empty(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            meta: PageMeta {
                page: 1,
                limit,
                total_items: 0,
                total_pages: 0,
            },
        }
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the items while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[derive(Deserialize)]
struct RawPage<T> {
    #[serde(
        alias = "users",
        alias = "products",
        alias = "orders",
        alias = "reviews",
        alias = "faqs"
    )]
    items: Vec<T>,
    #[serde(default, alias = "pagination")]
    meta: Option<RawMeta>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMeta {
    page: Option<u32>,
    limit: Option<u32>,
    #[serde(alias = "total")]
    total_items: Option<u64>,
}

impl<T> TryFrom<RawPage<T>> for Paginated<T> {
    type Error = PageError;

    fn try_from(raw: RawPage<T>) -> Result<Self, Self::Error> {
        let len = raw.items.len();
        let (page, limit, total) = raw.meta.map_or((None, None, None), |m| {
            (m.page, m.limit, m.total_items)
        });
        // Unpaginated responses are treated as a single complete page.
        let fallback_limit = u32::try_from(len).unwrap_or(u32::MAX).max(1);
        Self::new(
            raw.items,
            page.unwrap_or(1),
            limit.unwrap_or(fallback_limit),
            total.unwrap_or(len as u64),
        )
    }
}
