//! Page, search, filter and sort parameters of a list view.

use std::collections::BTreeMap;

use crate::api::ApiRequest;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// The other direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sort {
    pub by: String,
    pub order: SortOrder,
}

/// Parameters of a list query.
///
/// Every setter other than [`Self::set_page`] that changes a value resets the
/// page to 1, so a narrower result set is always viewed from its start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    page: u32,
    limit: u32,
    search: String,
    filters: BTreeMap<String, String>,
    sort: Option<Sort>,
}

impl FilterState {
    /// First page of `limit` items with no search, filters or sort.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            search: String::new(),
            filters: BTreeMap::new(),
            sort: None,
        }
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Value of one filter dimension (`"role"`, `"status"`, `"category"`, ...).
    #[must_use]
    pub fn filter(&self, dimension: &str) -> Option<&str> {
        self.filters.get(dimension).map(String::as_str)
    }

    /// All active filter dimensions.
    #[must_use]
    pub const fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    #[must_use]
    pub const fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Go to `page` (at least 1). Keeps every other parameter.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Change the page size.
    pub fn set_limit(&mut self, limit: u32) {
        let limit = limit.max(1);
        if self.limit != limit {
            self.limit = limit;
            self.page = 1;
        }
    }

    /// Change the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if self.search != search {
            self.search = search;
            self.page = 1;
        }
    }

    /// Set a filter dimension. A blank value clears it.
    pub fn set_filter(&mut self, dimension: &str, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            self.clear_filter(dimension);
            return;
        }
        if self.filters.get(dimension) != Some(&value) {
            self.filters.insert(dimension.to_owned(), value);
            self.page = 1;
        }
    }

    /// Remove a filter dimension.
    pub fn clear_filter(&mut self, dimension: &str) {
        if self.filters.remove(dimension).is_some() {
            self.page = 1;
        }
    }

    /// Sort by `by` in `order`.
    pub fn set_sort(&mut self, by: impl Into<String>, order: SortOrder) {
        let sort = Some(Sort {
            by: by.into(),
            order,
        });
        if self.sort != sort {
            self.sort = sort;
            self.page = 1;
        }
    }

    /// Remove sorting.
    pub fn clear_sort(&mut self) {
        if self.sort.take().is_some() {
            self.page = 1;
        }
    }

    /// Copy without the search text and the given filter dimensions.
    #[must_use]
    pub fn without_local(&self, dimensions: &[&str]) -> Self {
        let mut server = self.clone();
        server.search.clear();
        server.filters.retain(|k, _| !dimensions.contains(&k.as_str()));
        server
    }

    /// Add `page`, `limit`, `search`, filters, `sortBy` and `sortOrder` to `request`.
    ///
    /// Blank search and unset sort are omitted.
    #[must_use]
    pub fn apply(&self, request: ApiRequest) -> ApiRequest {
        let mut request = request
            .param("page", self.page)
            .param("limit", self.limit)
            .opt_param("search", Some(self.search.trim()));
        for (dimension, value) in &self.filters {
            request = request.param(dimension, value);
        }
        if let Some(sort) = &self.sort {
            request = request
                .param("sortBy", &sort.by)
                .param("sortOrder", sort.order.as_str());
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page_three() -> FilterState {
        let mut filter = FilterState::new(20);
        filter.set_page(3);
        filter
    }

    #[test]
    fn test_set_page_clamps_to_one() {
        let mut filter = FilterState::new(20);
        filter.set_page(0);
        assert_eq!(filter.page(), 1);
    }

    #[test]
    fn test_every_dimension_resets_page() {
        let mut filter = on_page_three();
        filter.set_search("ada");
        assert_eq!(filter.page(), 1);

        let mut filter = on_page_three();
        filter.set_filter("role", "admin");
        assert_eq!(filter.page(), 1);

        let mut filter = on_page_three();
        filter.set_sort("createdAt", SortOrder::Asc);
        assert_eq!(filter.page(), 1);

        let mut filter = on_page_three();
        filter.set_limit(50);
        assert_eq!(filter.page(), 1);

        filter.set_filter("status", "shipped");
        filter.set_page(2);
        filter.clear_filter("status");
        assert_eq!(filter.page(), 1);
    }

    #[test]
    fn test_unchanged_value_keeps_page() {
        let mut filter = FilterState::new(20);
        filter.set_search("ada");
        filter.set_page(2);
        filter.set_search("ada");
        filter.clear_filter("role");
        assert_eq!(filter.page(), 2);
    }

    #[test]
    fn test_blank_filter_clears_dimension() {
        let mut filter = FilterState::new(20);
        filter.set_filter("category", "Formal");
        filter.set_filter("category", "  ");
        assert_eq!(filter.filter("category"), None);
    }

    #[test]
    fn test_apply_builds_params() {
        let mut filter = FilterState::new(10);
        filter.set_search(" tee ");
        filter.set_filter("category", "Casual");
        filter.set_sort("price", SortOrder::Asc);
        filter.set_page(2);

        let request = filter.apply(ApiRequest::get(["products"]));
        assert_eq!(
            request.canonical_params(),
            "category=Casual&limit=10&page=2&search=tee&sortBy=price&sortOrder=asc"
        );

        let request = FilterState::new(10).apply(ApiRequest::get(["products"]));
        assert_eq!(request.canonical_params(), "limit=10&page=1");
    }

    #[test]
    fn test_without_local_strips_client_side_dimensions() {
        let mut filter = FilterState::new(10);
        filter.set_search("tee");
        filter.set_filter("category", "Casual");
        filter.set_filter("inStock", "true");
        filter.set_page(2);

        let server = filter.without_local(&["category"]);
        assert_eq!(server.search(), "");
        assert_eq!(server.filter("category"), None);
        assert_eq!(server.filter("inStock"), Some("true"));
        assert_eq!(server.page(), 2);
    }
}
