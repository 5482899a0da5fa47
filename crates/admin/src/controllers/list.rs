//! Paginated list views.
//!
//! One [`ListController`] drives each table (users, products, orders,
//! reviews, FAQs). It owns the [`FilterState`], turns it into a request for
//! its [`ListEndpoint`] and tracks the result as a [`LoadState`].

use backoffice_core::{OrderId, OrderStatus, Paginated};
use tracing::instrument;

use crate::api::ApiError;
use crate::cache::{CacheKey, Subscription};
use crate::error::AppError;
use crate::forms::capitalize;
use crate::resources::{DeletableEndpoint, FilterState, ListEndpoint, OrdersEndpoint, SortOrder};
use crate::state::AppState;

/// Where search text and page-local filters are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Sent to the server with the page request.
    #[default]
    Server,
    /// Not sent; [`ListController::visible_items`] filters the fetched page
    /// only, so matches on other pages are not shown.
    CurrentPageOnly,
}

/// Lifecycle of a list's data.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    /// A fetch is in flight. `previous` keeps the last page on screen.
    Loading { previous: Option<Paginated<T>> },
    Success(Paginated<T>),
    Error(ApiError),
}

impl<T> LoadState<T> {
    /// Page to render: the loaded one, or the previous one while reloading.
    #[must_use]
    pub const fn page(&self) -> Option<&Paginated<T>> {
        match self {
            Self::Success(page) | Self::Loading { previous: Some(page) } => Some(page),
            Self::Idle | Self::Loading { previous: None } | Self::Error(_) => None,
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Controller for one paginated table.
pub struct ListController<E: ListEndpoint> {
    state: AppState,
    endpoint: E,
    filter: FilterState,
    search_mode: SearchMode,
    load_state: LoadState<E::Item>,
    /// Tag generation observed when the current data was requested.
    loaded_generation: Option<u64>,
    subscription: Option<Subscription>,
}

impl<E: ListEndpoint + std::fmt::Debug> std::fmt::Debug for ListController<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("endpoint", &self.endpoint)
            .field("filter", &self.filter)
            .field("search_mode", &self.search_mode)
            .field("is_loading", &self.load_state.is_loading())
            .field("loaded_generation", &self.loaded_generation)
            .finish_non_exhaustive()
    }
}

impl<E: ListEndpoint> ListController<E> {
    /// Idle controller on page 1 with the endpoint's default page size.
    #[must_use]
    pub fn new(state: &AppState, endpoint: E) -> Self {
        let limit = E::default_limit(state.config());
        Self {
            state: state.clone(),
            endpoint,
            filter: FilterState::new(limit),
            search_mode: SearchMode::Server,
            load_state: LoadState::Idle,
            loaded_generation: None,
            subscription: None,
        }
    }

    #[must_use]
    pub const fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn endpoint(&self) -> &E {
        &self.endpoint
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    #[must_use]
    pub const fn load_state(&self) -> &LoadState<E::Item> {
        &self.load_state
    }

    /// Page number to display: the requested page clamped to the result.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.load_state.page().map_or_else(
            || self.filter.page(),
            |page| page.meta.clamp_page(self.filter.page()),
        )
    }

    /// `(from, to, total)` for the "Showing X-Y of Z" caption.
    #[must_use]
    pub fn showing(&self) -> (u64, u64, u64) {
        self.load_state
            .page()
            .map_or((0, 0, 0), |page| page.meta.showing(self.filter.page()))
    }

    /// Rows to render. In [`SearchMode::CurrentPageOnly`] the current page is
    /// filtered by the search text and page-local filters.
    #[must_use]
    pub fn visible_items(&self) -> Vec<&E::Item> {
        let Some(page) = self.load_state.page() else {
            return Vec::new();
        };
        match self.search_mode {
            SearchMode::Server => page.items.iter().collect(),
            SearchMode::CurrentPageOnly => page
                .items
                .iter()
                .filter(|item| E::matches_locally(item, &self.filter))
                .collect(),
        }
    }

    /// Whether the list's tag was invalidated since the data was requested.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.loaded_generation
            .is_some_and(|seen| seen != self.state.api().cache().generation(E::TAG))
    }

    // =========================================================================
    // Parameter changes
    // =========================================================================

    /// Go to `page` and load it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the page cannot be fetched.
    pub async fn set_page(&mut self, page: u32) -> Result<(), ApiError> {
        self.filter.set_page(page);
        self.load().await
    }

    /// Change the search text, back to page 1, and load.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the page cannot be fetched.
    pub async fn set_search(&mut self, search: impl Into<String> + Send) -> Result<(), ApiError> {
        self.filter.set_search(search);
        self.load().await
    }

    /// Set or clear (`""`) one filter dimension, back to page 1, and load.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the page cannot be fetched.
    pub async fn set_filter(
        &mut self,
        dimension: &str,
        value: impl Into<String> + Send,
    ) -> Result<(), ApiError> {
        self.filter.set_filter(dimension, value);
        self.load().await
    }

    /// Sort by `by`, back to page 1, and load.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the page cannot be fetched.
    pub async fn set_sort(&mut self, by: impl Into<String> + Send, order: SortOrder) -> Result<(), ApiError> {
        self.filter.set_sort(by, order);
        self.load().await
    }

    /// Change the page size, back to page 1, and load.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the page cannot be fetched.
    pub async fn set_limit(&mut self, limit: u32) -> Result<(), ApiError> {
        self.filter.set_limit(limit);
        self.load().await
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetch the page for the current parameters.
    ///
    /// If the requested page lies past the last one (a delete shrank the
    /// result set), the page is clamped to the new last page and fetched once
    /// more.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the page cannot be fetched; the error is also kept
    /// in [`Self::load_state`].
    #[instrument(skip(self), fields(tag = %E::TAG, page = self.filter.page()))]
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let page = self.fetch().await?;
        let requested = self.filter.page();
        if page.is_empty() && requested > 1 && page.meta.total_pages < requested {
            let last = page.meta.total_pages.max(1);
            tracing::debug!(requested, last, "Page past the end, re-clamping");
            self.filter.set_page(last);
            self.fetch().await?;
        }
        Ok(())
    }

    /// Reload if the list was never loaded or has been invalidated.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the reload fails.
    pub async fn sync(&mut self) -> Result<(), ApiError> {
        if matches!(self.load_state, LoadState::Idle) || self.is_stale() {
            self.load().await
        } else {
            Ok(())
        }
    }

    /// Forget the current data and release the cache entry.
    pub fn cancel(&mut self) {
        self.load_state = LoadState::Idle;
        self.loaded_generation = None;
        self.subscription = None;
    }

    async fn fetch(&mut self) -> Result<Paginated<E::Item>, ApiError> {
        let request = match self.search_mode {
            SearchMode::Server => self.endpoint.request(&self.filter),
            SearchMode::CurrentPageOnly => self
                .endpoint
                .request(&self.filter.without_local(E::LOCAL_FILTERS)),
        };

        let cache = self.state.api().cache();
        let key = CacheKey::new(E::TAG, &request);
        if self.subscription.as_ref().map(Subscription::key) != Some(&key) {
            self.subscription = Some(cache.subscribe(key));
        }
        let generation = cache.generation(E::TAG);

        let previous = match std::mem::replace(&mut self.load_state, LoadState::Idle) {
            LoadState::Success(page) | LoadState::Loading { previous: Some(page) } => Some(page),
            LoadState::Idle | LoadState::Loading { previous: None } | LoadState::Error(_) => None,
        };
        self.load_state = LoadState::Loading { previous };

        let result = self
            .state
            .api()
            .query::<Paginated<E::Item>>(E::TAG, request)
            .await;
        self.loaded_generation = Some(generation);
        match result {
            Ok(page) => {
                self.load_state = LoadState::Success(page.clone());
                Ok(page)
            }
            Err(err) => {
                tracing::warn!(error = %err, "List load failed");
                self.load_state = LoadState::Error(err.clone());
                Err(err)
            }
        }
    }
}

impl<E: DeletableEndpoint> ListController<E> {
    /// Delete one row, toast the outcome, then refresh the list.
    ///
    /// A failed refresh is kept in [`Self::load_state`] and does not fail the
    /// delete.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the server rejects the delete.
    #[instrument(skip(self), fields(tag = %E::TAG, id = %id))]
    pub async fn delete(&mut self, id: &E::Id) -> Result<(), AppError> {
        if let Err(e) = self.state.api().delete(&self.endpoint, id).await {
            let err = AppError::from(e);
            err.report("delete");
            self.state
                .ui()
                .toast_error(err.user_message(&format!("Failed to delete {}", E::NOUN)));
            return Err(err);
        }

        self.state
            .ui()
            .toast_success(format!("{} deleted successfully", capitalize(E::NOUN)));
        let _ = self.sync().await;
        Ok(())
    }
}

impl ListController<OrdersEndpoint> {
    /// Change an order's status from the table, then refresh the list.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the server rejects the transition.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_status(&mut self, id: &OrderId, status: OrderStatus) -> Result<(), AppError> {
        if let Err(e) = self.state.api().update_order_status(id, status).await {
            let err = AppError::from(e);
            err.report("update order status");
            self.state
                .ui()
                .toast_error(err.user_message("Failed to update status"));
            return Err(err);
        }

        self.state.ui().toast_success("Status updated");
        let _ = self.sync().await;
        Ok(())
    }
}
