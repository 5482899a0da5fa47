//! Application state.
//!
//! [`AppState`] is built once by the host and handed to every controller.
//! It owns the configuration, the cached API and three independent slices:
//! - [`AuthSlice`] - the session, persisted as `authToken` / `authUser`
//! - [`ThemeSlice`] - light/dark preference, persisted as `theme`
//! - [`UiSlice`] - sidebar, notifications and toasts, never persisted

pub mod auth;
pub mod theme;
pub mod ui;

pub use auth::AuthSlice;
pub use theme::ThemeSlice;
pub use ui::{Notification, Toast, UiSlice};

use std::sync::Arc;

use tracing::instrument;

use crate::api::{ApiClient, ApiError, HttpTransport, ReqwestTransport};
use crate::cache::QueryCache;
use crate::config::AdminConfig;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::forms::{FormSchema, LoginForm};
use crate::models::Session;
use crate::resources::AdminApi;
use crate::storage::{self, SharedStore};

/// Shared application state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    admin: AdminApi,
    auth: AuthSlice,
    theme: ThemeSlice,
    ui: UiSlice,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("api_url", &self.inner.config.api_url.as_str())
            .field("session", &self.inner.auth.session())
            .field("theme", &self.inner.theme.theme())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Assemble state over an explicit transport and store.
    #[must_use]
    pub fn new(config: AdminConfig, transport: Arc<dyn HttpTransport>, storage: SharedStore) -> Self {
        let api = ApiClient::new(config.api_url.clone(), transport, Arc::clone(&storage));
        let admin = AdminApi::new(api, QueryCache::new(config.cache));
        let auth = AuthSlice::rehydrate(Arc::clone(&storage));
        let theme = ThemeSlice::rehydrate(storage);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                admin,
                auth,
                theme,
                ui: UiSlice::default(),
            }),
        }
    }

    /// Assemble state with the `reqwest` transport and the configured store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` if the HTTP client cannot be built.
    pub fn from_config(config: AdminConfig) -> Result<Self, AppError> {
        let transport = ReqwestTransport::new(config.request_timeout)
            .map_err(|e| AppError::Transport(ApiError::fetch(e.to_string())))?;
        let storage = storage::open(config.storage_path.as_deref());
        Ok(Self::new(config, Arc::new(transport), storage))
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Cached API access.
    #[must_use]
    pub fn api(&self) -> &AdminApi {
        &self.inner.admin
    }

    #[must_use]
    pub fn auth(&self) -> &AuthSlice {
        &self.inner.auth
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeSlice {
        &self.inner.theme
    }

    #[must_use]
    pub fn ui(&self) -> &UiSlice {
        &self.inner.ui
    }

    /// Current session, reconciled against storage.
    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.auth.session()
    }

    /// Validate the login form, exchange it for a session and persist it.
    ///
    /// Pushes a success or failure toast either way. Cached reads from any
    /// previous session are dropped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` without sending a request if the form
    /// is invalid, or the API error if the credentials are rejected.
    #[instrument(skip(self, form))]
    pub async fn login(&self, form: &LoginForm) -> Result<Session, AppError> {
        let result = self.try_login(form).await;
        match &result {
            Ok(_) => self.inner.ui.toast_success("Login successful!"),
            Err(e) => {
                e.report("login");
                self.inner
                    .ui
                    .toast_error(e.user_message("Login failed. Please try again."));
            }
        }
        result
    }

    async fn try_login(&self, form: &LoginForm) -> Result<Session, AppError> {
        let credentials = form.validate(false)?;
        let response = self.inner.admin.login(&credentials).await?;

        set_sentry_user(response.user.id.as_str(), Some(&response.user.email));
        self.inner.admin.cache().clear();
        self.inner
            .auth
            .set_credentials(response.user, response.token);

        tracing::info!("Logged in");
        Ok(self.session())
    }

    /// End the session and drop every cached read.
    pub fn logout(&self) {
        self.inner.auth.logout();
        self.inner.admin.cache().clear();
        clear_sentry_user();
        tracing::info!("Logged out");
    }
}
