//! Unified error handling for the admin client.
//!
//! Every failure a view can observe is an [`AppError`]. None of them is fatal:
//! the view turns them into a toast via [`AppError::user_message`] and stays
//! usable for a retry.

use thiserror::Error;

use crate::api::{ApiError, ApiStatus};
use crate::storage::StorageError;
use crate::validation::ValidationErrors;

/// Application-level error type for the admin client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Form input failed validation; no request was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The request never reached the server, or its answer could not be read.
    #[error("Network error: {0}")]
    Transport(ApiError),

    /// The server rejected the session; it has been cleared.
    #[error("Unauthorized: {0}")]
    Unauthorized(ApiError),

    /// The server answered with a 4xx or 5xx status.
    #[error("Server error: {0}")]
    Server(ApiError),

    /// Durable storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err.status {
            ApiStatus::Http(401) => Self::Unauthorized(err),
            ApiStatus::Http(_) => Self::Server(err),
            ApiStatus::FetchError | ApiStatus::ParseError => Self::Transport(err),
        }
    }
}

impl AppError {
    /// Message for a toast.
    ///
    /// Server and authorization errors show the server's `message` verbatim
    /// when it sent one; validation errors show the first field message;
    /// everything else falls back to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        let specific = match self {
            Self::Validation(errors) => errors.first_message(),
            Self::Server(err) | Self::Unauthorized(err) => err.message(),
            Self::Transport(_) | Self::Storage(_) => None,
        };
        specific.unwrap_or(fallback).to_owned()
    }

    /// The underlying API error, if this came from a request.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Transport(err) | Self::Unauthorized(err) | Self::Server(err) => Some(err),
            Self::Validation(_) | Self::Storage(_) => None,
        }
    }

    /// Whether this error warrants an error-tracking event.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Storage(_) => true,
            Self::Server(err) => matches!(err.status, ApiStatus::Http(500..)),
            Self::Validation(_) | Self::Unauthorized(_) => false,
        }
    }

    /// Log the error, sending it to Sentry when it is reportable.
    pub fn report(&self, context: &str) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                context,
                "Admin operation failed"
            );
        } else {
            tracing::warn!(error = %self, context, "Admin operation rejected");
        }
    }
}

/// Set the Sentry user context for the logged-in administrator.
pub fn set_sentry_user(user_id: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_owned()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_classifies_api_errors() {
        assert!(matches!(
            AppError::from(ApiError::http(401, json!({}))),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            AppError::from(ApiError::http(422, json!({}))),
            AppError::Server(_)
        ));
        assert!(matches!(
            AppError::from(ApiError::fetch("offline")),
            AppError::Transport(_)
        ));
        assert!(matches!(
            AppError::from(ApiError::parse("bad json")),
            AppError::Transport(_)
        ));
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = AppError::from(ApiError::http(400, json!({ "message": "Email already in use" })));
        assert_eq!(err.user_message("Failed to create user"), "Email already in use");

        let err = AppError::from(ApiError::http(500, json!({})));
        assert_eq!(err.user_message("Failed to create user"), "Failed to create user");

        let err = AppError::from(ApiError::fetch("connection refused"));
        assert_eq!(err.user_message("Failed to delete FAQ"), "Failed to delete FAQ");
    }

    #[test]
    fn test_user_message_for_validation() {
        let mut errors = ValidationErrors::new();
        errors.add("productId", "Select a product before adding a FAQ");
        let err = AppError::from(errors);
        assert_eq!(
            err.user_message("Failed to save FAQ"),
            "Select a product before adding a FAQ"
        );
    }

    #[test]
    fn test_reportable_errors() {
        assert!(AppError::from(ApiError::http(503, json!({}))).is_reportable());
        assert!(AppError::from(ApiError::fetch("offline")).is_reportable());
        assert!(!AppError::from(ApiError::http(404, json!({}))).is_reportable());
        assert!(!AppError::from(ApiError::http(401, json!({}))).is_reportable());
        assert!(!AppError::from(ValidationErrors::new()).is_reportable());
    }
}
