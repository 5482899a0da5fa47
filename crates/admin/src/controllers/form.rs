//! Create/edit forms.

use tracing::instrument;

use crate::error::AppError;
use crate::forms::{FormMode, FormSpec};
use crate::state::AppState;
use crate::validation::ValidationErrors;

/// Controller for one create or edit form.
///
/// Invalid input never reaches the network: [`Self::submit`] records the
/// field errors and returns. A successful submit toasts, resets the fields
/// and leaves the refetch to the invalidated list views.
pub struct FormController<F: FormSpec> {
    state: AppState,
    mode: FormMode<F::Id>,
    initial: F,
    values: F,
    errors: ValidationErrors,
    submitting: bool,
}

impl<F: FormSpec + std::fmt::Debug> std::fmt::Debug for FormController<F>
where
    F::Id: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("mode", &self.mode)
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

impl<F: FormSpec> FormController<F> {
    /// Empty create form.
    #[must_use]
    pub fn create(state: &AppState) -> Self {
        Self::create_with(state, F::default())
    }

    /// Create form starting from `values`.
    #[must_use]
    pub fn create_with(state: &AppState, values: F) -> Self {
        Self::with_mode(state, FormMode::Create, values)
    }

    /// Edit form pre-populated from `entity`.
    #[must_use]
    pub fn edit(state: &AppState, id: F::Id, entity: &F::Entity) -> Self {
        Self::with_mode(state, FormMode::Edit(id), F::from_entity(entity))
    }

    fn with_mode(state: &AppState, mode: FormMode<F::Id>, values: F) -> Self {
        Self {
            state: state.clone(),
            mode,
            initial: values.clone(),
            values,
            errors: ValidationErrors::new(),
            submitting: false,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> &FormMode<F::Id> {
        &self.mode
    }

    #[must_use]
    pub const fn values(&self) -> &F {
        &self.values
    }

    /// Field values for editing.
    pub const fn values_mut(&mut self) -> &mut F {
        &mut self.values
    }

    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Error shown under `field`, if any.
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Restore the initial values and clear errors.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors = ValidationErrors::new();
    }

    /// Validate and submit.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` without sending anything when a field
    /// fails, or the mutation's error after a failure toast.
    #[instrument(skip(self), fields(noun = F::NOUN, edit = self.mode.is_edit()))]
    pub async fn submit(&mut self) -> Result<(), AppError> {
        let payload = match self.values.validate(self.mode.is_edit()) {
            Ok(payload) => payload,
            Err(errors) => {
                tracing::debug!(%errors, "Form rejected");
                for field in F::TOASTED_FIELDS {
                    if let Some(message) = errors.get(field) {
                        self.state.ui().toast_error(message);
                    }
                }
                self.errors = errors.clone();
                return Err(errors.into());
            }
        };
        self.errors = ValidationErrors::new();

        self.submitting = true;
        let result = F::submit(self.state.api(), &self.mode, &payload).await;
        self.submitting = false;

        match result {
            Ok(()) => {
                self.state.ui().toast_success(F::success_message(&self.mode));
                self.values = self.initial.clone();
                Ok(())
            }
            Err(err) => {
                err.report(F::NOUN);
                if let AppError::Validation(errors) = &err {
                    self.errors = errors.clone();
                }
                self.state
                    .ui()
                    .toast_error(err.user_message(&F::failure_message(&self.mode)));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use serde_json::json;

    use backoffice_core::{NotificationKind, ProductId, UserId, UserRole};

    use super::*;
    use crate::api::{HttpMethod, HttpTransport};
    use crate::api::testing::ScriptedTransport;
    use crate::config::AdminConfig;
    use crate::forms::{FaqForm, ProductForm, UserForm};
    use crate::models::User;
    use crate::storage::MemoryStore;

    fn app(transport: &Arc<ScriptedTransport>) -> AppState {
        AppState::new(
            AdminConfig::for_api_url("http://localhost:3000/api").unwrap(),
            Arc::clone(transport) as Arc<dyn HttpTransport>,
            Arc::new(MemoryStore::default()),
        )
    }

    fn jane() -> User {
        User {
            id: UserId::new("u1"),
            first_name: "Jane".to_string(),
            last_name: Some("Doe".to_string()),
            email: "jane@example.com".to_string(),
            role: UserRole::Staff,
            is_verified: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_invalid_product_sends_nothing() {
        let transport = ScriptedTransport::new();
        let state = app(&transport);
        let mut form = FormController::<ProductForm>::create(&state);
        *form.values_mut() = ProductForm {
            name: "Classic White T-Shirt".to_string(),
            description: "Soft cotton tee with a relaxed fit.".to_string(),
            price: "-5".to_string(),
            category: "T-shirts".to_string(),
            dress_style: "Casual".to_string(),
            stock: "10".to_string(),
            ..ProductForm::default()
        };

        let err = form.submit().await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(form.field_error("price"), Some("Price must be positive"));
        assert_eq!(transport.request_count(), 0);
        assert!(state.ui().drain_toasts().is_empty());
    }

    #[tokio::test]
    async fn test_edit_user_omits_blank_password() {
        let transport = ScriptedTransport::new();
        transport.push(200, json!({}));
        let state = app(&transport);
        let mut form = FormController::<UserForm>::edit(&state, UserId::new("u1"), &jane());
        assert_eq!(form.values().role, "staff");
        form.values_mut().first_name = "Janet".to_string();

        form.submit().await.unwrap();

        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.url.path(), "/api/users/u1");
        let body = sent.body.unwrap();
        assert_eq!(body["firstName"], "Janet");
        assert!(body.get("password").is_none());
        assert_eq!(form.values().first_name, "Jane");
        let toasts = state.ui().drain_toasts();
        assert_eq!(toasts[0].message, "User updated successfully");
    }

    #[tokio::test]
    async fn test_server_failure_toasts_fallback() {
        let transport = ScriptedTransport::new();
        transport.push(500, json!({}));
        let state = app(&transport);
        let mut form = FormController::<UserForm>::create(&state);
        *form.values_mut() = UserForm {
            first_name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "secret1".to_string(),
            ..UserForm::default()
        };

        form.submit().await.unwrap_err();

        assert!(!form.is_submitting());
        assert_eq!(form.values().first_name, "Jane");
        let toasts = state.ui().drain_toasts();
        assert_eq!(toasts[0].kind, NotificationKind::Error);
        assert_eq!(toasts[0].message, "Failed to create user");
    }

    #[tokio::test]
    async fn test_faq_without_product_toasts() {
        let transport = ScriptedTransport::new();
        let state = app(&transport);
        let mut form = FormController::<FaqForm>::create(&state);
        form.values_mut().question = "Is it machine washable?".to_string();
        form.values_mut().answer = "Yes, on a cold cycle.".to_string();

        form.submit().await.unwrap_err();

        assert_eq!(transport.request_count(), 0);
        assert_eq!(
            state.ui().drain_toasts()[0].message,
            "Select a product before adding a FAQ"
        );
    }

    #[tokio::test]
    async fn test_faq_create_for_product() {
        let transport = ScriptedTransport::new();
        transport.push(201, json!({}));
        let state = app(&transport);
        let mut form =
            FormController::create_with(&state, FaqForm::for_product(ProductId::new("p1")));
        form.values_mut().question = "Is it machine washable?".to_string();
        form.values_mut().answer = "Yes, on a cold cycle.".to_string();

        form.submit().await.unwrap();

        assert_eq!(transport.last().url.path(), "/api/faqs/p1");
        assert_eq!(form.values().product_id, Some(ProductId::new("p1")));
        assert!(form.values().question.is_empty());
        assert_eq!(
            state.ui().drain_toasts()[0].message,
            "FAQ created successfully"
        );
    }
}
