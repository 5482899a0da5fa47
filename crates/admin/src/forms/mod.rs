//! Form schemas for the create/edit modals.
//!
//! A form holds raw field text exactly as typed. [`FormSchema::validate`]
//! turns it into a request payload or a set of field errors; [`FormSpec`]
//! adds the mutation a valid payload is submitted through and the toast
//! texts for the outcome. [`crate::controllers::FormController`] drives both.

pub mod faq;
pub mod login;
pub mod order_status;
pub mod product;
pub mod user;

pub use faq::{FaqForm, FaqSubmission};
pub use login::LoginForm;
pub use order_status::OrderStatusForm;
pub use product::{ProductForm, ProductStockForm};
pub use user::UserForm;

use async_trait::async_trait;

use crate::error::AppError;
use crate::resources::AdminApi;
use crate::validation::ValidationErrors;

/// Whether a form creates a new entity or edits the one identified by `Id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<Id> {
    Create,
    Edit(Id),
}

impl<Id> FormMode<Id> {
    #[must_use]
    pub const fn is_edit(&self) -> bool {
        matches!(self, Self::Edit(_))
    }

    /// Verb used in toasts: `"create"` or `"update"`.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit(_) => "update",
        }
    }
}

/// Raw form values and their validation rules.
pub trait FormSchema: Clone + Default + Send + Sync {
    /// Payload produced by valid input.
    type Output: Send + Sync;

    /// Fields with no input of their own; their errors are also toasted.
    const TOASTED_FIELDS: &'static [&'static str] = &[];

    /// Check every field. `editing` relaxes rules that only apply on create.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its first message.
    fn validate(&self, editing: bool) -> Result<Self::Output, ValidationErrors>;
}

/// A schema bound to the entity it edits and the mutation it submits.
#[async_trait]
pub trait FormSpec: FormSchema {
    /// Entity pre-populating the form in edit mode.
    type Entity: Send + Sync;
    /// Identifier of the edited entity.
    type Id: Clone + std::fmt::Display + Send + Sync;

    /// Noun used in toasts (`"user"`, `"FAQ"`).
    const NOUN: &'static str;

    /// Field values showing `entity`.
    fn from_entity(entity: &Self::Entity) -> Self;

    /// Send a validated payload.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the mutation fails.
    async fn submit(
        api: &AdminApi,
        mode: &FormMode<Self::Id>,
        payload: &Self::Output,
    ) -> Result<(), AppError>;

    /// Toast after a successful submit, e.g. `"User updated successfully"`.
    fn success_message(mode: &FormMode<Self::Id>) -> String {
        let done = if mode.is_edit() { "updated" } else { "created" };
        format!("{} {done} successfully", capitalize(Self::NOUN))
    }

    /// Fallback toast after a failed submit, e.g. `"Failed to update user"`.
    fn failure_message(mode: &FormMode<Self::Id>) -> String {
        format!("Failed to {} {}", mode.verb(), Self::NOUN)
    }
}

/// Upper-case the first character.
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
