//! Field-scoped validation for form input.
//!
//! Form fields arrive as raw text. The rule helpers here parse and check one
//! field each, recording the first failure per field in a
//! [`ValidationErrors`] collection; a form's `validate` runs every rule and
//! only produces a payload when the collection is empty.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use backoffice_core::Email;

/// Per-field validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", self.summary())]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already failed.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_owned())
            .or_insert_with(|| message.into());
    }

    /// Error for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Message of the first failing field, in field-name order.
    #[must_use]
    pub fn first_message(&self) -> Option<&str> {
        self.fields.values().next().map(String::as_str)
    }

    /// `value` when no field failed, `self` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    fn summary(&self) -> String {
        self.iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Require at least `min` characters after trimming. Returns the trimmed text.
pub fn min_chars(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    message: &str,
) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() < min {
        errors.add(field, message);
    }
    trimmed.to_owned()
}

/// Require a well-formed email address.
pub fn email(errors: &mut ValidationErrors, field: &str, value: &str) -> Option<Email> {
    match Email::parse(value.trim()) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.add(field, "Invalid email address");
            None
        }
    }
}

/// Trimmed text, or `None` when blank.
#[must_use]
pub fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Parse a decimal amount that must be at least zero.
///
/// `label` names the field in messages (`"Price must be a number"`).
pub fn non_negative_decimal(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: &str,
) -> Option<Decimal> {
    match Decimal::from_str(value.trim()) {
        Ok(amount) if amount.is_sign_negative() && !amount.is_zero() => {
            errors.add(field, format!("{label} must be positive"));
            None
        }
        Ok(amount) => Some(amount),
        Err(_) => {
            errors.add(field, format!("{label} must be a number"));
            None
        }
    }
}

/// Like [`non_negative_decimal`], but blank input is `None`.
pub fn optional_non_negative_decimal(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: &str,
) -> Option<Decimal> {
    if value.trim().is_empty() {
        return None;
    }
    non_negative_decimal(errors, field, label, value)
}

/// Parse a whole number that must be at least zero.
pub fn non_negative_integer(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: &str,
) -> Option<u32> {
    let raw = value.trim();
    if let Ok(count) = raw.parse::<u32>() {
        return Some(count);
    }
    match Decimal::from_str(raw) {
        Ok(number) if number.is_sign_negative() && !number.is_zero() => {
            errors.add(field, format!("{label} must be positive"));
        }
        Ok(_) => errors.add(field, format!("{label} must be a whole number")),
        Err(_) => errors.add(field, format!("{label} must be a number")),
    }
    None
}

/// Split comma-separated input, trimming entries and dropping empty ones.
#[must_use]
pub fn comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}
