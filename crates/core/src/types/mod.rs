//! Core types for the back office.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod currency;
pub mod email;
pub mod id;
pub mod page;
pub mod status;
pub mod theme;

pub use currency::CurrencyCode;
pub use email::{Email, EmailError};
pub use id::*;
pub use page::{PageError, PageMeta, Paginated};
pub use status::*;
pub use theme::Theme;
