//! View controllers.
//!
//! Controllers hold the per-view state a UI shell renders from and expose
//! the user actions as async methods. They borrow nothing global: each one
//! is built from an [`crate::state::AppState`] handle. Dropping a controller
//! (navigating away) drops any in-flight load with it, so a late response
//! never reaches a view that is gone.

pub mod form;
pub mod list;

pub use form::FormController;
pub use list::{ListController, LoadState, SearchMode};
