//! Back-office core - shared types library.
//!
//! This crate provides the types used by every back-office component:
//! - `admin` - API client, query cache, state slices and view controllers
//! - `integration-tests` - stub backend and end-to-end scenarios
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. This keeps it lightweight and usable from any shell
//! (terminal, WASM, desktop) that drives the admin controllers.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, statuses, money and pages
//! - [`format`] - Display formatters for currency, numbers, dates and percentages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod format;
pub mod types;

pub use types::*;
