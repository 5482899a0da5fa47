//! Back-office admin client library.
//!
//! Headless core of the e-commerce back office: everything a UI shell needs
//! to manage users, products, orders, reviews and FAQs over the REST API,
//! without the rendering.
//!
//! # Architecture
//!
//! - [`api`] - HTTP adapter: bearer injection, uniform [`api::ApiError`], `401` handling
//! - [`cache`] - Query cache keyed by resource and parameters, invalidated by tag
//! - [`resources`] - Per-resource reads and writes on [`resources::AdminApi`]
//! - [`state`] - [`state::AppState`] with the auth, theme and UI slices
//! - [`controllers`] - List and form controllers the views render from
//! - [`forms`] / [`validation`] - Form schemas and field rules
//! - [`routes`] - Screens and the session guard
//! - [`storage`] - Durable key-value storage for the session and theme
//!
//! # Startup
//!
//! ```rust,ignore
//! let config = AdminConfig::from_env()?;
//! let _sentry = telemetry::init_sentry(&config.telemetry);
//! telemetry::init_tracing(&config.telemetry);
//! let state = AppState::from_config(config)?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod config;
pub mod controllers;
pub mod error;
pub mod forms;
pub mod models;
pub mod resources;
pub mod routes;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod validation;

pub use config::AdminConfig;
pub use error::AppError;
pub use state::AppState;
