//! Admin client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BACKOFFICE_API_URL` - REST API base path (default: `http://localhost:3000/api`)
//! - `BACKOFFICE_REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `BACKOFFICE_PAGE_SIZE` - Default list page size (default: 20)
//! - `BACKOFFICE_PRODUCT_PAGE_SIZE` - Product and review list page size (default: 10)
//! - `BACKOFFICE_CACHE_CAPACITY` - Maximum cached query results (default: 1000)
//! - `BACKOFFICE_CACHE_KEEP_UNUSED_SECS` - How long results outlive their last subscriber (default: 60)
//! - `BACKOFFICE_STORAGE_PATH` - JSON file for durable client storage (default: in-memory)
//! - `BACKOFFICE_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (0.0 to 1.0, default: 1.0)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin client configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// REST API base URL; endpoint paths are appended to it.
    pub api_url: Url,
    /// Per-request timeout handed to the HTTP client.
    pub request_timeout: Duration,
    /// Page size for user and order lists.
    pub page_size: u32,
    /// Page size for product, review and FAQ lists.
    pub product_page_size: u32,
    /// Query cache settings.
    pub cache: CacheConfig,
    /// Durable storage file (in-memory when `None`).
    pub storage_path: Option<PathBuf>,
    /// Logging and error tracking.
    pub telemetry: TelemetryConfig,
}

/// Query cache configuration.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// Maximum number of cached query results.
    pub capacity: u64,
    /// How long an unsubscribed result is kept before eviction.
    pub keep_unused: Duration,
}

/// Logging and Sentry configuration.
///
/// Implements `Debug` manually to redact the DSN.
#[derive(Clone, Default)]
pub struct TelemetryConfig {
    /// Emit JSON-formatted log lines.
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl std::fmt::Debug for TelemetryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryConfig")
            .field("json_logs", &self.json_logs)
            .field(
                "sentry_dsn",
                &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .finish()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            keep_unused: Duration::from_secs(60),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default("BACKOFFICE_API_URL", DEFAULT_API_URL))?;
        let request_timeout = Duration::from_secs(parse_env("BACKOFFICE_REQUEST_TIMEOUT_SECS", 30)?);
        let page_size = parse_positive("BACKOFFICE_PAGE_SIZE", 20)?;
        let product_page_size = parse_positive("BACKOFFICE_PRODUCT_PAGE_SIZE", 10)?;
        let cache = CacheConfig {
            capacity: parse_env("BACKOFFICE_CACHE_CAPACITY", 1000)?,
            keep_unused: Duration::from_secs(parse_env("BACKOFFICE_CACHE_KEEP_UNUSED_SECS", 60)?),
        };
        let storage_path = get_optional_env("BACKOFFICE_STORAGE_PATH").map(PathBuf::from);

        let telemetry = TelemetryConfig {
            json_logs: get_optional_env("BACKOFFICE_LOG_JSON").is_some(),
            sentry_dsn: get_optional_env("SENTRY_DSN").map(SecretString::from),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", 1.0)?,
        };

        Ok(Self {
            api_url,
            request_timeout,
            page_size,
            product_page_size,
            cache,
            storage_path,
            telemetry,
        })
    }

    /// Configuration pointing at `api_url` with every other setting defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `api_url` is not an absolute URL.
    pub fn for_api_url(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            request_timeout: Duration::from_secs(30),
            page_size: 20,
            product_page_size: 10,
            cache: CacheConfig::default(),
            storage_path: None,
            telemetry: TelemetryConfig {
                sentry_sample_rate: 1.0,
                ..TelemetryConfig::default()
            },
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the API base URL, normalising it to end with `/` so endpoint paths join under it.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized)
        .map_err(|e| ConfigError::InvalidEnvVar("BACKOFFICE_API_URL".to_string(), e.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an optional environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn parse_positive(key: &str, default: u32) -> Result<u32, ConfigError> {
    let value = parse_env(key, default)?;
    if value == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(value)
}
