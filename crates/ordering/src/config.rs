//! Ordering engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BLUE_FLAME_BACKEND_URL` - Base URL of the ordering backend
//!   (default: `http://localhost:8000`)
//! - `BLUE_FLAME_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend used when `BLUE_FLAME_BACKEND_URL` is unset.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid backend URL {0}: {1}")]
    InvalidBackendUrl(String, String),
}

/// Ordering engine configuration.
#[derive(Debug, Clone)]
pub struct OrderingConfig {
    /// Backend base URL, without a trailing slash
    pub backend_url: String,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            sentry_dsn: None,
        }
    }
}

impl OrderingConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend_url = normalize_backend_url(&get_env_or_default(
            "BLUE_FLAME_BACKEND_URL",
            DEFAULT_BACKEND_URL,
        ))?;
        let timeout_secs = get_env_or_default(
            "BLUE_FLAME_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("BLUE_FLAME_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            backend_url,
            request_timeout: Duration::from_secs(timeout_secs),
            sentry_dsn,
        })
    }

    /// Configuration pointing at `backend_url` with default settings otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBackendUrl` if `backend_url` is not an
    /// absolute http(s) URL.
    pub fn with_backend_url(backend_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            backend_url: normalize_backend_url(backend_url)?,
            ..Self::default()
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate a backend base URL and strip any trailing slash.
fn normalize_backend_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidBackendUrl(raw.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBackendUrl(
            raw.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(raw.trim_end_matches('/').to_string())
}
