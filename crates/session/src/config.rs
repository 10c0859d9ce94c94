//! Session layer configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GROCER_API_BASE_URL` - Profile API origin (default: <https://api.bhhfood.com>)
//! - `GROCER_CURRENCY_SYMBOL` - Currency prefix for price display (default: $)
//! - `GROCER_DATA_DIR` - Directory for the durable slot store (default: .greengrocer)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Session layer configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Origin of the remote profile API.
    pub api_base_url: Url,
    /// Currency prefix supplied to the visibility engine.
    pub currency_symbol: String,
    /// Directory holding the durable slot files.
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag.
    pub sentry_environment: Option<String>,
}

impl SessionConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid (e.g. an
    /// unparseable API URL). All variables have working defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("GROCER_API_BASE_URL", "https://api.bhhfood.com");
        let api_base_url = Url::parse(&api_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("GROCER_API_BASE_URL".to_string(), e.to_string())
        })?;

        let currency_symbol = get_env_or_default("GROCER_CURRENCY_SYMBOL", "$");
        let data_dir = PathBuf::from(get_env_or_default("GROCER_DATA_DIR", ".greengrocer"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            api_base_url,
            currency_symbol,
            data_dir,
            sentry_dsn,
            sentry_environment,
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // Parse of a known-good literal cannot fail.
            api_base_url: Url::parse("https://api.bhhfood.com")
                .unwrap_or_else(|_| unreachable!("default API URL is valid")),
            currency_symbol: "$".to_string(),
            data_dir: PathBuf::from(".greengrocer"),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.api_base_url.as_str(), "https://api.bhhfood.com/");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.data_dir, PathBuf::from(".greengrocer"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_get_env_or_default_falls_back() {
        assert_eq!(
            get_env_or_default("GROCER_TEST_UNSET_VARIABLE", "fallback"),
            "fallback"
        );
    }

    #[test]
    fn test_get_optional_env_unset() {
        assert!(get_optional_env("GROCER_TEST_UNSET_VARIABLE").is_none());
    }
}
