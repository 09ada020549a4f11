//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SKYBOOK` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use skybook_realtime::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("API at {}", config.api.base_url);
//! ```

mod api;
mod error;
mod logging;
mod realtime;

pub use api::ApiConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use realtime::RealtimeConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a client
/// pointed at `http://localhost:8000`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// REST API root, timeout and session token
    #[serde(default)]
    pub api: ApiConfig,

    /// Push connection, backoff and polling
    #[serde(default)]
    pub realtime: RealtimeConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SKYBOOK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SKYBOOK__API__BASE_URL=https://api.example.com` -> `api.base_url`
    /// - `SKYBOOK__REALTIME__UNREAD_POLL_SECS=15` -> `realtime.unread_poll_secs`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SKYBOOK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.realtime.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "SKYBOOK__API__BASE_URL",
        "SKYBOOK__API__SESSION_TOKEN",
        "SKYBOOK__REALTIME__UNREAD_POLL_SECS",
        "SKYBOOK__REALTIME__MAX_RECONNECT_ATTEMPTS",
        "SKYBOOK__LOGGING__FORMAT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert!(config.api.session_token.is_none());
        assert_eq!(config.realtime.unread_poll_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SKYBOOK__API__BASE_URL", "https://api.skybook.test");
        env::set_var("SKYBOOK__API__SESSION_TOKEN", "tok-123");
        env::set_var("SKYBOOK__REALTIME__UNREAD_POLL_SECS", "5");
        env::set_var("SKYBOOK__REALTIME__MAX_RECONNECT_ATTEMPTS", "3");
        env::set_var("SKYBOOK__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.api.base_url, "https://api.skybook.test");
        assert_eq!(
            config.api.session_token.as_ref().map(|t| t.expose_secret().as_str()),
            Some("tok-123")
        );
        assert_eq!(config.realtime.unread_poll_secs, 5);
        assert_eq!(config.realtime.max_reconnect_attempts, 3);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validate_reports_bad_section() {
        let mut config = AppConfig::default();
        config.realtime.notification_capacity = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidCapacity));
    }
}
