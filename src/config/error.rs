//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Backoff base must be positive and not exceed the backoff cap")]
    InvalidBackoff,

    #[error("Unread poll interval must be between 1 and 3600 seconds")]
    InvalidPollInterval,

    #[error("Notification capacity must be between 1 and 10000")]
    InvalidCapacity,

    #[error("Push path must start with '/'")]
    InvalidPushPath,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
