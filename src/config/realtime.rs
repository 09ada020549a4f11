//! Realtime sync configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::notifications::DEFAULT_INBOX_CAPACITY;
use crate::domain::realtime::RetryPolicy;

/// Push connection, backoff and polling settings
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// First reconnect delay in milliseconds
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Reconnect delay cap in milliseconds
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,

    /// Reconnect attempts before giving up
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,

    /// Unread counter poll interval in seconds
    #[serde(default = "default_unread_poll_secs")]
    pub unread_poll_secs: u64,

    /// Notifications kept locally
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,

    /// Path of the push socket on the API host
    #[serde(default = "default_push_path")]
    pub push_path: String,
}

impl RealtimeConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_millis(self.backoff_max_ms),
            self.max_reconnect_attempts,
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.unread_poll_secs)
    }

    /// Validate realtime configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backoff_base_ms == 0 || self.backoff_base_ms > self.backoff_max_ms {
            return Err(ValidationError::InvalidBackoff);
        }
        if self.unread_poll_secs == 0 || self.unread_poll_secs > 3600 {
            return Err(ValidationError::InvalidPollInterval);
        }
        if self.notification_capacity == 0 || self.notification_capacity > 10_000 {
            return Err(ValidationError::InvalidCapacity);
        }
        if !self.push_path.starts_with('/') {
            return Err(ValidationError::InvalidPushPath);
        }
        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            unread_poll_secs: default_unread_poll_secs(),
            notification_capacity: default_notification_capacity(),
            push_path: default_push_path(),
        }
    }
}

fn default_backoff_base_ms() -> u64 {
    1_000
}

fn default_backoff_max_ms() -> u64 {
    30_000
}

fn default_max_reconnect_attempts() -> u32 {
    10
}

fn default_unread_poll_secs() -> u64 {
    30
}

fn default_notification_capacity() -> usize {
    DEFAULT_INBOX_CAPACITY
}

fn default_push_path() -> String {
    "/ws/notifications".to_string()
}
