//! Exponential backoff with a delay cap and an attempt limit.

use std::time::Duration;

/// Reconnect backoff state for one push connection.
///
/// The delay for attempt `n` (zero-based) is `min(max_delay, base * 2^n)`.
/// Once `max_attempts` delays have been handed out, `next_delay` returns
/// `None` until the policy is reset by a successful connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    attempt: u32,
    max_attempts: u32,
    base: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(base: Duration, max_delay: Duration, max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts,
            base,
            max_delay,
        }
    }

    /// Number of retries scheduled since the last reset.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    /// Delay for a zero-based attempt number, without mutating state.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.max_delay)
    }

    /// Returns the next delay and advances the attempt counter, or `None`
    /// once the attempt limit has been reached.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.is_exhausted() {
            return None;
        }
        let delay = self.delay_for(self.attempt);
        self.attempt += 1;
        Some(delay)
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(30), 10)
    }
}
