use common::config::RetryConfig;
use std::time::Duration;

use crate::error::ApiError;

/// Exponential backoff: `min(base * factor^retry, cap)`, at most
/// `max_retries` retries after the first attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base: Duration,
    pub factor: u32,
    pub cap: Duration,
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            base: Duration::from_millis(config.base_delay_ms),
            factor: config.factor.max(1),
            cap: Duration::from_millis(config.max_delay_ms),
            max_retries: config.max_retries,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let multiplier = self.factor.saturating_pow(retry);
        self.base
            .checked_mul(multiplier)
            .map_or(self.cap, |delay| delay.min(self.cap))
    }

    /// Whether a failure after `retries_done` retries should be retried.
    pub fn should_retry(&self, error: &ApiError, retries_done: u32) -> bool {
        retries_done < self.max_retries && error.is_retryable()
    }
}
