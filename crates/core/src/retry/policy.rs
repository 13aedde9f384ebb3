// Exponential backoff with jitter, seeded by the error's retry-after hint
use std::time::Duration;

use calsync_domain::constants::{
    DEFAULT_RETRY_BASE_SECS, MAX_RETRY_ATTEMPTS, MAX_RETRY_DELAY_MS, RETRY_JITTER_MS,
};
use calsync_domain::{ClassifiedError, RetryDecision};
use rand::Rng;

/// Decides whether a classified failure deserves another attempt.
///
/// `attempt` is the zero-based index of the attempt that just failed, so a
/// policy with `max_attempts = 3` allows attempts 0, 1 and 2 in total and
/// answers `true, true, false` to three consecutive failures. Unrecoverable
/// errors get a budget of zero.
///
/// Delays grow as `base * 2^attempt + jitter`, where `base` is the error's
/// retry-after hint (5s when it has none), and never exceed `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    default_base: Duration,
    max_delay: Duration,
    max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRY_ATTEMPTS,
            default_base: Duration::from_secs(DEFAULT_RETRY_BASE_SECS),
            max_delay: Duration::from_millis(MAX_RETRY_DELAY_MS),
            max_jitter: Duration::from_millis(RETRY_JITTER_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total attempt budget for recoverable errors.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Upper bound of the random jitter added to each delay. Zero disables it.
    #[must_use]
    pub fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decide the fate of `attempt` having failed with `error`.
    pub fn decide(&self, error: &ClassifiedError, attempt: u32) -> RetryDecision {
        let max_attempts = if error.recoverable() { self.max_attempts } else { 0 };
        let attempts_used = attempt.saturating_add(1).min(max_attempts);

        if !error.recoverable() || attempt.saturating_add(1) >= max_attempts {
            return RetryDecision { should_retry: false, delay_ms: 0, attempts_used, max_attempts };
        }

        RetryDecision {
            should_retry: true,
            delay_ms: self.delay_ms(error.retry_after_seconds(), attempt),
            attempts_used,
            max_attempts,
        }
    }

    fn delay_ms(&self, retry_after_seconds: Option<u64>, attempt: u32) -> u64 {
        let base_ms = retry_after_seconds
            .map_or(self.default_base, Duration::from_secs)
            .as_millis()
            .try_into()
            .unwrap_or(u64::MAX);
        let factor = 1_u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let cap_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);

        base_ms.saturating_mul(factor).saturating_add(self.jitter_ms()).min(cap_ms)
    }

    fn jitter_ms(&self) -> u64 {
        let max = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
        if max == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..max)
        }
    }
}
