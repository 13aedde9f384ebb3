//! Engine options

use std::sync::Arc;
use std::time::Duration;

use calsync_domain::constants::{DEFAULT_MAX_RESULTS, DEFAULT_SYNC_INTERVAL_MINUTES};
use calsync_domain::{CalendarEvent, SyncConfig};

/// Invoked with the fetched events after every successful pass.
pub type SuccessCallback = Arc<dyn Fn(&[CalendarEvent]) + Send + Sync>;

/// Invoked with the user-facing message after every failed pass.
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Options consumed by [`SyncEngine`](super::SyncEngine)
#[derive(Clone)]
pub struct SyncOptions {
    pub auto_sync: bool,
    pub interval: Duration,
    /// Page size of passes that do not specify their own query.
    pub max_results: u32,
    pub(crate) on_success: Option<SuccessCallback>,
    pub(crate) on_error: Option<ErrorCallback>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            auto_sync: true,
            interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_MINUTES * 60),
            max_results: DEFAULT_MAX_RESULTS,
            on_success: None,
            on_error: None,
        }
    }
}

impl std::fmt::Debug for SyncOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOptions")
            .field("auto_sync", &self.auto_sync)
            .field("interval", &self.interval)
            .field("max_results", &self.max_results)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl SyncOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            auto_sync: config.auto_sync,
            interval: Duration::from_secs(config.interval_minutes.saturating_mul(60)),
            max_results: config.max_results,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_auto_sync(mut self, auto_sync: bool) -> Self {
        self.auto_sync = auto_sync;
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_interval_minutes(self, minutes: u64) -> Self {
        self.with_interval(Duration::from_secs(minutes.saturating_mul(60)))
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    #[must_use]
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&[CalendarEvent]) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.interval.is_zero() {
            return Err("interval must be greater than zero".to_string());
        }
        if self.max_results == 0 {
            return Err("max_results must be greater than zero".to_string());
        }
        Ok(())
    }
}
