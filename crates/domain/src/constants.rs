//! Engine constants
//!
//! Centralized location for the fixed values of the sync engine. Retry timings
//! are in seconds unless the name says otherwise.

// Error log
pub const ERROR_LOG_KEY: &str = "calendar_sync_error_log";
pub const MAX_ERROR_LOG_ENTRIES: usize = 100;

// Event fetch
pub const DEFAULT_MAX_RESULTS: u32 = 50;

// Scheduling
pub const DEFAULT_SYNC_INTERVAL_MINUTES: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Retry policy
pub const MAX_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BASE_SECS: u64 = 5;
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;
pub const RETRY_JITTER_MS: u64 = 1_000;

// Per-kind retry-after hints
pub const NETWORK_RETRY_AFTER_SECS: u64 = 30;
pub const TOKEN_EXPIRED_RETRY_AFTER_SECS: u64 = 5;
pub const RATE_LIMIT_RETRY_AFTER_SECS: u64 = 60;
pub const SERVER_ERROR_RETRY_AFTER_SECS: u64 = 120;
pub const STORAGE_RETRY_AFTER_SECS: u64 = 10;

// Error log context tags
pub const CONTEXT_FETCH_EVENTS: &str = "sync.fetch_events";
pub const CONTEXT_RETRY: &str = "sync.retry";
