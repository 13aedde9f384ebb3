//! Configuration management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_RESULTS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SYNC_INTERVAL_MINUTES,
};
use crate::errors::{CalSyncError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub sync: SyncConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(CalSyncError::Config("api.base_url must not be empty".into()));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(CalSyncError::Config("api.request_timeout_secs must be > 0".into()));
        }
        self.sync.validate()
    }
}

/// Backend endpoints the engine talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub status_path: String,
    pub events_path: String,
    #[serde(skip_serializing)]
    pub bearer_token: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            status_path: "/api/calendar/status".to_string(),
            events_path: "/api/calendar/events".to_string(),
            bearer_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: concat!("calsync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Polling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub auto_sync: bool,
    pub interval_minutes: u64,
    pub max_results: u32,
}

impl SyncConfig {
    /// Reject zero intervals and zero page sizes.
    pub fn validate(&self) -> Result<()> {
        if self.interval_minutes == 0 {
            return Err(CalSyncError::Config("sync.interval_minutes must be > 0".into()));
        }
        if self.max_results == 0 {
            return Err(CalSyncError::Config("sync.max_results must be > 0".into()));
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_sync: true,
            interval_minutes: DEFAULT_SYNC_INTERVAL_MINUTES,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Durable storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from(".calsync") }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
