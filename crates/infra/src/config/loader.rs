//! Configuration loader
//!
//! Loads engine configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `CALSYNC_API_BASE_URL` is absent, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CALSYNC_API_BASE_URL`: Backend base URL (required)
//! - `CALSYNC_API_TOKEN`: Bearer token sent to the backend
//! - `CALSYNC_REQUEST_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `CALSYNC_AUTO_SYNC`: Whether to poll automatically (true/false)
//! - `CALSYNC_SYNC_INTERVAL_MINUTES`: Polling interval in minutes
//! - `CALSYNC_MAX_RESULTS`: Page size of scheduled fetches
//! - `CALSYNC_DATA_DIR`: Directory of the durable error log
//! - `CALSYNC_LOG_LEVEL`: Default log level
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./calsync.json` or `./calsync.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `../calsync.{json,toml}`, `../../calsync.{json,toml}` (parent directories)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use calsync_domain::{CalSyncError, Config, Result};

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: [&str; 4] = ["calsync.json", "calsync.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the base URL is
/// missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `CalSyncError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value fails validation
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `CALSYNC_API_BASE_URL` is required; every other value falls back
/// to its default.
///
/// # Errors
/// Returns `CalSyncError::Config` if the base URL is missing or a value
/// cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.api.base_url = env_var("CALSYNC_API_BASE_URL")?;
    config.api.bearer_token = env_opt("CALSYNC_API_TOKEN");
    if let Some(timeout) = env_parse("CALSYNC_REQUEST_TIMEOUT_SECS")? {
        config.api.request_timeout_secs = timeout;
    }

    config.sync.auto_sync = env_bool("CALSYNC_AUTO_SYNC", config.sync.auto_sync);
    if let Some(interval) = env_parse("CALSYNC_SYNC_INTERVAL_MINUTES")? {
        config.sync.interval_minutes = interval;
    }
    if let Some(max_results) = env_parse("CALSYNC_MAX_RESULTS")? {
        config.sync.max_results = max_results;
    }

    if let Some(dir) = env_opt("CALSYNC_DATA_DIR") {
        config.storage.data_dir = PathBuf::from(dir);
    }
    if let Some(level) = env_opt("CALSYNC_LOG_LEVEL") {
        config.logging.level = level;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `CalSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - A value fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CalSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CalSyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CalSyncError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents).map_err(|e| InfraError::from(e).into()),
        _ => Err(CalSyncError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join("..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.is_file())
}

/// Get required environment variable
///
/// # Errors
/// Returns `CalSyncError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        CalSyncError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Non-blank environment variable, trimmed.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parse an optional environment variable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| CalSyncError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
