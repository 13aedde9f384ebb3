use calsync_domain::{CalSyncError, LoggingConfig, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a full `EnvFilter` directive, e.g.
/// `calsync_core=debug,info`. Takes precedence over `logging.level`.
pub const LOG_ENV_VAR: &str = "CALSYNC_LOG";

/// Build the filter from [`LOG_ENV_VAR`], falling back to `config.level`.
///
/// # Errors
/// Returns `CalSyncError::Config` if neither source is a valid directive.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match std::env::var(LOG_ENV_VAR) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive.trim())
            .map_err(|e| CalSyncError::Config(format!("Invalid {LOG_ENV_VAR} directive: {e}"))),
        _ => EnvFilter::try_new(config.level.trim())
            .map_err(|e| CalSyncError::Config(format!("Invalid logging.level: {e}"))),
    }
}

/// Install the global `tracing` subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed, so repeated
/// calls (tests, embedded hosts) are harmless.
///
/// # Errors
/// Returns `CalSyncError::Config` for an invalid filter directive.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json {
        builder.json().with_current_span(true).try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "tracing initialized");
    }
    Ok(installed)
}
