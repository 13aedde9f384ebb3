use calsync_domain::{ApiConfig, CalSyncError, Result};
use url::Url;

/// Absolute URLs of the calendar backend endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEndpoints {
    pub status: Url,
    pub events: Url,
}

impl CalendarEndpoints {
    /// Resolve the configured paths against the base URL.
    ///
    /// # Errors
    /// Returns `CalSyncError::Config` if the base URL or a path is invalid.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let base = Url::parse(config.base_url.trim()).map_err(|e| {
            CalSyncError::Config(format!("Invalid api.base_url '{}': {e}", config.base_url))
        })?;
        if base.cannot_be_a_base() {
            return Err(CalSyncError::Config(format!(
                "api.base_url '{}' cannot be used as a base URL",
                config.base_url
            )));
        }

        Ok(Self {
            status: join(&base, &config.status_path)?,
            events: join(&base, &config.events_path)?,
        })
    }
}

fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path).map_err(|e| CalSyncError::Config(format!("Invalid endpoint path '{path}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_resolve_against_base() {
        let config = ApiConfig { base_url: "https://app.example.com".into(), ..ApiConfig::default() };
        let endpoints = CalendarEndpoints::from_config(&config).unwrap();
        assert_eq!(endpoints.status.as_str(), "https://app.example.com/api/calendar/status");
        assert_eq!(endpoints.events.as_str(), "https://app.example.com/api/calendar/events");
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let config = ApiConfig { base_url: "not a url".into(), ..ApiConfig::default() };
        assert!(matches!(CalendarEndpoints::from_config(&config), Err(CalSyncError::Config(_))));

        let config =
            ApiConfig { base_url: "mailto:someone@example.com".into(), ..ApiConfig::default() };
        assert!(matches!(CalendarEndpoints::from_config(&config), Err(CalSyncError::Config(_))));
    }
}
