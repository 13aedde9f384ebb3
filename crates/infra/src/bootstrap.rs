//! Engine wiring
//!
//! Builds a ready-to-start [`SyncEngine`] from a loaded [`Config`]: the HTTP
//! probe and fetcher against the configured backend, a [`FileStore`] under
//! `storage.data_dir` for the error journal, and the host's callbacks.

use std::sync::Arc;
use std::time::Duration;

use calsync_core::{
    AlwaysOnline, ConnectivityOracle, ErrorCallback, SuccessCallback, SyncEngine,
    SyncEnginePorts, SyncOptions,
};
use calsync_domain::{CalendarEvent, Config, Result};
use tracing::info;

use crate::http::HttpClient;
use crate::integrations::calendar::{CalendarEndpoints, HttpConnectionProbe, HttpEventFetcher};
use crate::storage::FileStore;

/// Host hooks attached to the engine at construction
#[derive(Clone, Default)]
pub struct EngineCallbacks {
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
    connectivity: Option<Arc<dyn ConnectivityOracle>>,
}

impl EngineCallbacks {
    pub fn new() -> Self {
        Self::default()
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

    /// Device connectivity signal used by the classifier. Defaults to
    /// [`AlwaysOnline`].
    #[must_use]
    pub fn connectivity(mut self, oracle: Arc<dyn ConnectivityOracle>) -> Self {
        self.connectivity = Some(oracle);
        self
    }
}

impl std::fmt::Debug for EngineCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineCallbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("connectivity", &self.connectivity.is_some())
            .finish()
    }
}

/// Build an engine talking to the configured backend.
///
/// The engine is returned stopped; call [`SyncEngine::start`] to begin
/// polling.
///
/// # Errors
/// Returns `CalSyncError::Config` for an invalid configuration or base URL
/// and `CalSyncError::Network` if the HTTP client cannot be built.
pub fn build_engine(config: &Config, callbacks: EngineCallbacks) -> Result<SyncEngine> {
    config.validate()?;

    let endpoints = CalendarEndpoints::from_config(&config.api)?;

    let mut http = HttpClient::builder()
        .timeout(Duration::from_secs(config.api.request_timeout_secs))
        .user_agent(config.api.user_agent.clone());
    if let Some(token) = config.api.bearer_token.as_deref() {
        http = http.bearer_token(token);
    }
    let http = http.build()?;

    let ports = SyncEnginePorts {
        probe: Arc::new(HttpConnectionProbe::new(http.clone(), endpoints.status.clone())),
        fetcher: Arc::new(HttpEventFetcher::new(http, endpoints.events.clone())),
        error_store: Arc::new(FileStore::new(config.storage.data_dir.clone())),
        connectivity: callbacks.connectivity.unwrap_or_else(|| Arc::new(AlwaysOnline)),
    };

    let mut options = SyncOptions::from_config(&config.sync);
    if let Some(callback) = callbacks.on_success {
        options = options.on_success(move |events| callback(events));
    }
    if let Some(callback) = callbacks.on_error {
        options = options.on_error(move |message| callback(message));
    }

    let engine = SyncEngine::new(options, ports)?;
    info!(
        base_url = %config.api.base_url,
        auto_sync = config.sync.auto_sync,
        interval_minutes = config.sync.interval_minutes,
        data_dir = %config.storage.data_dir.display(),
        "calendar sync engine built"
    );
    Ok(engine)
}
