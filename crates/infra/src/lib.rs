//! # CalSync Infrastructure
//!
//! Infrastructure implementations of the engine ports.
//!
//! This crate contains:
//! - HTTP connection probe and event fetcher for the calendar backend
//! - File-backed key-value store for the error journal
//! - Configuration loading (environment, JSON, TOML)
//! - `tracing` subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `calsync-core`
//! - Depends on `calsync-domain` and `calsync-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use bootstrap::{build_engine, EngineCallbacks};
pub use errors::{InfraError, IntoStoreError, IntoSyncFailure};
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::calendar::{CalendarEndpoints, HttpConnectionProbe, HttpEventFetcher};
pub use observability::{init_tracing, LOG_ENV_VAR};
pub use storage::FileStore;
