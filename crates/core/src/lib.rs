//! # CalSync Core
//!
//! Calendar synchronization engine - pure logic, no infrastructure code.
//!
//! This crate contains:
//! - Port interfaces (traits) for every external collaborator
//! - `ErrorClassifier`: raw failures to the stable error taxonomy
//! - `RetryPolicy`: exponential backoff with jitter for opt-in retries
//! - `ErrorLog`: bounded, persisted journal of classified errors
//! - `SyncEngine`: polling lifecycle, single-flight passes, observable state
//!
//! ## Architecture Principles
//! - Only depends on `calsync-domain`
//! - No HTTP, filesystem, or platform code
//! - All external dependencies via traits, injected at construction
//! - No failure from a collaborator escapes the engine boundary

pub mod classification;
pub mod connectivity;
pub mod error_log;
pub mod retry;
pub mod sync;

pub use classification::{recovery_steps, ErrorClassifier};
pub use connectivity::{AlwaysOnline, ConnectivityFlag};
pub use error_log::{ErrorLog, InMemoryStore};
pub use retry::{run_with_retry, RetryPolicy};
pub use sync::error::{SchedulerError, SchedulerResult};
pub use sync::failure::{StoreError, SyncFailure};
pub use sync::options::{ErrorCallback, SuccessCallback, SyncOptions};
pub use sync::ports::{ConnectionProbe, ConnectivityOracle, EventFetcher, KeyValueStore};
pub use sync::{SyncEngine, SyncEnginePorts, SyncOutcome};
