//! Port interfaces for the synchronization engine
//!
//! Every collaborator the engine touches is injected through one of these
//! traits so hosts can swap transports and tests can substitute in-memory
//! doubles.

use async_trait::async_trait;
use calsync_domain::{CalendarEvent, EventQuery};

use super::failure::{StoreError, SyncFailure};

/// Reports whether the calendar integration is authorized for the active user
#[async_trait]
pub trait ConnectionProbe: Send + Sync {
    /// One round-trip to the status endpoint.
    ///
    /// Implementations fail closed: any transport error or non-success
    /// response yields `false`. This method never errors.
    async fn check(&self) -> bool;
}

/// Requests a window of calendar events from the provider-facing endpoint
#[async_trait]
pub trait EventFetcher: Send + Sync {
    /// Fetch events matching `query`.
    ///
    /// A non-success response must surface as [`SyncFailure::Http`] with the
    /// response status and the body's error text.
    async fn fetch(&self, query: &EventQuery) -> Result<Vec<CalendarEvent>, SyncFailure>;
}

/// Durable string key-value store (backing the error log)
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Host signal telling whether the device currently has network connectivity
pub trait ConnectivityOracle: Send + Sync {
    fn is_online(&self) -> bool;
}
