//! Bounded, persisted journal of classified errors
//!
//! The journal is best-effort: it is serialized as one JSON array under a
//! fixed key and rewritten on every append. Nothing here returns an error;
//! persistence problems are reported through `tracing` and otherwise ignored.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use calsync_domain::constants::{ERROR_LOG_KEY, MAX_ERROR_LOG_ENTRIES};
use calsync_domain::{ClassifiedError, ErrorLogEntry};
use parking_lot::{Mutex, RwLock};
use tracing::warn;

use crate::sync::failure::StoreError;
use crate::sync::ports::KeyValueStore;

/// Append-only error journal capped at a fixed number of entries
#[derive(Clone)]
pub struct ErrorLog {
    store: Arc<dyn KeyValueStore>,
    key: String,
    capacity: usize,
    // Serializes read-modify-write cycles between concurrent appenders.
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for ErrorLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorLog")
            .field("key", &self.key)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl ErrorLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: ERROR_LOG_KEY.to_string(),
            capacity: MAX_ERROR_LOG_ENTRIES,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Record `error` under `context` with the current timestamp.
    pub fn record(&self, context: &str, error: &ClassifiedError) {
        self.append(ErrorLogEntry::new(context, error.clone()));
    }

    /// Add `entry` at the tail, evicting the oldest entries past capacity.
    ///
    /// A journal that cannot be read is left untouched rather than
    /// overwritten; the entry is dropped.
    pub fn append(&self, entry: ErrorLogEntry) {
        let _guard = self.write_lock.lock();

        let mut entries: VecDeque<_> = match self.load() {
            Ok(entries) => entries.into(),
            Err(err) => {
                warn!(error = %err, key = %self.key, "error log unreadable; entry dropped");
                return;
            }
        };
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }

        let serialized = match serde_json::to_string(&entries) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(error = %err, "failed to serialize error log");
                return;
            }
        };
        if let Err(err) = self.store.set(&self.key, &serialized) {
            warn!(error = %err, key = %self.key, "failed to persist error log");
        }
    }

    /// All persisted entries, oldest first. Missing, corrupt or unreadable
    /// data reads as empty.
    pub fn read_all(&self) -> Vec<ErrorLogEntry> {
        self.load().unwrap_or_else(|err| {
            warn!(error = %err, key = %self.key, "failed to read error log");
            Vec::new()
        })
    }

    /// Stored entries. Absent or corrupt data is a fresh journal; only store
    /// failures are errors.
    fn load(&self) -> Result<Vec<ErrorLogEntry>, StoreError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };

        Ok(serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(error = %err, key = %self.key, "discarding corrupt error log");
            Vec::new()
        }))
    }

    /// Remove the persisted journal.
    pub fn clear(&self) {
        let _guard = self.write_lock.lock();
        if let Err(err) = self.store.remove(&self.key) {
            warn!(error = %err, key = %self.key, "failed to clear error log");
        }
    }
}

/// Process-local [`KeyValueStore`]
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.write().remove(key);
        Ok(())
    }
}
