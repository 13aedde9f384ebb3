//! Shared test helpers for `calsync-core` integration tests.
//!
//! Scriptable doubles for the engine ports plus small fixtures, so engine
//! tests can focus on scheduling behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod ports;

use std::sync::Arc;

use calsync_core::{InMemoryStore, KeyValueStore, SyncEngine, SyncEnginePorts, SyncOptions};
use calsync_domain::CalendarEvent;

pub use ports::{GatedStore, MockFetcher, MockProbe};

/// Minimal event with an id and title.
pub fn event(id: &str) -> CalendarEvent {
    serde_json::from_value(serde_json::json!({ "id": id, "summary": format!("Event {id}") }))
        .expect("fixture event")
}

/// Manual-mode engine around the given doubles, backed by an in-memory store.
pub fn engine_with(
    options: SyncOptions,
    probe: Arc<MockProbe>,
    fetcher: Arc<MockFetcher>,
) -> (SyncEngine, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    (engine_with_store(options, probe, fetcher, store.clone()), store)
}

/// Engine around the given doubles and error store.
pub fn engine_with_store(
    options: SyncOptions,
    probe: Arc<MockProbe>,
    fetcher: Arc<MockFetcher>,
    error_store: Arc<dyn KeyValueStore>,
) -> SyncEngine {
    let ports = SyncEnginePorts {
        probe,
        fetcher,
        error_store,
        connectivity: Arc::new(calsync_core::AlwaysOnline),
    };
    SyncEngine::new(options, ports).expect("valid options")
}

/// Yield to the runtime until `condition` holds, failing after a generous bound.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached after 1000 yields");
}
