use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use async_trait::async_trait;
use calsync_core::{
    ConnectionProbe, EventFetcher, InMemoryStore, KeyValueStore, StoreError, SyncFailure,
};
use calsync_domain::{CalendarEvent, EventQuery};
use tokio::sync::Notify;

/// Probe returning a fixed, switchable answer.
///
/// When gated, each check waits for one [`MockProbe::release`] before
/// answering.
#[derive(Debug)]
pub struct MockProbe {
    connected: AtomicBool,
    gate: Option<Notify>,
    calls: AtomicUsize,
}

impl MockProbe {
    pub fn new(connected: bool) -> Arc<Self> {
        Arc::new(Self { connected: AtomicBool::new(connected), gate: None, calls: AtomicUsize::new(0) })
    }

    pub fn gated(connected: bool) -> Arc<Self> {
        Arc::new(Self {
            connected: AtomicBool::new(connected),
            gate: Some(Notify::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Let one gated check answer.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionProbe for MockProbe {
    async fn check(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.connected.load(Ordering::SeqCst)
    }
}

/// In-memory store whose writes block until [`GatedStore::open`].
#[derive(Debug, Default)]
pub struct GatedStore {
    inner: InMemoryStore,
    open: Mutex<bool>,
    opened: Condvar,
    writers: AtomicUsize,
}

impl GatedStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Writes currently blocked or completed.
    pub fn writers(&self) -> usize {
        self.writers.load(Ordering::SeqCst)
    }

    pub fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.opened.notify_all();
    }
}

impl KeyValueStore for GatedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.writers.fetch_add(1, Ordering::SeqCst);
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.opened.wait(open).unwrap();
        }
        drop(open);
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key)
    }
}

type FetchResult = Result<Vec<CalendarEvent>, SyncFailure>;

/// Fetcher replaying scripted responses.
///
/// Once the script runs out, the fallback response is repeated. When gated,
/// each fetch waits for one [`MockFetcher::release`] before answering.
#[derive(Debug)]
pub struct MockFetcher {
    script: Mutex<VecDeque<FetchResult>>,
    fallback: FetchResult,
    gate: Option<Notify>,
    calls: AtomicUsize,
    queries: Mutex<Vec<EventQuery>>,
}

impl MockFetcher {
    pub fn returning(events: Vec<CalendarEvent>) -> Arc<Self> {
        Arc::new(Self::build(Ok(events), None))
    }

    pub fn failing(failure: SyncFailure) -> Arc<Self> {
        Arc::new(Self::build(Err(failure), None))
    }

    pub fn gated(events: Vec<CalendarEvent>) -> Arc<Self> {
        Arc::new(Self::build(Ok(events), Some(Notify::new())))
    }

    pub fn scripted(script: Vec<FetchResult>, fallback: FetchResult) -> Arc<Self> {
        let fetcher = Self::build(fallback, None);
        *fetcher.script.lock().unwrap() = script.into();
        Arc::new(fetcher)
    }

    fn build(fallback: FetchResult, gate: Option<Notify>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            gate,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Let one gated fetch answer.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<EventQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventFetcher for MockFetcher {
    async fn fetch(&self, query: &EventQuery) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(*query);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| self.fallback.clone())
    }
}
