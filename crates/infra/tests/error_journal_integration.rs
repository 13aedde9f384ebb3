//! Integration tests for the file-backed error journal
//!
//! Exercises `ErrorLog` from `calsync-core` over the real `FileStore`.

use std::sync::Arc;

use calsync_core::{ErrorLog, KeyValueStore};
use calsync_domain::constants::{ERROR_LOG_KEY, MAX_ERROR_LOG_ENTRIES};
use calsync_domain::{ClassifiedError, ErrorKind, ErrorLogEntry};
use calsync_infra::FileStore;

fn journal(dir: &tempfile::TempDir) -> (ErrorLog, Arc<FileStore>) {
    let store = Arc::new(FileStore::new(dir.path()));
    (ErrorLog::new(store.clone()), store)
}

#[test]
fn entries_survive_a_new_journal_instance() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (log, _) = journal(&dir);
    log.record("sync.fetch_events", &ClassifiedError::new(ErrorKind::ServerError, "HTTP 503"));
    log.record("sync.fetch_events", &ClassifiedError::new(ErrorKind::RateLimit, "HTTP 429"));

    let (reopened, _) = journal(&dir);
    let entries = reopened.read_all();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].error.code(), ErrorKind::ServerError);
    assert_eq!(entries[1].error.code(), ErrorKind::RateLimit);
}

#[test]
fn journal_keeps_most_recent_entries() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (log, _) = journal(&dir);

    for i in 0..(MAX_ERROR_LOG_ENTRIES + 5) {
        log.append(ErrorLogEntry::new(
            format!("ctx-{i}"),
            ClassifiedError::new(ErrorKind::NetworkError, format!("failure {i}")),
        ));
    }

    let entries = log.read_all();
    assert_eq!(entries.len(), MAX_ERROR_LOG_ENTRIES);
    assert_eq!(entries[0].context, "ctx-5");
    assert_eq!(entries[MAX_ERROR_LOG_ENTRIES - 1].context, format!("ctx-{}", MAX_ERROR_LOG_ENTRIES + 4));
}

#[test]
fn persisted_entries_use_camel_case_and_iso_timestamps() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (log, store) = journal(&dir);
    log.record("sync.retry", &ClassifiedError::new(ErrorKind::TokenExpired, "token_expired"));

    let raw = store.get(ERROR_LOG_KEY).expect("readable").expect("journal present");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    let entry = &value[0];
    assert_eq!(entry["context"], "sync.retry");
    assert_eq!(entry["error"]["code"], "TOKEN_EXPIRED");
    assert_eq!(entry["error"]["retryAfterSeconds"], 5);
    let timestamp = entry["timestamp"].as_str().expect("timestamp string");
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[test]
fn corrupt_journal_reads_as_empty_and_recovers() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join(format!("{ERROR_LOG_KEY}.json")), "not json").expect("write");

    let (log, _) = journal(&dir);
    assert!(log.read_all().is_empty());

    log.record("sync.fetch_events", &ClassifiedError::new(ErrorKind::UnknownError, "boom"));
    assert_eq!(log.read_all().len(), 1);
}

#[test]
fn clear_removes_the_journal_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (log, _) = journal(&dir);
    log.record("sync.fetch_events", &ClassifiedError::new(ErrorKind::UnknownError, "boom"));
    log.clear();

    assert!(log.read_all().is_empty());
    assert!(!dir.path().join(format!("{ERROR_LOG_KEY}.json")).exists());
}
