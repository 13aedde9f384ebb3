//! Persisted error journal entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::ClassifiedError;

/// One record of the bounded error journal.
///
/// `timestamp` serializes as an RFC 3339 (ISO 8601) string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLogEntry {
    pub timestamp: DateTime<Utc>,
    pub context: String,
    pub error: ClassifiedError,
}

impl ErrorLogEntry {
    pub fn new(context: impl Into<String>, error: ClassifiedError) -> Self {
        Self { timestamp: Utc::now(), context: context.into(), error }
    }
}
