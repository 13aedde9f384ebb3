//! Observable engine state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::CalendarEvent;
use crate::impl_domain_code_conversions;

/// Snapshot of the synchronization engine as seen by the host application.
///
/// Written only by the scheduler; readers always receive a clone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub events: Vec<CalendarEvent>,
    pub is_loading: bool,
    pub connected: bool,
    pub last_synced: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// Whether (and when) to re-attempt a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryDecision {
    pub should_retry: bool,
    pub delay_ms: u64,
    pub attempts_used: u32,
    pub max_attempts: u32,
}

/// Lifecycle of the polling scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    /// Constructed, or started with auto-sync disabled. Manual syncs allowed.
    #[default]
    Idle,
    /// Interval timer armed.
    Running,
    /// Torn down. Results of passes still in flight are discarded.
    Stopped,
}

impl_domain_code_conversions!(EngineStatus {
    Idle => "idle",
    Running => "running",
    Stopped => "stopped",
});
