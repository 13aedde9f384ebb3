//! Calendar event types
//!
//! `CalendarEvent` mirrors the event shape returned by the backend's event
//! endpoint (itself a pass-through of the provider's event resource). Every
//! field except `id` is optional on the wire so partially populated provider
//! records still deserialize.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_RESULTS;
use crate::errors::{CalSyncError, Result};

/// Calendar event as delivered by the event endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub html_link: Option<String>,
}

impl CalendarEvent {
    /// All-day events carry a `date` instead of a `dateTime`.
    pub fn is_all_day(&self) -> bool {
        self.start.date_time.is_none() && self.start.date.is_some()
    }

    /// Title shown to the user; provider events may have no summary.
    pub fn title(&self) -> &str {
        self.summary.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or("(no title)")
    }
}

/// Start or end of an event: either a timestamp or a whole day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    /// Calendar day this instant falls on, in the event's own offset.
    pub fn day(&self) -> Option<NaiveDate> {
        self.date_time.map(|dt| dt.date_naive()).or(self.date)
    }
}

/// Window of events requested from the event endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub today_only: bool,
    pub max_results: u32,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self { start: None, end: None, today_only: false, max_results: DEFAULT_MAX_RESULTS }
    }
}

impl EventQuery {
    /// Events of the current day, resolved by the backend.
    pub fn today() -> Self {
        Self { today_only: true, ..Self::default() }
    }

    /// Events between two days (inclusive).
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(CalSyncError::InvalidInput(format!(
                "range end ({end}) precedes start ({start})"
            )));
        }
        Ok(Self { start: Some(start), end: Some(end), ..Self::default() })
    }

    /// Events from the first to the last day of `month` (1-12) in `year`.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            CalSyncError::InvalidInput(format!("invalid month {year}-{month:02}"))
        })?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| CalSyncError::InvalidInput(format!("year {year} out of range")))?;
        let last = next_first.pred_opt().unwrap_or(first);
        Self::range(first, last)
    }

    /// Override the page size.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}
