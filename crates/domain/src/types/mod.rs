//! Domain types and models

pub mod calendar;
pub mod classification;
pub mod error_log;
pub mod sync;

pub use calendar::{CalendarEvent, EventQuery, EventTime};
pub use classification::{ClassifiedError, ErrorKind};
pub use error_log::ErrorLogEntry;
pub use sync::{EngineStatus, RetryDecision, SyncState};
