//! Calendar backend integration
//!
//! HTTP implementations of the engine's connection probe and event fetcher,
//! talking to the application backend that proxies the calendar provider:
//! - `GET {status_path}` answers `{ "hasIntegration": bool }`
//! - `GET {events_path}?start&end&todayOnly&maxResults` answers
//!   `{ "success": true, "events": [...] }`, or `{ "error": "..." }` with a
//!   non-2xx status

pub mod endpoints;
pub mod fetcher;
pub mod probe;
pub mod types;

pub use endpoints::CalendarEndpoints;
pub use fetcher::HttpEventFetcher;
pub use probe::HttpConnectionProbe;
