//! Wire shapes of the calendar backend endpoints

use calsync_domain::CalendarEvent;
use serde::Deserialize;

/// Body of the connection status endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(default)]
    pub has_integration: bool,
}

/// Body of a successful event fetch
#[derive(Debug, Clone, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of a failed request
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
