use async_trait::async_trait;
use calsync_core::{EventFetcher, SyncFailure};
use calsync_domain::{CalendarEvent, EventQuery};
use reqwest::{Method, Response};
use tracing::{debug, instrument};
use url::Url;

use super::types::{ErrorBody, EventsResponse};
use crate::errors::IntoSyncFailure;
use crate::http::HttpClient;

/// Event fetcher backed by the events endpoint
#[derive(Debug, Clone)]
pub struct HttpEventFetcher {
    http: HttpClient,
    url: Url,
}

impl HttpEventFetcher {
    pub fn new(http: HttpClient, url: Url) -> Self {
        Self { http, url }
    }
}

/// Query string for `query`. Absent fields are omitted.
pub fn query_params(query: &EventQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(4);
    if let Some(start) = query.start {
        params.push(("start", start.format("%Y-%m-%d").to_string()));
    }
    if let Some(end) = query.end {
        params.push(("end", end.format("%Y-%m-%d").to_string()));
    }
    if query.today_only {
        params.push(("todayOnly", "true".to_string()));
    }
    params.push(("maxResults", query.max_results.to_string()));
    params
}

#[async_trait]
impl EventFetcher for HttpEventFetcher {
    #[instrument(skip(self), fields(url = %self.url.path()))]
    async fn fetch(&self, query: &EventQuery) -> Result<Vec<CalendarEvent>, SyncFailure> {
        let request = self.http.request(Method::GET, self.url.clone()).query(&query_params(query));
        let response = self.http.send(request).await.map_err(IntoSyncFailure::into_sync_failure)?;

        if !response.status().is_success() {
            return Err(failure_from_response(response).await);
        }

        let body: EventsResponse =
            response.json().await.map_err(IntoSyncFailure::into_sync_failure)?;
        if !body.success {
            let message =
                body.error.unwrap_or_else(|| "event fetch was not successful".to_string());
            return Err(SyncFailure::application(message));
        }

        debug!(count = body.events.len(), "fetched calendar events");
        Ok(body.events)
    }
}

/// Carry the status and the body's error text so the classifier can inspect both.
async fn failure_from_response(response: Response) -> SyncFailure {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .ok()
        .or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string());

    debug!(%status, error_text = %message, "event fetch rejected");
    SyncFailure::http(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn default_query_only_sends_page_size() {
        assert_eq!(query_params(&EventQuery::default()), vec![("maxResults", "50".to_string())]);
    }

    #[test]
    fn range_and_today_flags_are_encoded() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let params = query_params(&EventQuery::range(start, end).unwrap().with_max_results(10));
        assert_eq!(
            params,
            vec![
                ("start", "2024-03-01".to_string()),
                ("end", "2024-03-31".to_string()),
                ("maxResults", "10".to_string()),
            ]
        );

        let params = query_params(&EventQuery::today());
        assert!(params.contains(&("todayOnly", "true".to_string())));
    }
}
