use async_trait::async_trait;
use calsync_core::ConnectionProbe;
use reqwest::Method;
use tracing::{debug, instrument};
use url::Url;

use super::types::StatusResponse;
use crate::http::HttpClient;

/// Connection probe backed by the status endpoint
#[derive(Debug, Clone)]
pub struct HttpConnectionProbe {
    http: HttpClient,
    url: Url,
}

impl HttpConnectionProbe {
    pub fn new(http: HttpClient, url: Url) -> Self {
        Self { http, url }
    }
}

#[async_trait]
impl ConnectionProbe for HttpConnectionProbe {
    /// Fails closed: transport errors, non-2xx statuses and unreadable bodies
    /// all report `false`.
    #[instrument(skip(self), fields(url = %self.url.path()))]
    async fn check(&self) -> bool {
        let request = self.http.request(Method::GET, self.url.clone());
        let response = match self.http.send(request).await {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "connection probe failed");
                return false;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "connection probe rejected");
            return false;
        }

        match response.json::<StatusResponse>().await {
            Ok(body) => body.has_integration,
            Err(err) => {
                debug!(error = %err, "unreadable connection status body");
                false
            }
        }
    }
}
