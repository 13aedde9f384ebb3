//! Shared fixtures for the infra integration tests.

use calsync_domain::Config;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const STATUS_PATH: &str = "/api/calendar/status";
pub const EVENTS_PATH: &str = "/api/calendar/events";

/// Mock backend plus a scratch data directory, alive for one test.
pub struct TestBackend {
    pub server: MockServer,
    pub data_dir: TempDir,
}

impl TestBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            data_dir: tempfile::tempdir().expect("temp dir should be created"),
        }
    }

    /// Manual-mode configuration pointing at the mock server.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.api.base_url = self.server.uri();
        config.api.request_timeout_secs = 5;
        config.sync.auto_sync = false;
        config.storage.data_dir = self.data_dir.path().to_path_buf();
        config
    }

    pub async fn mount_status(&self, has_integration: bool) {
        Mock::given(method("GET"))
            .and(path(STATUS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "hasIntegration": has_integration })),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mount_events(&self, events: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "events": events })),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mount_events_error(&self, status: u16, error: &str) {
        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "error": error })))
            .mount(&self.server)
            .await;
    }
}

/// Provider-shaped timed event.
pub fn event_json(id: &str, summary: &str) -> Value {
    json!({
        "id": id,
        "summary": summary,
        "start": { "dateTime": "2024-05-01T09:00:00+00:00" },
        "end": { "dateTime": "2024-05-01T09:30:00+00:00" },
        "status": "confirmed"
    })
}
