//! Conversions from external infrastructure errors into domain and port errors.

use std::io;

use calsync_core::{StoreError, SyncFailure};
use calsync_domain::CalSyncError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CalSyncError);

impl From<InfraError> for CalSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CalSyncError> for InfraError {
    fn from(value: CalSyncError) -> Self {
        InfraError(value)
    }
}

impl std::fmt::Display for InfraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for InfraError {}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCalSyncError {
    fn into_calsync(self) -> CalSyncError;
}

/// Converts transport errors into the classifier's input shape.
pub trait IntoSyncFailure {
    fn into_sync_failure(self) -> SyncFailure;
}

/// Converts filesystem errors into key-value store errors.
pub trait IntoStoreError {
    fn into_store_error(self) -> StoreError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CalSyncError / SyncFailure */
/* -------------------------------------------------------------------------- */

impl IntoCalSyncError for HttpError {
    fn into_calsync(self) -> CalSyncError {
        if self.is_builder() {
            return CalSyncError::Config(format!("invalid HTTP client configuration: {self}"));
        }

        if self.is_timeout() {
            return CalSyncError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return CalSyncError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => CalSyncError::Auth(message),
                404 => CalSyncError::NotFound(message),
                400..=499 if code != 429 => CalSyncError::InvalidInput(message),
                _ => CalSyncError::Network(message),
            };
        }

        CalSyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_calsync())
    }
}

impl IntoSyncFailure for HttpError {
    fn into_sync_failure(self) -> SyncFailure {
        match self.status() {
            Some(status) => SyncFailure::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status"),
            ),
            None if self.is_decode() => {
                SyncFailure::application(format!("malformed response body: {self}"))
            }
            None => SyncFailure::transport(self.to_string()),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → StoreError / CalSyncError */
/* -------------------------------------------------------------------------- */

#[cfg(target_os = "macos")]
const QUOTA_OS_ERRORS: [i32; 2] = [28, 69];
#[cfg(all(unix, not(target_os = "macos")))]
const QUOTA_OS_ERRORS: [i32; 2] = [28, 122];
#[cfg(windows)]
const QUOTA_OS_ERRORS: [i32; 2] = [39, 112];
#[cfg(not(any(unix, windows)))]
const QUOTA_OS_ERRORS: [i32; 0] = [];

fn is_quota_error(err: &io::Error) -> bool {
    err.raw_os_error().is_some_and(|code| QUOTA_OS_ERRORS.contains(&code))
}

impl IntoStoreError for io::Error {
    fn into_store_error(self) -> StoreError {
        if is_quota_error(&self) {
            StoreError::QuotaExceeded(self.to_string())
        } else if self.kind() == io::ErrorKind::InvalidData {
            StoreError::Corrupt(self.to_string())
        } else {
            StoreError::Io(self.to_string())
        }
    }
}

impl IntoCalSyncError for io::Error {
    fn into_calsync(self) -> CalSyncError {
        match self.kind() {
            io::ErrorKind::NotFound => CalSyncError::NotFound(self.to_string()),
            _ => CalSyncError::Storage(self.to_string()),
        }
    }
}

impl From<io::Error> for InfraError {
    fn from(value: io::Error) -> Self {
        InfraError(value.into_calsync())
    }
}

/* -------------------------------------------------------------------------- */
/* Config parse errors → CalSyncError */
/* -------------------------------------------------------------------------- */

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(CalSyncError::Config(format!("Invalid TOML format: {value}")))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(CalSyncError::Config(format!("Invalid JSON format: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
