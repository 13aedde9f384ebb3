//! Error taxonomy for calendar synchronization
//!
//! Every raw failure the engine sees is normalized into a [`ClassifiedError`]
//! carrying one [`ErrorKind`]. The kind fixes recoverability, the default
//! retry-after hint, the user-facing message and the recovery steps:
//!
//! | Kind | Recoverable | Retry after |
//! |------|-------------|-------------|
//! | `NETWORK_ERROR` | yes | 30s |
//! | `AUTH_ERROR` | yes | - |
//! | `TOKEN_EXPIRED` | yes | 5s |
//! | `RATE_LIMIT` | yes | 60s |
//! | `NO_CALENDAR_ACCESS` | yes | - |
//! | `SERVER_ERROR` | yes | 120s |
//! | `STORAGE_ERROR` | yes | 10s |
//! | `UNKNOWN_ERROR` | no | - |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    NETWORK_RETRY_AFTER_SECS, RATE_LIMIT_RETRY_AFTER_SECS, SERVER_ERROR_RETRY_AFTER_SECS,
    STORAGE_RETRY_AFTER_SECS, TOKEN_EXPIRED_RETRY_AFTER_SECS,
};
use crate::impl_domain_code_conversions;

/// Stable taxonomy code of a classified failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NetworkError,
    AuthError,
    TokenExpired,
    RateLimit,
    NoCalendarAccess,
    ServerError,
    StorageError,
    UnknownError,
}

impl_domain_code_conversions!(ErrorKind {
    NetworkError => "NETWORK_ERROR",
    AuthError => "AUTH_ERROR",
    TokenExpired => "TOKEN_EXPIRED",
    RateLimit => "RATE_LIMIT",
    NoCalendarAccess => "NO_CALENDAR_ACCESS",
    ServerError => "SERVER_ERROR",
    StorageError => "STORAGE_ERROR",
    UnknownError => "UNKNOWN_ERROR",
});

impl ErrorKind {
    /// All kinds, in taxonomy order.
    pub const ALL: [Self; 8] = [
        Self::NetworkError,
        Self::AuthError,
        Self::TokenExpired,
        Self::RateLimit,
        Self::NoCalendarAccess,
        Self::ServerError,
        Self::StorageError,
        Self::UnknownError,
    ];

    /// Only `UNKNOWN_ERROR` is surfaced without any retry.
    pub const fn is_recoverable(self) -> bool {
        !matches!(self, Self::UnknownError)
    }

    /// Minimum delay before the next attempt, when the kind prescribes one.
    pub const fn default_retry_after_secs(self) -> Option<u64> {
        match self {
            Self::NetworkError => Some(NETWORK_RETRY_AFTER_SECS),
            Self::TokenExpired => Some(TOKEN_EXPIRED_RETRY_AFTER_SECS),
            Self::RateLimit => Some(RATE_LIMIT_RETRY_AFTER_SECS),
            Self::ServerError => Some(SERVER_ERROR_RETRY_AFTER_SECS),
            Self::StorageError => Some(STORAGE_RETRY_AFTER_SECS),
            Self::AuthError | Self::NoCalendarAccess | Self::UnknownError => None,
        }
    }

    /// Kinds that can only be cleared by the user re-authorizing the integration.
    pub const fn requires_reauthorization(self) -> bool {
        matches!(self, Self::AuthError | Self::TokenExpired | Self::NoCalendarAccess)
    }

    /// Canonical user-facing message.
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::NetworkError => {
                "Unable to reach the calendar service. Check your internet connection."
            }
            Self::AuthError => {
                "Calendar access is not authorized. Please connect your calendar integration."
            }
            Self::TokenExpired => "Your calendar session has expired. Reconnecting shortly.",
            Self::RateLimit => {
                "The calendar service is receiving too many requests. Please wait a moment."
            }
            Self::NoCalendarAccess => {
                "Your calendar could not be accessed. Please check the calendar permissions."
            }
            Self::ServerError => {
                "The calendar service is temporarily unavailable. Please try again later."
            }
            Self::StorageError => "Local storage is full. Free up space and try again.",
            Self::UnknownError => "An unexpected error occurred while syncing your calendar.",
        }
    }

    /// Ordered human recovery steps.
    pub const fn recovery_steps(self) -> &'static [&'static str] {
        match self {
            Self::NetworkError => &[
                "Check that your device is connected to the internet",
                "Disable any VPN or proxy that may block the calendar service",
                "Wait a moment; syncing resumes automatically",
            ],
            Self::AuthError => &[
                "Open the integrations settings",
                "Reconnect your calendar account",
                "Grant calendar read access when prompted",
            ],
            Self::TokenExpired => &[
                "Wait a few seconds for the session to refresh",
                "If the problem persists, reconnect your calendar account",
            ],
            Self::RateLimit => &[
                "Wait about a minute before syncing again",
                "Avoid triggering manual syncs repeatedly",
            ],
            Self::NoCalendarAccess => &[
                "Confirm the calendar still exists in your account",
                "Check that calendar sharing permissions include this app",
                "Reconnect your calendar account",
            ],
            Self::ServerError => &[
                "Wait a few minutes; the service usually recovers on its own",
                "Syncing resumes automatically on the next scheduled run",
            ],
            Self::StorageError => &[
                "Clear cached data in the app settings",
                "Free up space on your device",
                "Restart the app",
            ],
            Self::UnknownError => &[
                "Restart the app",
                "If the problem persists, contact support with the error details",
            ],
        }
    }
}

/// A raw failure normalized into the taxonomy.
///
/// Immutable once constructed: recoverability and the retry-after hint are
/// derived from the kind, so `retry_after_seconds` is only ever set for
/// recoverable errors and `user_message` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedError {
    code: ErrorKind,
    raw_message: String,
    user_message: String,
    recoverable: bool,
    retry_after_seconds: Option<u64>,
    #[serde(default)]
    details: BTreeMap<String, serde_json::Value>,
}

impl ClassifiedError {
    /// Build an error of `code` with the kind's canonical message.
    pub fn new(code: ErrorKind, raw_message: impl Into<String>) -> Self {
        let recoverable = code.is_recoverable();
        Self {
            code,
            raw_message: raw_message.into(),
            user_message: code.user_message().to_string(),
            recoverable,
            retry_after_seconds: if recoverable { code.default_retry_after_secs() } else { None },
            details: BTreeMap::new(),
        }
    }

    /// Replace the canonical message. Blank messages are ignored.
    #[must_use]
    pub fn with_user_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        if !message.trim().is_empty() {
            self.user_message = message;
        }
        self
    }

    /// Attach a diagnostic detail.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn code(&self) -> ErrorKind {
        self.code
    }

    pub fn raw_message(&self) -> &str {
        &self.raw_message
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn recoverable(&self) -> bool {
        self.recoverable
    }

    pub fn retry_after_seconds(&self) -> Option<u64> {
        self.retry_after_seconds
    }

    pub fn details(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.details
    }

    pub fn recovery_steps(&self) -> &'static [&'static str] {
        self.code.recovery_steps()
    }
}

impl std::fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.raw_message)
    }
}

impl std::error::Error for ClassifiedError {}
