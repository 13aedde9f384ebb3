//! Raw failure shapes fed to the classifier

use thiserror::Error;

/// Origin-tagged failure produced by a collaborator.
///
/// The classifier matches on the variant first and on the message text
/// second, so every failure the engine can observe must be expressible here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncFailure {
    /// No response reached the client (DNS, connect, TLS, timeout).
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Application-level failure described only by its message.
    #[error("{message}")]
    Application { message: String },

    /// Local persistence failed.
    #[error("storage failure: {message}")]
    Storage { quota_exceeded: bool, message: String },
}

impl SyncFailure {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http { status, message: message.into() }
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self::Application { message: message.into() }
    }

    /// Synthetic failure used when the connection probe reports no integration.
    pub fn integration_required() -> Self {
        Self::application("unauthorized: calendar integration required")
    }

    /// Message text inspected by the keyword rules.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message }
            | Self::Http { message, .. }
            | Self::Application { message }
            | Self::Storage { message, .. } => message,
        }
    }

    /// Stable label for logs and error details.
    pub const fn origin(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Http { .. } => "http",
            Self::Application { .. } => "application",
            Self::Storage { .. } => "storage",
        }
    }
}

/// Failure of a [`KeyValueStore`](super::ports::KeyValueStore) operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("storage I/O failure: {0}")]
    Io(String),

    #[error("stored value is corrupt: {0}")]
    Corrupt(String),
}

impl From<StoreError> for SyncFailure {
    fn from(err: StoreError) -> Self {
        let quota_exceeded = matches!(err, StoreError::QuotaExceeded(_));
        SyncFailure::Storage { quota_exceeded, message: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_errors_keep_their_flag() {
        let failure = SyncFailure::from(StoreError::QuotaExceeded("disk full".into()));
        assert!(matches!(failure, SyncFailure::Storage { quota_exceeded: true, .. }));
        assert!(failure.message().contains("disk full"));

        let failure = SyncFailure::from(StoreError::Io("permission denied".into()));
        assert!(matches!(failure, SyncFailure::Storage { quota_exceeded: false, .. }));
    }

    #[test]
    fn display_includes_status() {
        assert_eq!(SyncFailure::http(503, "unavailable").to_string(), "HTTP 503: unavailable");
        assert_eq!(SyncFailure::transport("x").origin(), "transport");
    }
}
