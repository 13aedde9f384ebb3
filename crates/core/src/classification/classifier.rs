use std::sync::Arc;

use calsync_domain::{ClassifiedError, ErrorKind};
use tracing::debug;

use crate::connectivity::AlwaysOnline;
use crate::sync::failure::SyncFailure;
use crate::sync::ports::ConnectivityOracle;

const TOKEN_KEYWORDS: [&str; 2] = ["invalid_token", "token_expired"];
const AUTH_KEYWORDS: [&str; 2] = ["unauthorized", "authentication"];
const RATE_LIMIT_KEYWORDS: [&str; 2] = ["rate limit", "quota"];

/// Maps a [`SyncFailure`] onto exactly one [`ErrorKind`].
///
/// Resolution is first-match-wins: the failure's origin and HTTP status are
/// consulted before its message, and the device connectivity signal only
/// decides failures nothing else recognized. Classification is deterministic
/// for a given failure and connectivity reading.
#[derive(Clone)]
pub struct ErrorClassifier {
    connectivity: Arc<dyn ConnectivityOracle>,
}

impl std::fmt::Debug for ErrorClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorClassifier").finish_non_exhaustive()
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new(Arc::new(AlwaysOnline))
    }
}

impl ErrorClassifier {
    pub fn new(connectivity: Arc<dyn ConnectivityOracle>) -> Self {
        Self { connectivity }
    }

    /// Classify one failure.
    pub fn classify(&self, failure: &SyncFailure) -> ClassifiedError {
        let raw = failure.message();
        let error = self.resolve(failure).with_detail("origin", failure.origin());
        debug!(code = %error.code(), origin = failure.origin(), raw, "classified sync failure");
        error
    }

    fn resolve(&self, failure: &SyncFailure) -> ClassifiedError {
        let raw = failure.message();
        let lower = raw.to_lowercase();

        match failure {
            SyncFailure::Transport { .. } => {
                return ClassifiedError::new(ErrorKind::NetworkError, raw);
            }
            SyncFailure::Http { status, .. } => {
                if let Some(kind) = kind_for_status(*status, &lower) {
                    return ClassifiedError::new(kind, raw).with_detail("status", *status);
                }
            }
            SyncFailure::Application { .. } | SyncFailure::Storage { .. } => {}
        }

        if let Some(kind) = kind_for_message(&lower) {
            return ClassifiedError::new(kind, raw);
        }

        if !self.connectivity.is_online() {
            return ClassifiedError::new(ErrorKind::NetworkError, raw)
                .with_user_message("You appear to be offline. Syncing resumes once you reconnect.")
                .with_detail("offline", true);
        }

        if let SyncFailure::Storage { quota_exceeded: true, .. } = failure {
            return ClassifiedError::new(ErrorKind::StorageError, raw)
                .with_user_message("Local storage is full. Clear cached data to keep syncing.");
        }

        ClassifiedError::new(ErrorKind::UnknownError, raw)
    }
}

fn kind_for_status(status: u16, lower_message: &str) -> Option<ErrorKind> {
    match status {
        401 => Some(ErrorKind::AuthError),
        403 if contains_any(lower_message, &RATE_LIMIT_KEYWORDS) => Some(ErrorKind::RateLimit),
        403 | 404 => Some(ErrorKind::NoCalendarAccess),
        429 => Some(ErrorKind::RateLimit),
        500 | 502 | 503 | 504 => Some(ErrorKind::ServerError),
        _ => None,
    }
}

fn kind_for_message(lower_message: &str) -> Option<ErrorKind> {
    if contains_any(lower_message, &TOKEN_KEYWORDS) {
        Some(ErrorKind::TokenExpired)
    } else if contains_any(lower_message, &AUTH_KEYWORDS) {
        Some(ErrorKind::AuthError)
    } else if contains_any(lower_message, &RATE_LIMIT_KEYWORDS) {
        Some(ErrorKind::RateLimit)
    } else if lower_message.contains("calendar") && lower_message.contains("not found") {
        Some(ErrorKind::NoCalendarAccess)
    } else {
        None
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::ConnectivityFlag;

    fn classify(failure: SyncFailure) -> ClassifiedError {
        ErrorClassifier::default().classify(&failure)
    }

    #[test]
    fn transport_failures_are_network_errors() {
        for message in ["connection refused", "dns error", "", "unauthorized"] {
            let error = classify(SyncFailure::transport(message));
            assert_eq!(error.code(), ErrorKind::NetworkError);
            assert!(error.recoverable());
            assert_eq!(error.retry_after_seconds(), Some(30));
        }
    }

    #[test]
    fn http_429_is_rate_limited() {
        let error = classify(SyncFailure::http(429, "Too Many Requests"));
        assert_eq!(error.code(), ErrorKind::RateLimit);
        assert_eq!(error.retry_after_seconds(), Some(60));
        assert_eq!(error.details().get("status"), Some(&serde_json::json!(429)));
    }

    #[test]
    fn status_rules_win_over_message_rules() {
        assert_eq!(classify(SyncFailure::http(401, "token_expired")).code(), ErrorKind::AuthError);
        assert_eq!(
            classify(SyncFailure::http(403, "Daily Quota exhausted")).code(),
            ErrorKind::RateLimit
        );
        assert_eq!(classify(SyncFailure::http(403, "forbidden")).code(), ErrorKind::NoCalendarAccess);
        assert_eq!(classify(SyncFailure::http(404, "")).code(), ErrorKind::NoCalendarAccess);
        for status in [500, 502, 503, 504] {
            let error = classify(SyncFailure::http(status, "invalid_token"));
            assert_eq!(error.code(), ErrorKind::ServerError);
            assert_eq!(error.retry_after_seconds(), Some(120));
        }
    }

    #[test]
    fn unmatched_statuses_fall_through_to_message_rules() {
        assert_eq!(classify(SyncFailure::http(400, "invalid_token")).code(), ErrorKind::TokenExpired);
        assert_eq!(classify(SyncFailure::http(501, "boom")).code(), ErrorKind::UnknownError);
    }

    #[test]
    fn message_rules_are_case_insensitive_and_ordered() {
        let cases = [
            ("Token_Expired: refresh needed", ErrorKind::TokenExpired),
            ("Unauthorized: invalid_token", ErrorKind::TokenExpired),
            ("Authentication failed", ErrorKind::AuthError),
            ("Rate Limit exceeded", ErrorKind::RateLimit),
            ("Calendar Not Found", ErrorKind::NoCalendarAccess),
            ("event not found", ErrorKind::UnknownError),
        ];
        for (message, expected) in cases {
            assert_eq!(classify(SyncFailure::application(message)).code(), expected, "{message}");
        }
    }

    #[test]
    fn integration_required_is_an_auth_error() {
        let error = classify(SyncFailure::integration_required());
        assert_eq!(error.code(), ErrorKind::AuthError);
        assert!(error.code().requires_reauthorization());
        assert!(error.retry_after_seconds().is_none());
    }

    #[test]
    fn offline_device_turns_unknown_failures_into_network_errors() {
        let flag = Arc::new(ConnectivityFlag::new(false));
        let classifier = ErrorClassifier::new(flag.clone());

        let error = classifier.classify(&SyncFailure::application("socket hang up"));
        assert_eq!(error.code(), ErrorKind::NetworkError);
        assert_eq!(error.retry_after_seconds(), Some(30));
        assert_eq!(error.details().get("offline"), Some(&serde_json::json!(true)));

        // Message rules still take precedence.
        let error = classifier.classify(&SyncFailure::application("quota exceeded"));
        assert_eq!(error.code(), ErrorKind::RateLimit);

        flag.set_online(true);
        let error = classifier.classify(&SyncFailure::application("socket hang up"));
        assert_eq!(error.code(), ErrorKind::UnknownError);
    }

    #[test]
    fn storage_quota_is_a_storage_error() {
        let failure = SyncFailure::Storage { quota_exceeded: true, message: "disk full".into() };
        let error = classify(failure);
        assert_eq!(error.code(), ErrorKind::StorageError);
        assert_eq!(error.retry_after_seconds(), Some(10));
        assert!(error.user_message().contains("storage"));

        let failure = SyncFailure::Storage { quota_exceeded: false, message: "EACCES".into() };
        assert_eq!(classify(failure).code(), ErrorKind::UnknownError);
    }

    #[test]
    fn fallback_is_not_recoverable() {
        let error = classify(SyncFailure::application("something odd"));
        assert_eq!(error.code(), ErrorKind::UnknownError);
        assert!(!error.recoverable());
        assert!(error.retry_after_seconds().is_none());
    }

    #[test]
    fn classification_is_idempotent() {
        let classifier = ErrorClassifier::default();
        let failure = SyncFailure::http(503, "Service Unavailable");
        assert_eq!(classifier.classify(&failure), classifier.classify(&failure));
    }

    #[test]
    fn recovery_steps_follow_the_kind() {
        let error = classify(SyncFailure::http(401, "nope"));
        assert_eq!(error.recovery_steps(), super::super::recovery_steps(ErrorKind::AuthError));
    }
}
