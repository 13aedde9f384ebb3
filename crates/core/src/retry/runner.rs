use std::future::Future;
use std::time::Duration;

use calsync_domain::ClassifiedError;
use tracing::{debug, warn};

use super::policy::RetryPolicy;
use crate::classification::ErrorClassifier;
use crate::sync::failure::SyncFailure;

/// Run `operation` until it succeeds or `policy` stops granting attempts.
///
/// Each failure is classified before the policy sees it; the final
/// classified error is returned when the budget is spent or the error is
/// not recoverable.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    classifier: &ErrorClassifier,
    mut operation: F,
) -> Result<T, ClassifiedError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SyncFailure>>,
{
    let mut attempt = 0_u32;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempts = attempt + 1, "operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(failure) => {
                let error = classifier.classify(&failure);
                let decision = policy.decide(&error, attempt);
                if !decision.should_retry {
                    warn!(
                        code = %error.code(),
                        attempts_used = decision.attempts_used,
                        max_attempts = decision.max_attempts,
                        "giving up on operation"
                    );
                    return Err(error);
                }

                debug!(
                    code = %error.code(),
                    attempt,
                    delay_ms = decision.delay_ms,
                    "retrying operation after backoff"
                );
                tokio::time::sleep(Duration::from_millis(decision.delay_ms)).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use calsync_domain::ErrorKind;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn recoverable_failures_are_retried_until_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let classifier = ErrorClassifier::default();

        let result = run_with_retry(&policy, &classifier, || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(SyncFailure::http(503, "unavailable"))
            } else {
                Ok("events")
            }
        })
        .await;

        assert_eq!(result, Ok("events"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn budget_exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let classifier = ErrorClassifier::default();

        let result: Result<(), _> = run_with_retry(&policy, &classifier, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SyncFailure::http(429, "slow down"))
        })
        .await;

        let error = result.expect_err("should give up");
        assert_eq!(error.code(), ErrorKind::RateLimit);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn unrecoverable_failures_are_not_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let classifier = ErrorClassifier::default();

        let result: Result<(), _> = run_with_retry(&policy, &classifier, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SyncFailure::application("mystery"))
        })
        .await;

        assert_eq!(result.map_err(|e| e.code()), Err(ErrorKind::UnknownError));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
