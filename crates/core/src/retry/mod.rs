//! Attempt-bounded retries
//!
//! The engine's steady-state retry mechanism is its interval timer. This
//! module is for callers that wrap a single operation (a user pressing
//! "retry", a one-off fetch) with bounded re-attempts.

mod policy;
mod runner;

pub use policy::RetryPolicy;
pub use runner::run_with_retry;
