//! Observability infrastructure
//!
//! Structured logging through `tracing`. The engine crates only emit events;
//! installing a subscriber is the host's call, made once at startup.

pub mod logging;

pub use logging::{init_tracing, LOG_ENV_VAR};
