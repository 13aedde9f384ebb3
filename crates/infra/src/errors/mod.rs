//! Infrastructure error handling

pub mod conversions;

pub use conversions::{InfraError, IntoStoreError, IntoSyncFailure};
