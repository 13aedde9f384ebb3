//! # CalSync Domain
//!
//! Data model for the calendar synchronization engine.
//!
//! This crate contains:
//! - Calendar events and the event query shape
//! - The observable sync state and retry decisions
//! - The error taxonomy (`ErrorKind`, `ClassifiedError`) and error log entries
//! - Configuration structures
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other CalSync crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
