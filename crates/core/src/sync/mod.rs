//! Calendar synchronization engine

mod engine;
pub mod error;
pub mod failure;
pub mod options;
pub mod ports;

pub use engine::{SyncEngine, SyncEnginePorts, SyncOutcome};
