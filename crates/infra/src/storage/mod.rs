//! Durable key-value storage

pub mod file_store;

pub use file_store::FileStore;
