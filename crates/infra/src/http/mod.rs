//! HTTP client plumbing shared by the calendar integrations

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
