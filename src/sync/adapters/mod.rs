//! Adapter implementations for sync ports.

pub mod memory;
pub mod postgres;
mod tracing_client;

pub use tracing_client::TracingIssueClient;
