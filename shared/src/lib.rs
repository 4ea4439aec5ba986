//! Shared utilities for the gateway service: logging setup and MySQL helpers

// Re-export common dependencies
pub use serde;
pub use thiserror;
pub use tracing;

pub mod database;
pub mod observability;
