//! service-core: Shared infrastructure for the assistant workspace.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
