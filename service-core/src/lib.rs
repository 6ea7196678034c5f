//! service-core: Shared infrastructure for the marketplace workspace.
pub mod config;
pub mod observability;
pub mod retry;

pub use async_trait;
pub use reqwest;
pub use tracing;
