//! marketplace-service: publishes marketplace modules to the remote catalog
//! and reconciles declared module state against it.
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::{MarketplaceError, Result};
