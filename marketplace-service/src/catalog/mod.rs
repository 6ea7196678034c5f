//! Remote catalog access.
//!
//! - `operations`: named operations and their GraphQL documents
//! - `gateway`: the transport seam (`CatalogGateway`) and its HTTP implementation
//! - `client`: typed operations used by the publish and read workflows

pub mod client;
pub mod gateway;
pub mod operations;

pub use client::{APP_TILE_CATEGORY, CatalogClient, NewDraft, PublishedVersion};
pub use gateway::{CatalogGateway, CatalogRequest, GraphqlGateway};
pub use operations::CatalogOperation;
