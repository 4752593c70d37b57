//! HTTP implementation of the catalog gateway.

mod client;
mod normalize;

pub use client::HttpCatalogGateway;
pub use normalize::member_ids;
