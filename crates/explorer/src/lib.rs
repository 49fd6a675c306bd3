//! Chainpulse explorer — HTTP access to a node's block-explorer endpoint.

pub mod client;
pub mod error;

pub use client::{normalize_node_address, ExplorerClient};
pub use error::ExplorerError;
