//! HTTP client for the node's block-explorer endpoint.

use crate::error::ExplorerError;
use chainpulse_core::BlockBatch;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Path of the batch endpoint, relative to the node base address.
const BLOCKS_PATH: &str = "api/explorer/v1/blocks";

/// Client for one node's explorer API.
///
/// Owns the base URL and the reqwest connection pool; one instance lives for
/// the whole monitoring session.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    base: Url,
    http: Client,
}

impl ExplorerClient {
    /// Creates a client for `node_addr`.
    ///
    /// Accepts either a full URL or a bare `host:port`; a missing scheme
    /// defaults to plain HTTP. `timeout` bounds each request end to end.
    pub fn new(node_addr: &str, timeout: Duration) -> Result<Self, ExplorerError> {
        let base = normalize_node_address(node_addr)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ExplorerError::Transport)?;

        Ok(Self { base, http })
    }

    /// Base URL the client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `host[:port]` component of the node address, used as the metrics
    /// grouping label.
    pub fn instance_label(&self) -> String {
        let host = self.base.host_str().unwrap_or_default();
        match self.base.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Fetches the latest `count` blocks with their acceptance timestamps.
    pub async fn latest_blocks(&self, count: usize) -> Result<BlockBatch, ExplorerError> {
        let mut url = self
            .base
            .join(BLOCKS_PATH)
            .map_err(|source| ExplorerError::InvalidAddress {
                address: self.base.to_string(),
                source,
            })?;
        url.query_pairs_mut()
            .append_pair("count", &count.to_string())
            .append_pair("add_blocks_time", "true");

        debug!(url = %url, "querying explorer");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::BadStatus { status });
        }

        // Decode from the raw body rather than `Response::json` so a schema
        // change surfaces as a Decode error, not a transport one.
        let body = response.text().await?;
        let batch: BlockBatch = serde_json::from_str(&body)?;
        Ok(batch)
    }
}

/// Normalizes an operator-supplied node address into a base URL, defaulting
/// to `http://` when no scheme is present.
pub fn normalize_node_address(address: &str) -> Result<Url, ExplorerError> {
    let trimmed = address.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let mut url = Url::parse(&with_scheme).map_err(|source| ExplorerError::InvalidAddress {
        address: address.to_string(),
        source,
    })?;

    // A trailing slash makes `Url::join` treat the base as a directory.
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    Ok(url)
}
