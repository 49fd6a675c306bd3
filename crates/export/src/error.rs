//! Exporter error types

use thiserror::Error;

/// Errors produced by the output surfaces
#[derive(Debug, Error)]
pub enum ExportError {
    /// Gateway address could not be parsed
    #[error("invalid push gateway address: {0}")]
    InvalidGateway(#[from] chainpulse_explorer::ExplorerError),

    /// Metric registration or encoding failed
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Delivery to the push gateway failed
    #[error("push failed: {0}")]
    Push(#[from] reqwest::Error),

    /// The gateway answered with a non-success status
    #[error("push rejected: HTTP {status}")]
    BadStatus {
        /// Status code of the gateway response
        status: reqwest::StatusCode,
    },

    /// Writing the CSV snapshot failed
    #[error("snapshot failed: {0}")]
    Snapshot(#[from] chainpulse_core::CoreError),
}
