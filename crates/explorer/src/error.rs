//! Explorer client error taxonomy.

use thiserror::Error;

/// Errors produced while talking to the node's explorer endpoint
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Node address could not be parsed into a URL
    #[error("invalid node address '{address}': {source}")]
    InvalidAddress {
        /// The address as given on the command line
        address: String,
        /// Underlying parse failure
        source: url::ParseError,
    },

    /// Transport-level failure (connection refused, unreachable, timeout)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with a non-success status
    #[error("bad response: HTTP {status}")]
    BadStatus {
        /// Status code of the response
        status: reqwest::StatusCode,
    },

    /// The response body did not match the expected batch shape
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ExplorerError {
    /// True for failures worth retrying after a short delay without
    /// abandoning any state — connection-level problems rather than protocol
    /// or format ones.
    pub fn is_transient(&self) -> bool {
        match self {
            ExplorerError::Transport(err) => err.is_connect() || err.is_timeout(),
            _ => false,
        }
    }
}
