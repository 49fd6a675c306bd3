//! Core error types

use thiserror::Error;

/// Errors produced by the aggregation engine
#[derive(Debug, Error)]
pub enum CoreError {
    /// Block timestamp could not be parsed
    #[error("malformed block timestamp '{value}': {reason}")]
    MalformedTimestamp {
        /// The raw timestamp string as reported by the node
        value: String,
        /// Why parsing failed
        reason: String,
    },

    /// Blocks and timestamps arrays differ in length
    #[error("batch shape mismatch: {blocks} blocks but {times} timestamps")]
    ShapeMismatch {
        /// Number of block entries in the batch
        blocks: usize,
        /// Number of timestamp entries in the batch
        times: usize,
    },

    /// Batch has too few samples for the requested computation
    #[error("batch of {len} blocks is too short, need at least {need}")]
    BatchTooShort {
        /// Samples present
        len: usize,
        /// Samples required
        need: usize,
    },

    /// Zero or negative time delta between adjacent blocks
    #[error("non-positive interval of {delta}s between adjacent blocks")]
    DegenerateInterval {
        /// The computed delta in seconds
        delta: f64,
    },

    /// IO error while writing a snapshot
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
