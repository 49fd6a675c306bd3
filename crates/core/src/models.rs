//! Wire model for one explorer fetch.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// One block as reported by the explorer endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSample {
    /// Block height
    pub height: u64,
    /// Number of transactions accepted in this block
    pub tx_count: u64,
}

/// Height range covered by a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    /// Height of the newest block in the window
    pub end: u64,
}

/// One fetch's worth of blocks with acceptance timestamps.
///
/// Both `blocks` and `times` are ordered newest-first and paired 1:1 by
/// index. The oldest entry carries a timestamp but no older reference point
/// within the window, so its TPS cannot be derived from this batch alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockBatch {
    /// Window boundaries
    pub range: BlockRange,
    /// Block samples, newest-first
    pub blocks: Vec<BlockSample>,
    /// Acceptance timestamps, newest-first, one per block
    pub times: Vec<String>,
}

impl BlockBatch {
    /// Checks that blocks and timestamps pair up 1:1.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.blocks.len() != self.times.len() {
            return Err(CoreError::ShapeMismatch {
                blocks: self.blocks.len(),
                times: self.times.len(),
            });
        }
        Ok(())
    }

    /// The newest block in the window, if any.
    pub fn newest(&self) -> Option<&BlockSample> {
        self.blocks.first()
    }
}
