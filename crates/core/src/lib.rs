//! Chainpulse core — TPS derivation and aggregation.
//!
//! Converts overlapping newest-first batches of block/timestamp samples into
//! a deduplicated per-height TPS map and exposes min/max/average/current
//! rollups plus a CSV snapshot of the accumulated data.

pub mod aggregator;
pub mod error;
pub mod models;
pub mod time;

pub use aggregator::{TpsAggregator, UpdateSummary, CSV_HEADER};
pub use error::CoreError;
pub use models::{BlockBatch, BlockRange, BlockSample};
pub use time::parse_block_time;
