//! One tick's derived figures.

use std::fmt;

/// Rollup of the aggregated statistics at one poll tick.
///
/// All values carry the historical integer truncation; the raw floats only
/// exist inside the aggregator and its CSV snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rollup {
    /// Minimum recorded per-block TPS
    pub min: u64,
    /// Maximum recorded per-block TPS
    pub max: u64,
    /// Mean recorded per-block TPS
    pub average: u64,
    /// Point-sample TPS of the freshest batch
    pub current: u64,
    /// Newest height reported by the freshest batch
    pub height: u64,
}

impl fmt::Display for Rollup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min: {}, max: {}, avrg: {}, current: {}, last height: {}",
            self.min, self.max, self.average, self.current, self.height
        )
    }
}
