//! Per-height TPS accumulation and rollup queries.

use crate::error::CoreError;
use crate::models::BlockBatch;
use crate::time::{parse_block_time, seconds_between};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Header row of the CSV snapshot.
pub const CSV_HEADER: &str = "height,TPS";

/// What one `update` call did with a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Heights inserted this call
    pub inserted: usize,
    /// Heights skipped because they were already recorded
    pub skipped_known: usize,
    /// Heights skipped because the block carried no transactions
    pub skipped_empty: usize,
    /// Heights dropped because the adjacent interval was zero or negative
    pub degenerate: usize,
}

/// Accumulates per-block TPS over the process lifetime.
///
/// Heights are recorded exactly once (first-seen wins) so that re-overlapping
/// poll windows never recompute or drift an existing entry. Iteration order
/// is height-ascending, which the CSV snapshot relies on.
#[derive(Debug, Default)]
pub struct TpsAggregator {
    stats: BTreeMap<u64, f64>,
}

impl TpsAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one newest-first batch into the accumulated map.
    ///
    /// Per index: an already-known height is skipped, a zero-transaction
    /// block is skipped, and the oldest entry of the window is skipped
    /// because no older timestamp exists to form its delta. A height that
    /// was excluded as oldest is picked up by a later poll where the window
    /// has shifted — unless the window has fully moved past it, which is an
    /// accepted coverage gap.
    ///
    /// A timestamp that fails to parse aborts the whole call; the map is
    /// left with whatever was inserted before the bad entry and the caller
    /// abandons the cycle.
    pub fn update(&mut self, batch: &BlockBatch) -> Result<UpdateSummary, CoreError> {
        batch.validate()?;

        let mut summary = UpdateSummary::default();
        if batch.blocks.is_empty() {
            return Ok(summary);
        }

        let last = batch.blocks.len() - 1;
        for (i, block) in batch.blocks.iter().enumerate() {
            if self.stats.contains_key(&block.height) {
                summary.skipped_known += 1;
                continue;
            }
            if block.tx_count == 0 {
                summary.skipped_empty += 1;
                continue;
            }
            if i == last {
                // No older timestamp inside this window.
                continue;
            }

            let newer = parse_block_time(&batch.times[i])?;
            let older = parse_block_time(&batch.times[i + 1])?;
            let delta = seconds_between(newer, older);
            if delta <= 0.0 {
                warn!(
                    height = block.height,
                    delta, "non-positive interval between adjacent blocks, sample dropped"
                );
                summary.degenerate += 1;
                continue;
            }

            self.stats.insert(block.height, block.tx_count as f64 / delta);
            summary.inserted += 1;
        }

        Ok(summary)
    }

    /// Minimum recorded TPS, truncated toward zero; 0 when nothing is
    /// recorded yet.
    pub fn min_tps(&self) -> u64 {
        self.stats
            .values()
            .copied()
            .reduce(f64::min)
            .map_or(0, |v| v as u64)
    }

    /// Maximum recorded TPS, truncated toward zero; 0 when empty.
    pub fn max_tps(&self) -> u64 {
        self.stats
            .values()
            .copied()
            .reduce(f64::max)
            .map_or(0, |v| v as u64)
    }

    /// Mean recorded TPS, truncated toward zero; 0 when empty.
    pub fn average_tps(&self) -> u64 {
        if self.stats.is_empty() {
            return 0;
        }
        let sum: f64 = self.stats.values().sum();
        (sum / self.stats.len() as f64) as u64
    }

    /// Point-sample TPS of the freshest tick, truncated toward zero.
    ///
    /// Computed purely from the two newest samples of the given batch,
    /// deliberately decoupled from the accumulated map so it reflects the
    /// latest tick even when that height was recorded long ago.
    pub fn current_tps(batch: &BlockBatch) -> Result<u64, CoreError> {
        batch.validate()?;
        if batch.blocks.len() < 2 {
            return Err(CoreError::BatchTooShort {
                len: batch.blocks.len(),
                need: 2,
            });
        }

        let newer = parse_block_time(&batch.times[0])?;
        let older = parse_block_time(&batch.times[1])?;
        let delta = seconds_between(newer, older);
        if delta <= 0.0 {
            return Err(CoreError::DegenerateInterval { delta });
        }

        Ok((batch.blocks[0].tx_count as f64 / delta) as u64)
    }

    /// Recorded TPS for a height, if present.
    pub fn get(&self, height: u64) -> Option<f64> {
        self.stats.get(&height).copied()
    }

    /// Number of recorded heights.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// True when nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Renders the accumulated map as CSV, heights ascending, TPS as the raw
    /// float.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for (height, tps) in &self.stats {
            out.push_str(&format!("{height},{tps}\n"));
        }
        out
    }

    /// Writes the CSV snapshot to `path`.
    pub fn write_csv(&self, path: &Path) -> Result<(), CoreError> {
        fs::write(path, self.to_csv())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockRange, BlockSample};

    fn batch(samples: &[(u64, u64)], times: &[&str]) -> BlockBatch {
        BlockBatch {
            range: BlockRange {
                end: samples.first().map(|(h, _)| *h).unwrap_or(0),
            },
            blocks: samples
                .iter()
                .map(|&(height, tx_count)| BlockSample { height, tx_count })
                .collect(),
            times: times.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn derives_tps_from_adjacent_timestamps() {
        let mut agg = TpsAggregator::new();
        let summary = agg
            .update(&batch(
                &[(5, 100), (4, 50)],
                &["2024-01-01T00:00:01.500Z", "2024-01-01T00:00:00.000Z"],
            ))
            .unwrap();

        assert_eq!(summary.inserted, 1);
        assert!((agg.get(5).unwrap() - 100.0 / 1.5).abs() < 1e-9);
        // Oldest entry of the window has no derivable delta.
        assert_eq!(agg.get(4), None);
        assert_eq!(agg.len(), 1);
    }

    #[test]
    fn reingestion_is_idempotent() {
        let b = batch(
            &[(7, 30), (6, 20), (5, 10)],
            &[
                "2024-01-01T00:00:03.000Z",
                "2024-01-01T00:00:02.000Z",
                "2024-01-01T00:00:00.000Z",
            ],
        );

        let mut once = TpsAggregator::new();
        once.update(&b).unwrap();

        let mut twice = TpsAggregator::new();
        twice.update(&b).unwrap();
        let second = twice.update(&b).unwrap();

        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped_known, 2);
        assert_eq!(once.len(), twice.len());
        for height in [7u64, 6, 5] {
            assert_eq!(once.get(height), twice.get(height));
        }
    }

    #[test]
    fn first_seen_wins_across_overlapping_windows() {
        let mut agg = TpsAggregator::new();
        agg.update(&batch(
            &[(6, 40), (5, 10)],
            &["2024-01-01T00:00:04.000Z", "2024-01-01T00:00:02.000Z"],
        ))
        .unwrap();
        let first = agg.get(6).unwrap();

        // The next window re-reports height 6 with a different (stale)
        // timestamp pairing; the recorded value must not move.
        agg.update(&batch(
            &[(7, 80), (6, 40), (5, 10)],
            &[
                "2024-01-01T00:00:08.000Z",
                "2024-01-01T00:00:04.000Z",
                "2024-01-01T00:00:03.000Z",
            ],
        ))
        .unwrap();

        assert_eq!(agg.get(6).unwrap(), first);
        assert!((agg.get(7).unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn empty_blocks_are_never_inserted() {
        let mut agg = TpsAggregator::new();
        let summary = agg
            .update(&batch(
                &[(9, 0), (8, 5), (7, 0), (6, 1)],
                &[
                    "2024-01-01T00:00:06.000Z",
                    "2024-01-01T00:00:04.000Z",
                    "2024-01-01T00:00:02.000Z",
                    "2024-01-01T00:00:00.000Z",
                ],
            ))
            .unwrap();

        assert_eq!(summary.skipped_empty, 2);
        assert_eq!(agg.get(9), None);
        assert_eq!(agg.get(7), None);
        assert!(agg.get(8).is_some());
    }

    #[test]
    fn oldest_entry_excluded_even_when_countable() {
        let mut agg = TpsAggregator::new();
        agg.update(&batch(
            &[(3, 10), (2, 999)],
            &["2024-01-01T00:00:02.000Z", "2024-01-01T00:00:00.000Z"],
        ))
        .unwrap();

        assert_eq!(agg.get(2), None);
    }

    #[test]
    fn rollups_are_zero_on_empty_map() {
        let agg = TpsAggregator::new();
        assert_eq!(agg.min_tps(), 0);
        assert_eq!(agg.max_tps(), 0);
        assert_eq!(agg.average_tps(), 0);
        assert!(agg.is_empty());
    }

    #[test]
    fn rollups_truncate_toward_zero() {
        let mut agg = TpsAggregator::new();
        // 19 tx / 2 s = 9.5 and 59 tx / 4 s = 14.75; truncation, not
        // rounding, is the historical behavior.
        agg.update(&batch(
            &[(12, 59), (11, 19), (10, 1)],
            &[
                "2024-01-01T00:00:06.000Z",
                "2024-01-01T00:00:02.000Z",
                "2024-01-01T00:00:00.000Z",
            ],
        ))
        .unwrap();

        assert_eq!(agg.min_tps(), 9);
        assert_eq!(agg.max_tps(), 14);
        // (9.5 + 14.75) / 2 = 12.125
        assert_eq!(agg.average_tps(), 12);
    }

    #[test]
    fn degenerate_interval_is_reported_not_inserted() {
        let mut agg = TpsAggregator::new();
        // Newest pair shares one instant; the delta is zero.
        let summary = agg
            .update(&batch(
                &[(21, 10), (20, 10), (19, 10)],
                &[
                    "2024-01-01T00:00:02.000Z",
                    "2024-01-01T00:00:02.000Z",
                    "2024-01-01T00:00:00.000Z",
                ],
            ))
            .unwrap();

        assert_eq!(summary.degenerate, 1);
        assert_eq!(agg.get(21), None);
        assert!(agg.get(20).is_some());
    }

    #[test]
    fn malformed_timestamp_fails_the_update() {
        let mut agg = TpsAggregator::new();
        let err = agg
            .update(&batch(
                &[(2, 5), (1, 5)],
                &["garbage", "2024-01-01T00:00:00.000Z"],
            ))
            .unwrap_err();

        assert!(matches!(err, CoreError::MalformedTimestamp { .. }));
    }

    #[test]
    fn current_tps_ignores_dedup_state() {
        let b = batch(
            &[(5, 100), (4, 50)],
            &["2024-01-01T00:00:01.500Z", "2024-01-01T00:00:00.000Z"],
        );

        let mut agg = TpsAggregator::new();
        agg.update(&b).unwrap();
        assert!(agg.get(5).is_some());

        // Height 5 is already recorded; the point sample is computed anyway.
        assert_eq!(TpsAggregator::current_tps(&b).unwrap(), 66);
    }

    #[test]
    fn current_tps_needs_two_samples() {
        let b = batch(&[(1, 5)], &["2024-01-01T00:00:00.000Z"]);
        assert!(matches!(
            TpsAggregator::current_tps(&b),
            Err(CoreError::BatchTooShort { len: 1, need: 2 })
        ));
    }

    #[test]
    fn current_tps_rejects_degenerate_delta() {
        let b = batch(
            &[(5, 100), (4, 50)],
            &["2024-01-01T00:00:00.000Z", "2024-01-01T00:00:01.000Z"],
        );
        assert!(matches!(
            TpsAggregator::current_tps(&b),
            Err(CoreError::DegenerateInterval { .. })
        ));
    }

    #[test]
    fn csv_round_trip() {
        let mut agg = TpsAggregator::new();
        // 13 tx / 4 s = 3.25 at height 12, 11 tx / 2 s = 5.5 at height 10.
        agg.update(&batch(
            &[(12, 13), (10, 11), (9, 1)],
            &[
                "2024-01-01T00:00:06.000Z",
                "2024-01-01T00:00:02.000Z",
                "2024-01-01T00:00:00.000Z",
            ],
        ))
        .unwrap();

        let csv = agg.to_csv();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(lines.next(), Some("10,5.5"));
        assert_eq!(lines.next(), Some("12,3.25"));
        assert_eq!(lines.next(), None);

        // Re-parsing recovers the same mapping.
        for row in csv.lines().skip(1) {
            let (height, tps) = row.split_once(',').unwrap();
            let height: u64 = height.parse().unwrap();
            let tps: f64 = tps.parse().unwrap();
            assert_eq!(agg.get(height), Some(tps));
        }
    }

    #[test]
    fn csv_snapshot_written_to_disk() {
        let mut agg = TpsAggregator::new();
        agg.update(&batch(
            &[(12, 13), (10, 11), (9, 1)],
            &[
                "2024-01-01T00:00:06.000Z",
                "2024-01-01T00:00:02.000Z",
                "2024-01-01T00:00:00.000Z",
            ],
        ))
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        agg.write_csv(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, agg.to_csv());
    }
}
