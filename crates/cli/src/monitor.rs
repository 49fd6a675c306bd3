//! The sampler loop: fetch, aggregate, report, repeat.

use chainpulse_core::TpsAggregator;
use chainpulse_explorer::ExplorerClient;
use chainpulse_export::{Exporter, Rollup};
use std::time::Duration;
use tokio::signal;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Delay before resuming the cadence after a transient transport failure.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Single-threaded fetch -> aggregate -> report loop.
///
/// Owns the aggregator exclusively; no other task reads or writes it, so
/// rollups are never observed mid-update.
pub struct Monitor {
    client: ExplorerClient,
    aggregator: TpsAggregator,
    exporters: Vec<Exporter>,
    interval: Duration,
    count: usize,
}

impl Monitor {
    /// Creates a monitor with an empty aggregator.
    pub fn new(
        client: ExplorerClient,
        exporters: Vec<Exporter>,
        interval: Duration,
        count: usize,
    ) -> Self {
        Self {
            client,
            aggregator: TpsAggregator::new(),
            exporters,
            interval,
            count,
        }
    }

    /// The accumulated statistics.
    pub fn aggregator(&self) -> &TpsAggregator {
        &self.aggregator
    }

    /// Performs one poll cycle. Every failure mode is recoverable at this
    /// granularity: the cycle is abandoned, the accumulated map survives.
    pub async fn poll_once(&mut self) {
        let batch = match self.client.latest_blocks(self.count).await {
            Ok(batch) => batch,
            Err(err) if err.is_transient() => {
                warn!(error = %err, "couldn't connect to node, trying once again");
                sleep(RETRY_DELAY).await;
                return;
            }
            Err(err) => {
                warn!(error = %err, "bad response from node, skipping this cycle");
                return;
            }
        };

        let summary = match self.aggregator.update(&batch) {
            Ok(summary) => summary,
            Err(err) => {
                warn!(error = %err, "cannot process batch, skipping this cycle");
                return;
            }
        };
        debug!(
            inserted = summary.inserted,
            known = summary.skipped_known,
            empty = summary.skipped_empty,
            degenerate = summary.degenerate,
            "batch folded in"
        );

        // The point sample is independent of the accumulated map; a
        // degenerate newest interval only blanks this tick's figure.
        let current = match TpsAggregator::current_tps(&batch) {
            Ok(current) => current,
            Err(err) => {
                warn!(error = %err, "cannot derive current TPS this tick");
                0
            }
        };

        let rollup = Rollup {
            min: self.aggregator.min_tps(),
            max: self.aggregator.max_tps(),
            average: self.aggregator.average_tps(),
            current,
            height: batch.range.end,
        };
        for exporter in &self.exporters {
            exporter.report(&rollup).await;
        }
    }

    /// Polls at a fixed cadence until the operator interrupts, then flushes
    /// the exporters. Interruption is the only path that triggers the final
    /// CSV snapshot.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.interval);
        // A stalled fetch must not be followed by a burst of catch-up polls.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(node = %self.client.base_url(), interval = ?self.interval, "monitoring started");

        loop {
            tokio::select! {
                result = signal::ctrl_c() => {
                    if let Err(err) = result {
                        error!(error = %err, "failed to wait for shutdown signal");
                    } else {
                        info!("shutdown signal received, exiting");
                    }
                    break;
                }
                _ = ticker.tick() => self.poll_once().await,
            }
        }

        for exporter in &self.exporters {
            if let Err(err) = exporter.flush(&self.aggregator) {
                error!(error = %err, "final flush failed");
            }
        }
    }
}
