//! Chainpulse export — output surfaces for the TPS monitor.
//!
//! An [`Exporter`] is selected once at startup from validated configuration
//! and then driven by the poll loop: [`Exporter::report`] on every tick,
//! [`Exporter::flush`] once on clean termination.

pub mod error;
pub mod push;
pub mod rollup;

pub use error::ExportError;
pub use push::PushGateway;
pub use rollup::Rollup;

use chainpulse_core::TpsAggregator;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// Where one tick's rollup (and the final snapshot) goes.
pub enum Exporter {
    /// Discard everything (service mode without a console)
    None,
    /// Rewrite a single live status line on stdout
    Console,
    /// Deliver gauges to a Prometheus push gateway
    Push(PushGateway),
    /// Write the accumulated map as CSV on shutdown
    Csv(PathBuf),
}

impl Exporter {
    /// Hands one tick's rollup to this surface.
    ///
    /// Failures are reported and swallowed; no exporter may disturb the
    /// polling cadence or the accumulated state.
    pub async fn report(&self, rollup: &Rollup) {
        match self {
            Exporter::None | Exporter::Csv(_) => {}
            Exporter::Console => {
                // Same line every tick; errors land on their own lines via
                // the log layer and the status is rewritten next tick.
                print!("\r{rollup}");
                let _ = io::stdout().flush();
            }
            Exporter::Push(gateway) => {
                if let Err(err) = gateway.push(rollup).await {
                    warn!(error = %err, "cannot push metrics to gateway");
                }
            }
        }
    }

    /// Final flush on clean termination.
    pub fn flush(&self, stats: &TpsAggregator) -> Result<(), ExportError> {
        match self {
            Exporter::Csv(path) => {
                stats.write_csv(path)?;
                info!(path = %path.display(), entries = stats.len(), "CSV snapshot written");
                Ok(())
            }
            Exporter::Console => {
                // Leave the last status line intact.
                println!();
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
