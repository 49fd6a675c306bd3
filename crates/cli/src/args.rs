//! Command-line arguments for the chainpulse monitor.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Live TPS monitor for a ledger node's block-explorer endpoint
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chainpulse",
    version = env!("CARGO_PKG_VERSION"),
    about = "Live TPS monitor for a ledger node",
    long_about = "Chainpulse polls a ledger node's block-explorer endpoint, derives \
per-block transactions-per-second from timestamp deltas and reports running \
min/max/average/current figures to the console, a Prometheus push gateway, or \
a CSV snapshot on exit."
)]
pub struct Args {
    /// Node address, `host:port` or full URL
    #[arg(short = 'n', long = "node", value_name = "ADDR", env = "CHAINPULSE_NODE")]
    pub node: String,

    /// Run as a service: no console display, metrics go to the push gateway
    #[arg(short = 's', long = "service")]
    pub service: bool,

    /// Prometheus push gateway address
    #[arg(
        short = 'p',
        long = "pushgateway",
        value_name = "ADDR",
        env = "CHAINPULSE_PUSHGATEWAY"
    )]
    pub pushgateway: Option<String>,

    /// File to dump the accumulated statistics into as CSV on exit
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Seconds between polls
    #[arg(long, value_name = "SECONDS", default_value_t = 1)]
    pub interval: u64,

    /// Blocks fetched per poll
    #[arg(long, value_name = "BLOCKS", default_value_t = 10)]
    pub count: usize,

    /// Timeout for each explorer request
    #[arg(long = "rpc-timeout", value_name = "SECONDS", default_value_t = 30)]
    pub rpc_timeout: u64,
}

impl Args {
    /// Rejects configurations the monitor cannot run with. Service mode has
    /// no console, so it is meaningless without a gateway to push to.
    pub fn validate(&self) -> Result<(), String> {
        if self.service && self.pushgateway.is_none() {
            return Err("Push gateway address required in service mode".to_string());
        }
        Ok(())
    }

    /// Poll cadence.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Per-request transport timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout)
    }
}
