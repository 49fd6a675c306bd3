//! chainpulse — live TPS monitor for a ledger node.
//!
//! Polls the node's block-explorer endpoint once a second, derives per-block
//! TPS from timestamp deltas and keeps running min/max/average figures.
//!
//! Usage:
//!   chainpulse --node node.example.com:8080
//!   chainpulse --node node.example.com:8080 --output /path/to/stats.csv
//!   chainpulse --node node.example.com:8080 --service --pushgateway gw:9091
//!
//! The monitor runs until Ctrl+C; the CSV snapshot, if requested, is written
//! on that clean exit.

use anyhow::{Context, Result};
use chainpulse_cli::{Args, Monitor};
use chainpulse_explorer::ExplorerClient;
use chainpulse_export::{Exporter, PushGateway};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing()?;

    if let Err(msg) = args.validate() {
        eprintln!("{msg}");
        std::process::exit(1);
    }

    let client = ExplorerClient::new(&args.node, args.request_timeout())
        .context("invalid node address")?;

    let mut exporters = Vec::new();
    if let Some(gateway) = &args.pushgateway {
        let push = PushGateway::new(gateway, client.instance_label())
            .context("invalid push gateway address")?;
        exporters.push(Exporter::Push(push));
    }
    if !args.service {
        exporters.push(Exporter::Console);
    }
    if let Some(path) = &args.output {
        exporters.push(Exporter::Csv(path.clone()));
    }
    if exporters.is_empty() {
        exporters.push(Exporter::None);
    }

    let mut monitor = Monitor::new(client, exporters, args.poll_interval(), args.count);
    monitor.run().await;

    Ok(())
}

/// Logs go to stderr so the live status line owns stdout.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("failed to initialize logging")
}
