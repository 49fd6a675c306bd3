//! Prometheus push-gateway delivery.
//!
//! Three gauges are kept in a private registry, refreshed each tick and
//! delivered as a text-encoded PUT to the gateway, grouped by the job name
//! and the monitored node's host component.

use crate::error::ExportError;
use crate::rollup::Rollup;
use chainpulse_explorer::normalize_node_address;
use prometheus::{Encoder, IntGauge, Registry, TextEncoder};
use reqwest::Client;
use url::Url;

/// Job label all chainpulse pushes are grouped under.
const JOB_NAME: &str = "chainpulse";

/// Push-gateway exporter for one monitored node.
#[derive(Clone)]
pub struct PushGateway {
    gateway: Url,
    instance: String,
    http: Client,
    registry: Registry,
    tps_current: IntGauge,
    tps_average: IntGauge,
    current_height: IntGauge,
}

impl PushGateway {
    /// Creates an exporter pushing to `gateway_addr`, labeling all series
    /// with `instance` (the monitored node's `host[:port]`).
    pub fn new(gateway_addr: &str, instance: String) -> Result<Self, ExportError> {
        let gateway = normalize_node_address(gateway_addr)?;

        let registry = Registry::new();
        let tps_current = IntGauge::new(
            "node_tps_current",
            "Point-sample TPS of the node's newest block",
        )?;
        let tps_average = IntGauge::new(
            "node_tps_average",
            "Average TPS over all recorded blocks",
        )?;
        let current_height = IntGauge::new("node_current_height", "Latest block height")?;

        registry.register(Box::new(tps_current.clone()))?;
        registry.register(Box::new(tps_average.clone()))?;
        registry.register(Box::new(current_height.clone()))?;

        Ok(Self {
            gateway,
            instance,
            http: Client::new(),
            registry,
            tps_current,
            tps_average,
            current_height,
        })
    }

    /// Instance label the pushes are grouped by.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// URL the metrics are delivered to.
    pub fn push_url(&self) -> Result<Url, ExportError> {
        self.gateway
            .join(&format!("metrics/job/{JOB_NAME}/instance/{}", self.instance))
            .map_err(|err| {
                ExportError::InvalidGateway(chainpulse_explorer::ExplorerError::InvalidAddress {
                    address: self.gateway.to_string(),
                    source: err,
                })
            })
    }

    /// Refreshes the gauges from one tick's rollup and delivers them.
    pub async fn push(&self, rollup: &Rollup) -> Result<(), ExportError> {
        self.tps_current.set(rollup.current as i64);
        self.tps_average.set(rollup.average as i64);
        self.current_height.set(rollup.height as i64);

        let mut body = Vec::new();
        let encoder = TextEncoder::new();
        encoder.encode(&self.registry.gather(), &mut body)?;

        let response = self
            .http
            .put(self.push_url()?)
            .header("content-type", encoder.format_type())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::BadStatus { status });
        }
        Ok(())
    }
}
