//! Metrics collection and exposition.
//!
//! # Metrics
//! - `live_nodes_discovery_total` (counter): discovery cycles by outcome
//! - `live_nodes_live_count` (gauge): size of the current live list
//! - `live_nodes_bad_count` (gauge): size of the quarantine set
//! - `live_nodes_bad_resets_total` (counter): quarantine wipes

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Result of one discovery cycle, used as the `outcome` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// The live list was replaced.
    Updated,
    /// The candidates matched the current list.
    Unchanged,
    /// Nothing usable remained after filtering; the old list stays.
    Empty,
    TransportError,
    StatusError,
    ParseError,
}

impl DiscoveryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryOutcome::Updated => "updated",
            DiscoveryOutcome::Unchanged => "unchanged",
            DiscoveryOutcome::Empty => "empty",
            DiscoveryOutcome::TransportError => "transport_error",
            DiscoveryOutcome::StatusError => "status_error",
            DiscoveryOutcome::ParseError => "parse_error",
        }
    }
}

pub fn record_discovery(outcome: DiscoveryOutcome) {
    metrics::counter!("live_nodes_discovery_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn set_live_count(count: usize) {
    metrics::gauge!("live_nodes_live_count").set(count as f64);
}

pub fn set_bad_count(count: usize) {
    metrics::gauge!("live_nodes_bad_count").set(count as f64);
}

pub fn record_bad_reset() {
    metrics::counter!("live_nodes_bad_resets_total").increment(1);
}

/// Install the Prometheus recorder and its scrape listener.
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}
