//! Metrics collection and exposition.
//!
//! # Metrics
//! - `publisher_chain_requests_total` (counter): chain lookups by outcome
//! - `publisher_issuers_configured` (gauge): distinct issuers with a chain
//! - `publisher_health_serving` (gauge): 1=serving, 0=not serving
//! - `publisher_block_profile_rate` (gauge): configured contention sample rate
//!
//! Updates are no-ops until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Serve Prometheus metrics on the debug address.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_chain_request(outcome: &'static str) {
    metrics::counter!("publisher_chain_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_issuers(count: usize) {
    metrics::gauge!("publisher_issuers_configured").set(count as f64);
}

pub fn record_health(serving: bool) {
    metrics::gauge!("publisher_health_serving").set(if serving { 1.0 } else { 0.0 });
}

pub fn record_block_profile_rate(rate: u64) {
    metrics::gauge!("publisher_block_profile_rate").set(rate as f64);
}
