//! Metrics collection and exposition.
//!
//! # Metrics
//! - `resolver_requests_total` (counter): requests by method, status
//! - `resolver_request_duration_seconds` (histogram): end-to-end latency
//! - `resolver_store_lookups_total` (counter): lookups by store, hit/miss

use std::net::SocketAddr;
use std::time::Instant;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "resolver_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("resolver_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a key-value lookup.
pub fn record_store_lookup(store: &'static str, hit: bool) {
    metrics::counter!(
        "resolver_store_lookups_total",
        "store" => store,
        "result" => if hit { "hit" } else { "miss" }
    )
    .increment(1);
}
