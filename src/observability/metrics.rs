//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): total requests by status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_snapshot_hits_total` (counter): snapshot responses by route
//! - `gateway_fallthrough_total` (counter): requests deferred to the SPA
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Route label only on the hit counter; the allow-list bounds cardinality

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(status: u16, start: Instant) {
    metrics::counter!("gateway_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a snapshot served to a crawler.
pub fn record_snapshot_hit(route: &str) {
    metrics::counter!("gateway_snapshot_hits_total", "route" => route.to_string()).increment(1);
}

/// Record a request deferred to default SPA handling.
pub fn record_fallthrough() {
    metrics::counter!("gateway_fallthrough_total").increment(1);
}
