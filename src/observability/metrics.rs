//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define dispatch metrics (request counts, latency, resolution outcomes)
//! - Expose a Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status, handler
//! - `router_request_duration_seconds` (histogram): latency by method
//! - `router_resolutions_total` (counter): resolution outcomes
//!
//! # Design Decisions
//! - Handler label is the `component#method` identity, `none` when unmatched
//! - Exporter failures are logged, never fatal; the server runs without
//!   metrics rather than not at all

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Installs the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to install metrics exporter");
        }
    }
}

/// Records one dispatched request.
pub fn record_request(method: &str, status: u16, handler: &str, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    counter!(
        "router_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "handler" => handler.to_string()
    )
    .increment(1);
    histogram!("router_request_duration_seconds", "method" => method.to_string())
        .record(elapsed);
}

/// Records a resolution outcome: `matched`, `no_match`, `method_not_allowed`,
/// `unsatisfied_condition` or `ambiguous`.
pub fn record_resolution(outcome: &'static str) {
    counter!("router_resolutions_total", "outcome" => outcome).increment(1);
}
