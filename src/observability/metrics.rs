//! Metrics collection and exposition.
//!
//! # Metrics
//! - `image_proxy_requests_total` (counter): requests by outcome
//!   (`ok`, `missing_url`, `invalid_extension`, `fetch_failed`)
//! - `image_proxy_fetch_duration_seconds` (histogram): origin fetch latency
//! - `image_proxy_fetched_bytes` (histogram): origin body sizes

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its own scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(
            address = %addr,
            error = %e,
            "Failed to install metrics exporter"
        ),
    }
}

/// Count one finished request.
pub fn record_request(outcome: &'static str) {
    metrics::counter!("image_proxy_requests_total", "outcome" => outcome).increment(1);
}

/// Record a completed origin fetch.
pub fn record_fetch(start: Instant, bytes: usize) {
    metrics::histogram!("image_proxy_fetch_duration_seconds").record(start.elapsed().as_secs_f64());
    metrics::histogram!("image_proxy_fetched_bytes").record(bytes as f64);
}
