//! Metrics collection and exposition.
//!
//! # Metrics
//! - `autocomply_health_polls_total` (counter): polls by outcome
//! - `autocomply_health_poll_duration_seconds` (histogram): poll latency
//! - `autocomply_backend_healthy` (gauge): 1=healthy, 0=unhealthy
//! - `autocomply_notifications_shown_total` (counter): banners by surface
//!
//! Recording without an installed exporter is a no-op.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_poll(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("autocomply_health_polls_total", "outcome" => outcome).increment(1);
    metrics::histogram!("autocomply_health_poll_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_backend_health(healthy: bool) {
    metrics::gauge!("autocomply_backend_healthy").set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_notification(surface: &'static str) {
    metrics::counter!("autocomply_notifications_shown_total", "surface" => surface).increment(1);
}
