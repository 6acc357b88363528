//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lane_requests_total` (counter): requests by operation, status
//! - `lane_request_duration_seconds` (histogram): latency by operation
//! - `lane_assignment_events_total` (counter): assigned, cleared, rejected
//! - `lane_assignments_swept_total` (counter): entries reclaimed by the sweeper
//! - `lane_assignments_active` (gauge): entries held by the store

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(operation: &'static str, status: u16, start: Instant) {
    counter!(
        "lane_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("lane_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_assignment_event(event: &'static str) {
    counter!("lane_assignment_events_total", "event" => event).increment(1);
}

pub fn record_swept(removed: usize) {
    counter!("lane_assignments_swept_total").increment(removed as u64);
}

pub fn record_active_assignments(count: usize) {
    gauge!("lane_assignments_active").set(count as f64);
}
