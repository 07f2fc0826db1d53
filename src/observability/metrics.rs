//! Metrics collection and exposition.
//!
//! # Metrics
//! - `frame_host_frames_registered` (gauge): frames in the registry
//! - `frame_host_frame_starts_total` (counter): start dispatches, by frame
//! - `frame_host_shutdowns_total` (counter): shutdown sequences, by verdict
//!
//! Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_registered(count: usize) {
    metrics::gauge!("frame_host_frames_registered").set(count as f64);
}

pub fn record_start(frame: &str) {
    metrics::counter!("frame_host_frame_starts_total", "frame" => frame.to_string()).increment(1);
}

pub fn record_shutdown(graceful: bool) {
    let verdict = if graceful { "true" } else { "false" };
    metrics::counter!("frame_host_shutdowns_total", "graceful" => verdict).increment(1);
}
