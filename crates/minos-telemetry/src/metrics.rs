//! Prometheus metrics for Minos.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `minos_requests_total` | Counter | `controller`, `action` | Dispatched requests |
//! | `minos_request_duration_seconds` | Histogram | `controller`, `action` | Dispatch latency |
//! | `minos_request_errors_total` | Counter | `controller`, `kind` | Requests ending in the error handler |
//! | `minos_worker_requests` | Gauge | - | Requests served by this worker |
//!
//! Recording functions are no-ops until a recorder is installed, so library
//! code records unconditionally.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,

    /// Address to expose metrics on (e.g., "0.0.0.0:9090").
    pub addr: String,

    /// Histogram buckets for request duration.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: "0.0.0.0:9090".to_string(),
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

/// Initializes the metrics subsystem and starts the exporter listener.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if initialization fails.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| TelemetryError::InvalidAddress(format!("{}: {e}", config.addr)))?;

    PrometheusBuilder::new()
        .set_buckets(&config.duration_buckets)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?
        .with_http_listener(addr)
        .install()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    register_metric_descriptions();

    Ok(())
}

fn register_metric_descriptions() {
    describe_counter!("minos_requests_total", "Total number of dispatched requests");
    describe_histogram!(
        "minos_request_duration_seconds",
        "Time from dispatch to completion in seconds"
    );
    describe_counter!(
        "minos_request_errors_total",
        "Requests handed to the controller error handler"
    );
    describe_gauge!(
        "minos_worker_requests",
        "Requests served by this worker process"
    );
}

/// Records a finished dispatch.
pub fn record_dispatch(controller: &str, action: &str, duration: Duration) {
    counter!(
        "minos_requests_total",
        "controller" => controller.to_string(),
        "action" => action.to_string()
    )
    .increment(1);

    histogram!(
        "minos_request_duration_seconds",
        "controller" => controller.to_string(),
        "action" => action.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records a request that reached the error handler.
///
/// `kind` is a short label such as `timeout`, `panic` or `action`.
pub fn record_error(controller: &str, kind: &str) {
    counter!(
        "minos_request_errors_total",
        "controller" => controller.to_string(),
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Mirrors the worker request counter.
pub fn record_worker_requests(count: u64) {
    gauge!("minos_worker_requests").set(count as f64);
}
