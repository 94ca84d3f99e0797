//! Prometheus metrics for the dashboard service.
//!
//! Covers HTTP traffic and the aggregation pipeline itself:
//! - Requests per route and status
//! - Aggregations per metric family and outcome
//! - Aggregation latency
//! - Audit events skipped for lacking a usable status
//!
//! # Example
//! ```no_run
//! use brd_dashboard::metrics::AGGREGATIONS_TOTAL;
//!
//! AGGREGATIONS_TOTAL
//!     .with_label_values(&["transitions", "success"])
//!     .inc();
//! ```

pub mod middleware;

pub use middleware::track_metrics;

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use std::time::Duration;

const NAMESPACE: &str = "brd_dashboard";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Total number of HTTP requests received
    ///
    /// Labels: method, path, status_code
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests")
            .namespace(NAMESPACE),
        &["method", "path", "status_code"]
    ).expect("Failed to create HTTP_REQUESTS_TOTAL metric");

    /// HTTP request duration in seconds
    ///
    /// Labels: method, path
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        &["method", "path"]
    ).expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric");

    /// Dashboard aggregations performed
    ///
    /// Labels: family, outcome (success, rejected, error)
    pub static ref AGGREGATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("aggregations_total", "Dashboard aggregations by family and outcome")
            .namespace(NAMESPACE),
        &["family", "outcome"]
    ).expect("Failed to create AGGREGATIONS_TOTAL metric");

    /// Time spent in one aggregation, fetches included
    ///
    /// Labels: family
    pub static ref AGGREGATION_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "aggregation_duration_seconds",
            "Dashboard aggregation duration in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["family"]
    ).expect("Failed to create AGGREGATION_DURATION_SECONDS metric");

    /// Audit events that carried no usable status value
    pub static ref AUDIT_EVENTS_SKIPPED_TOTAL: Counter = Counter::with_opts(
        Opts::new(
            "audit_events_skipped_total",
            "Audit events skipped because their status was missing or unknown"
        )
        .namespace(NAMESPACE)
    ).expect("Failed to create AUDIT_EVENTS_SKIPPED_TOTAL metric");
}

/// Register all metrics with the global registry.
///
/// Call once at startup; a second call fails with `AlreadyReg`.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(AGGREGATIONS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(AGGREGATION_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(AUDIT_EVENTS_SKIPPED_TOTAL.clone()))?;

    tracing::debug!("Prometheus metrics registered");
    Ok(())
}

/// Record one finished aggregation
pub fn record_aggregation(family: &str, outcome: &str, elapsed: Duration) {
    AGGREGATIONS_TOTAL
        .with_label_values(&[family, outcome])
        .inc();
    AGGREGATION_DURATION_SECONDS
        .with_label_values(&[family])
        .observe(elapsed.as_secs_f64());
}

pub fn record_skipped_events(count: usize) {
    AUDIT_EVENTS_SKIPPED_TOTAL.inc_by(count as f64);
}

/// Gather all metrics in Prometheus text format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}
