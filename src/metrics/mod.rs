//! Metrics collection for observability

use crate::checker::ProviderKind;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_histogram_with_registry, CounterVec, Encoder, Histogram, HistogramOpts,
    HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    /// Completed checks by provider and verdict (`ok`, `ng`, `error`)
    pub fact_checks: CounterVec,
    pub fact_check_duration: HistogramVec,
    pub citations_per_check: Histogram,

    // HTTP surface
    pub http_requests: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let fact_checks = register_counter_vec_with_registry!(
            Opts::new("fact_checks_total", "Total fact checks by provider and verdict"),
            &["provider", "verdict"],
            registry
        )?;

        let fact_check_duration = register_histogram_vec_with_registry!(
            "fact_check_duration_seconds",
            "Provider round-trip duration in seconds",
            &["provider"],
            vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0],
            registry
        )?;

        let citations_per_check = register_histogram_with_registry!(
            HistogramOpts::new("fact_check_citations", "Citations attached to a verdict")
                .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 20.0]),
            registry
        )?;

        let http_requests = register_counter_vec_with_registry!(
            Opts::new("http_requests_total", "Total HTTP requests by endpoint and status"),
            &["endpoint", "status"],
            registry
        )?;

        Ok(Self {
            registry,
            fact_checks,
            fact_check_duration,
            citations_per_check,
            http_requests,
        })
    }

    /// Record a completed check
    pub fn record_check(&self, provider: ProviderKind, ok: bool, elapsed: Duration) {
        let verdict = if ok { "ok" } else { "ng" };
        self.fact_checks
            .with_label_values(&[provider.as_str(), verdict])
            .inc();
        self.fact_check_duration
            .with_label_values(&[provider.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    /// Record a check whose upstream call failed
    pub fn record_failure(&self, provider: ProviderKind, elapsed: Duration) {
        self.fact_checks
            .with_label_values(&[provider.as_str(), "error"])
            .inc();
        self.fact_check_duration
            .with_label_values(&[provider.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    pub fn observe_citations(&self, count: usize) {
        self.citations_per_check.observe(count as f64);
    }

    pub fn record_http(&self, endpoint: &str, status: u16) {
        self.http_requests
            .with_label_values(&[endpoint, &status.to_string()])
            .inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
