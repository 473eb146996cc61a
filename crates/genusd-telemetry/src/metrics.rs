//! Prometheus metrics for GENUSD.
//!
//! All metrics follow the naming convention: `genusd_<area>_<metric>_<unit>`
//!
//! Counters are fed from audit events by [`crate::TelemetryAuditSink`], so
//! every engine is covered without depending on this crate.

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // OPERATION METRICS
    // =========================================================================

    /// Audited operations by event type and result
    pub static ref OPERATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("genusd_operations_total", "Audited operations"),
        &["event_type", "action", "result"]
    ).expect("metric creation failed");

    /// Failed operations by error category
    pub static ref OPERATION_ERRORS: CounterVec = CounterVec::new(
        Opts::new("genusd_operation_errors_total", "Failed operations by error category"),
        &["category"]
    ).expect("metric creation failed");

    /// Authorization, signature and integrity failures (for alerting)
    pub static ref SECURITY_FAILURES: Counter = Counter::new(
        "genusd_security_failures_total",
        "Failures in security-relevant categories"
    ).expect("metric creation failed");

    /// Request handling duration by operation
    pub static ref REQUEST_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "genusd_request_duration_seconds",
            "Time spent dispatching one contract request"
        ).buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        &["operation"]
    ).expect("metric creation failed");

    // =========================================================================
    // LEDGER METRICS
    // =========================================================================

    /// Total supply after the last committed supply change
    pub static ref TOTAL_SUPPLY: Gauge = Gauge::new(
        "genusd_ledger_total_supply",
        "Outstanding supply in base units"
    ).expect("metric creation failed");

    /// Amount moved per ledger operation
    pub static ref LEDGER_AMOUNT: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "genusd_ledger_operation_amount",
            "Amount carried by mint, transfer and burn"
        ).buckets(vec![1e2, 1e4, 1e6, 1e8, 1e10, 1e12])
    ).expect("metric creation failed");
}

/// Handle over the registry the counters were registered in.
#[derive(Clone)]
pub struct MetricsHandle {
    registry: Registry,
}

impl MetricsHandle {
    /// Prometheus text exposition of every registered metric.
    pub fn encode(&self) -> Result<String, TelemetryError> {
        encode_registry(&self.registry)
    }
}

/// Register all metrics with the global registry.
///
/// Registering twice is not an error.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Operations
        Box::new(OPERATIONS_TOTAL.clone()),
        Box::new(OPERATION_ERRORS.clone()),
        Box::new(SECURITY_FAILURES.clone()),
        Box::new(REQUEST_DURATION.clone()),
        // Ledger
        Box::new(TOTAL_SUPPLY.clone()),
        Box::new(LEDGER_AMOUNT.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: REGISTRY.clone(),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    encode_registry(&REGISTRY)
}

fn encode_registry(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
    ($histogram:expr, $labels:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram.with_label_values($labels))
    };
}
