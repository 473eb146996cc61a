//! # GENUSD Telemetry
//!
//! Logging, Prometheus metrics and the audit trail for the GENUSD core.
//!
//! ## Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`init_logging`] | Global `tracing` subscriber, pretty or JSON lines |
//! | [`register_metrics`] | Prometheus counters fed from audit events |
//! | [`TelemetryAuditSink`] | [`shared_types::AuditSink`] that logs, counts and buffers |
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = TelemetryConfig::from_env();
//! let telemetry = init_telemetry(&config)?;
//! let audit = telemetry.audit_sink();
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GENUSD_SERVICE_NAME` | `genusd` | Service name in logs |
//! | `GENUSD_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `GENUSD_JSON_LOGS` | `false` | JSON lines output |
//! | `GENUSD_METRICS_ENABLED` | `true` | Update Prometheus counters |
//! | `GENUSD_AUDIT_BUFFER` | `10000` | Audit events kept in memory |

mod audit;
mod config;
mod logging;
pub mod metrics;

use std::sync::Arc;

pub use audit::TelemetryAuditSink;
pub use config::{TelemetryConfig, DEFAULT_AUDIT_BUFFER};
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, LEDGER_AMOUNT, OPERATIONS_TOTAL,
    OPERATION_ERRORS, REQUEST_DURATION, SECURITY_FAILURES, TOTAL_SUPPLY,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Failed to export audit trail: {0}")]
    Export(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging, metrics and the audit sink.
///
/// A subscriber that is already installed is kept, so embedding hosts and
/// tests can call this more than once.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<Telemetry, TelemetryError> {
    if config.service_name.trim().is_empty() {
        return Err(TelemetryError::Config("service name is empty".to_string()));
    }

    let metrics = if config.metrics_enabled {
        Some(register_metrics()?)
    } else {
        None
    };

    if let Err(e) = init_logging(config) {
        tracing::debug!(error = %e, "Keeping existing subscriber");
    }

    Ok(Telemetry {
        audit: Arc::new(TelemetryAuditSink::new(config)),
        metrics,
    })
}

/// Handles produced by [`init_telemetry`].
pub struct Telemetry {
    audit: Arc<TelemetryAuditSink>,
    metrics: Option<MetricsHandle>,
}

impl Telemetry {
    pub fn audit_sink(&self) -> Arc<TelemetryAuditSink> {
        Arc::clone(&self.audit)
    }

    /// Prometheus text exposition, or `None` when metrics are disabled.
    pub fn encode_metrics(&self) -> Option<Result<String, TelemetryError>> {
        self.metrics.as_ref().map(MetricsHandle::encode)
    }
}
