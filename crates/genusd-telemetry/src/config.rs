//! Telemetry configuration from environment variables.

use std::env;

pub const DEFAULT_AUDIT_BUFFER: usize = 10_000;

/// Configuration for logging, metrics and the audit buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or an `EnvFilter`
    /// directive string
    pub log_level: String,

    /// Emit JSON lines instead of the pretty console format
    pub json_logs: bool,

    /// Enable ANSI colours in pretty output
    pub ansi: bool,

    /// Register and update Prometheus counters
    pub metrics_enabled: bool,

    /// Most recent audit events kept in memory
    pub audit_buffer: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "genusd".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            ansi: true,
            metrics_enabled: true,
            audit_buffer: DEFAULT_AUDIT_BUFFER,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GENUSD_SERVICE_NAME`: Service name (default: genusd)
    /// - `GENUSD_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `GENUSD_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `GENUSD_METRICS_ENABLED`: Update Prometheus counters (default: true)
    /// - `GENUSD_AUDIT_BUFFER`: Audit events kept in memory (default: 10000)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();
        let json_logs = env::var("GENUSD_JSON_LOGS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(is_container);

        Self {
            service_name: env::var("GENUSD_SERVICE_NAME").unwrap_or_else(|_| "genusd".to_string()),

            log_level: env::var("GENUSD_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs,

            ansi: !json_logs,

            metrics_enabled: env::var("GENUSD_METRICS_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            audit_buffer: env::var("GENUSD_AUDIT_BUFFER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_AUDIT_BUFFER),
        }
    }
}
