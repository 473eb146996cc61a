//! Audit sink that logs, counts and buffers every event.
//!
//! The engines only know [`AuditSink`]. This sink fans each event out to
//! the `tracing` subscriber, the Prometheus counters and a bounded
//! in-memory buffer that an operator can page through or export.

use std::collections::VecDeque;

use parking_lot::RwLock;
use shared_types::{AuditEvent, AuditEventType, AuditResult, AuditSink, ErrorCategory};

use crate::metrics::{LEDGER_AMOUNT, OPERATIONS_TOTAL, OPERATION_ERRORS, SECURITY_FAILURES, TOTAL_SUPPLY};
use crate::{log_event, TelemetryConfig, TelemetryError};

/// Bounded, queryable audit trail.
pub struct TelemetryAuditSink {
    buffer: RwLock<VecDeque<AuditEvent>>,
    capacity: usize,
    metrics_enabled: bool,
}

impl TelemetryAuditSink {
    pub fn new(config: &TelemetryConfig) -> Self {
        Self::with_capacity(config.audit_buffer, config.metrics_enabled)
    }

    pub fn with_capacity(capacity: usize, metrics_enabled: bool) -> Self {
        Self {
            buffer: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
            metrics_enabled,
        }
    }

    /// Up to `n` most recent events, oldest first.
    pub fn recent_events(&self, n: usize) -> Vec<AuditEvent> {
        let buffer = self.buffer.read();
        let skip = buffer.len().saturating_sub(n);
        buffer.iter().skip(skip).cloned().collect()
    }

    pub fn events_of(&self, event_type: AuditEventType) -> Vec<AuditEvent> {
        self.buffer
            .read()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// Buffered failures in security-relevant categories.
    pub fn security_failures(&self) -> Vec<AuditEvent> {
        self.buffer
            .read()
            .iter()
            .filter(|e| e.error_category.is_some_and(|c| c.is_security_relevant()))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.read().is_empty()
    }

    /// Buffered events as a JSON array.
    pub fn export_json(&self) -> Result<String, TelemetryError> {
        let buffer = self.buffer.read();
        let events: Vec<&AuditEvent> = buffer.iter().collect();
        serde_json::to_string(&events).map_err(|e| TelemetryError::Export(e.to_string()))
    }

    fn record_metrics(&self, event: &AuditEvent) {
        let event_type = wire_name(event.event_type);
        let result = match event.result {
            AuditResult::Success => "success",
            AuditResult::Failure => "failure",
        };
        OPERATIONS_TOTAL
            .with_label_values(&[event_type.as_str(), event.action.as_str(), result])
            .inc();

        if let Some(category) = event.error_category {
            OPERATION_ERRORS.with_label_values(&[category_label(category)]).inc();
            if category.is_security_relevant() {
                SECURITY_FAILURES.inc();
            }
        }

        if event.is_success() {
            if let Some(supply) = numeric_param(event, "total_supply") {
                TOTAL_SUPPLY.set(supply);
            }
            if let Some(amount) = numeric_param(event, "amount") {
                LEDGER_AMOUNT.observe(amount);
            }
        }
    }

    fn push(&self, event: AuditEvent) {
        if self.capacity == 0 {
            return;
        }
        let mut buffer = self.buffer.write();
        while buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(event);
    }
}

impl AuditSink for TelemetryAuditSink {
    fn log_event(&self, event: AuditEvent) {
        match (&event.result, event.error_category) {
            (AuditResult::Success, _) => log_event!(
                info,
                "audit",
                "Audit event",
                event_id = %event.event_id,
                event_type = ?event.event_type,
                action = %event.action,
                actor = %event.actor,
                subject = %event.target,
                tx_id = %event.tx_id
            ),
            (AuditResult::Failure, Some(ErrorCategory::Integrity)) => log_event!(
                error,
                "audit",
                "Audit integrity failure",
                event_id = %event.event_id,
                event_type = ?event.event_type,
                action = %event.action,
                actor = %event.actor,
                subject = %event.target,
                tx_id = %event.tx_id,
                error = ?event.error
            ),
            (AuditResult::Failure, category) => log_event!(
                warn,
                "audit",
                "Audit failure",
                event_id = %event.event_id,
                event_type = ?event.event_type,
                action = %event.action,
                actor = %event.actor,
                subject = %event.target,
                tx_id = %event.tx_id,
                category = ?category,
                error = ?event.error
            ),
        }

        if self.metrics_enabled {
            self.record_metrics(&event);
        }
        self.push(event);
    }
}

fn wire_name(event_type: AuditEventType) -> String {
    serde_json::to_value(event_type)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{event_type:?}"))
}

fn category_label(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Validation => "validation",
        ErrorCategory::Authorization => "authorization",
        ErrorCategory::Signature => "signature",
        ErrorCategory::State => "state",
        ErrorCategory::Integrity => "integrity",
        ErrorCategory::Policy => "policy",
        ErrorCategory::Storage => "storage",
    }
}

fn numeric_param(event: &AuditEvent, key: &str) -> Option<f64> {
    event.params.get(key).and_then(|v| v.parse::<u64>().ok()).map(|v| v as f64)
}
