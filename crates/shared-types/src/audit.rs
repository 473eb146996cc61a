//! # Audit Events
//!
//! Every top-level operation reports exactly one [`AuditEvent`] to an
//! [`AuditSink`]. Sinks are fire-and-forget: they must not fail the
//! operation and must not mutate ledger state.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::errors::{Categorized, ErrorCategory};
use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    Mint,
    Transfer,
    Burn,
    Governance,
    ZkVerify,
    KeyRegistry,
    InvariantCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditResult {
    Success,
    Failure,
}

/// Structured audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: String,
    pub event_type: AuditEventType,
    pub action: String,
    pub actor: String,
    pub target: String,
    pub timestamp: Timestamp,
    pub tx_id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    pub result: AuditResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_category: Option<ErrorCategory>,
}

impl AuditEvent {
    /// Start a successful event; call [`AuditEvent::failed`] to flip it.
    pub fn new(
        event_type: AuditEventType,
        action: impl Into<String>,
        actor: impl Into<String>,
        target: impl Into<String>,
        timestamp: Timestamp,
        tx_id: impl Into<String>,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            event_type,
            action: action.into(),
            actor: actor.into(),
            target: target.into(),
            timestamp,
            tx_id: tx_id.into(),
            params: BTreeMap::new(),
            result: AuditResult::Success,
            error: None,
            error_category: None,
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    pub fn failed<E: Categorized + std::fmt::Display>(mut self, error: &E) -> Self {
        self.result = AuditResult::Failure;
        self.error = Some(error.to_string());
        self.error_category = Some(error.category());
        self
    }

    /// Finish with the outcome of an operation.
    pub fn with_outcome<T, E: Categorized + std::fmt::Display>(self, outcome: &Result<T, E>) -> Self {
        match outcome {
            Ok(_) => self,
            Err(e) => self.failed(e),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result == AuditResult::Success
    }
}

/// Fire-and-forget audit destination.
pub trait AuditSink: Send + Sync {
    fn log_event(&self, event: AuditEvent);
}

/// Sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    events: RwLock<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.read().clone()
    }

    pub fn last(&self) -> Option<AuditEvent> {
        self.events.read().last().cloned()
    }

    pub fn count_of(&self, event_type: AuditEventType) -> usize {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }
}

impl AuditSink for RecordingAuditSink {
    fn log_event(&self, event: AuditEvent) {
        self.events.write().push(event);
    }
}
