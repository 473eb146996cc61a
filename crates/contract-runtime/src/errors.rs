//! # Runtime Errors
//!
//! Everything the dispatcher can fail with. Engine errors pass through
//! unchanged so their category reaches the caller.

use gd_01_signature_verification::SignatureError;
use gd_02_commitment_tracker::CommitmentError;
use gd_03_ledger_engine::LedgerError;
use gd_04_governance::GovernanceError;
use genusd_telemetry::TelemetryError;
use shared_types::{AuthorityError, Categorized, ErrorCategory, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A genesis key could not be registered.
    #[error("Genesis key {identifier}: {source}")]
    Genesis {
        identifier: String,
        #[source]
        source: SignatureError,
    },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Request payload did not match the operation.
    #[error("Malformed payload for {operation}: {reason}")]
    Payload { operation: String, reason: String },

    #[error("Request actor must not be empty")]
    MissingActor,

    /// Envelope signature over the request was rejected.
    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Commitment(#[from] CommitmentError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Governance(#[from] GovernanceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

impl Categorized for RuntimeError {
    fn category(&self) -> ErrorCategory {
        match self {
            RuntimeError::Config(_)
            | RuntimeError::Genesis { .. }
            | RuntimeError::UnknownOperation(_)
            | RuntimeError::Payload { .. }
            | RuntimeError::MissingActor => ErrorCategory::Validation,
            RuntimeError::Authority(e) => e.category(),
            RuntimeError::Signature(e) => e.category(),
            RuntimeError::Commitment(e) => e.category(),
            RuntimeError::Ledger(e) => e.category(),
            RuntimeError::Governance(e) => e.category(),
            RuntimeError::Store(e) => e.category(),
            RuntimeError::Telemetry(_) => ErrorCategory::Storage,
        }
    }
}
