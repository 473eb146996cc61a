//! # Commitment Errors

use shared_types::{Categorized, ErrorCategory, StoreError};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommitmentError {
    #[error("Proof bytes must not be empty")]
    MissingProofBytes,

    #[error("Commitment must not be empty")]
    MissingCommitment,

    #[error("Nullifier must not be empty")]
    MissingNullifier,

    /// The zero-knowledge analogue of spending a UTXO twice.
    #[error("Double spend: nullifier {0} already used")]
    NullifierReused(String),

    #[error("Commitment {0} already exists")]
    CommitmentExists(String),

    #[error("Commitment mismatch: supplied {supplied}, expected {expected}")]
    CommitmentMismatch { supplied: String, expected: String },

    #[error("Proof for commitment {0} rejected by verifier")]
    ProofRejected(String),

    #[error("Commitment {0} not found")]
    NotFound(String),

    #[error("Commitment {0} already used")]
    AlreadyUsed(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Categorized for CommitmentError {
    fn category(&self) -> ErrorCategory {
        match self {
            CommitmentError::MissingProofBytes
            | CommitmentError::MissingCommitment
            | CommitmentError::MissingNullifier => ErrorCategory::Validation,
            CommitmentError::NullifierReused(_)
            | CommitmentError::CommitmentExists(_)
            | CommitmentError::CommitmentMismatch { .. } => ErrorCategory::Integrity,
            CommitmentError::ProofRejected(_) => ErrorCategory::Signature,
            CommitmentError::NotFound(_) | CommitmentError::AlreadyUsed(_) => ErrorCategory::State,
            CommitmentError::Store(_) => ErrorCategory::Storage,
        }
    }
}
