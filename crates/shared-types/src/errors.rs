//! # Error Types
//!
//! Store errors and the error taxonomy shared by every subsystem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the host key-value store or by (de)serialising records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A record could not be encoded.
    #[error("Failed to encode record {key}: {reason}")]
    Encode { key: String, reason: String },

    /// A stored record could not be decoded.
    #[error("Corrupt record at {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// The backend rejected the read or write.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Coarse classification of every error the core can return.
///
/// The request dispatcher renders this category alongside the message so a
/// caller knows whether to fix input, obtain a new signature, re-query
/// state, or wait out a policy window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed input, resubmit corrected.
    Validation,
    /// Caller lacks the role or authority.
    Authorization,
    /// Cryptographic check failed.
    Signature,
    /// Referenced entity missing or in the wrong lifecycle state.
    State,
    /// Conservation, double-spend or nullifier reuse.
    Integrity,
    /// Cooldown or amount ceiling breached.
    Policy,
    /// Host store failure.
    Storage,
}

impl ErrorCategory {
    /// Integrity failures are potential attack signals.
    pub fn is_security_relevant(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Authorization | ErrorCategory::Signature | ErrorCategory::Integrity
        )
    }
}

/// Errors that can be placed in the shared taxonomy.
pub trait Categorized {
    /// Category of this error.
    fn category(&self) -> ErrorCategory;
}

impl Categorized for StoreError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Storage
    }
}

/// Failure reported by the signature gateway to the engines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorityError {
    /// Identifier does not hold the role the operation needs.
    #[error("{signer} does not hold role {role}")]
    RoleNotBound { signer: String, role: String },

    /// Key lookup, format pre-check or cryptographic verification failed.
    #[error("Signature rejected for {signer}: {reason}")]
    SignatureRejected { signer: String, reason: String },
}

impl Categorized for AuthorityError {
    fn category(&self) -> ErrorCategory {
        match self {
            AuthorityError::RoleNotBound { .. } => ErrorCategory::Authorization,
            AuthorityError::SignatureRejected { .. } => ErrorCategory::Signature,
        }
    }
}
