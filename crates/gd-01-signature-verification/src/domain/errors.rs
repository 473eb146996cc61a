//! # Signature Errors
//!
//! Error types for key registration and signature verification.

use shared_types::{Categorized, ErrorCategory, Role};
use thiserror::Error;

use crate::domain::entities::DilithiumMode;

/// Errors that can occur during key registration or verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// Identifier was empty or whitespace.
    #[error("Key identifier must not be empty")]
    EmptyIdentifier,

    /// Identifier carries leading or trailing whitespace.
    #[error("Key identifier {0:?} has surrounding whitespace")]
    InvalidIdentifier(String),

    /// No key material supplied.
    #[error("Public key must not be empty")]
    EmptyKey,

    /// Key length does not match its declared mode.
    #[error("Public key for {mode} must be {expected} bytes, got {actual}")]
    KeySizeMismatch {
        mode: DilithiumMode,
        expected: usize,
        actual: usize,
    },

    /// Mode string not recognised.
    #[error("Unknown Dilithium mode: {0}")]
    UnknownMode(String),

    /// Nothing registered under this identifier.
    #[error("No key registered for {0}")]
    KeyNotFound(String),

    /// Signature or stored key has the wrong length for the scheme.
    ///
    /// Checked before the cryptographic verification.
    #[error("Malformed {what} for {mode}: expected {expected} bytes, got {actual}")]
    FormatError {
        what: &'static str,
        mode: DilithiumMode,
        expected: usize,
        actual: usize,
    },

    /// The scheme rejected the signature.
    #[error("Signature by {0} is invalid")]
    SignatureInvalid(String),

    /// Context tag missing.
    #[error("Verification context must not be empty")]
    EmptyContext,

    /// Context tag longer than the framing allows.
    #[error("Verification context is {0} bytes, at most 255 allowed")]
    ContextTooLong(usize),

    /// Identifier lacks the role the caller requires.
    #[error("{identifier} does not hold role {role}")]
    RoleNotBound { identifier: String, role: Role },
}

impl Categorized for SignatureError {
    fn category(&self) -> ErrorCategory {
        match self {
            SignatureError::EmptyIdentifier
            | SignatureError::InvalidIdentifier(_)
            | SignatureError::EmptyKey
            | SignatureError::KeySizeMismatch { .. }
            | SignatureError::UnknownMode(_)
            | SignatureError::EmptyContext
            | SignatureError::ContextTooLong(_) => ErrorCategory::Validation,
            SignatureError::KeyNotFound(_)
            | SignatureError::FormatError { .. }
            | SignatureError::SignatureInvalid(_) => ErrorCategory::Signature,
            SignatureError::RoleNotBound { .. } => ErrorCategory::Authorization,
        }
    }
}
