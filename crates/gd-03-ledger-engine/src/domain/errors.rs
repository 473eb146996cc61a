//! # Ledger Errors

use shared_types::{AuthorityError, Categorized, ErrorCategory, StoreError};
use thiserror::Error;

use crate::domain::entities::UtxoStatus;
use crate::domain::kyc::KycTier;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("At least one input is required")]
    EmptyInputs,

    #[error("At least one output is required")]
    EmptyOutputs,

    #[error("Too many {what}: {count} exceeds {max}")]
    TooMany {
        what: &'static str,
        count: usize,
        max: usize,
    },

    #[error("Output {index} amount must be positive")]
    ZeroAmount { index: usize },

    #[error("Output {index} has no owner")]
    MissingOwner { index: usize },

    #[error("Input {0} listed twice")]
    DuplicateInput(String),

    #[error("Amount overflow")]
    AmountOverflow,

    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error("UTXO {utxo_id} belongs to {owner}, not {actor}")]
    NotOwner {
        utxo_id: String,
        owner: String,
        actor: String,
    },

    #[error("UTXO {0} not found")]
    UtxoNotFound(String),

    #[error("UTXO {utxo_id} is not active (status {status})")]
    NotActive { utxo_id: String, status: UtxoStatus },

    #[error("UTXO {utxo_id} cannot move from {from} to {to}")]
    InvalidTransition {
        utxo_id: String,
        from: UtxoStatus,
        to: UtxoStatus,
    },

    #[error("Account {0} is frozen")]
    AccountFrozen(String),

    #[error("Account {0} is not frozen")]
    AccountNotFrozen(String),

    #[error("Ledger is halted")]
    LedgerHalted,

    #[error("Conservation law violation: inputs={inputs}, outputs={outputs}")]
    ConservationViolation { inputs: u64, outputs: u64 },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("UTXO {0} already exists")]
    DuplicateUtxo(String),

    #[error("Insufficient balance for {owner}: have {available}, need {requested}")]
    InsufficientFunds {
        owner: String,
        available: u64,
        requested: u64,
    },

    #[error("{what} of {amount} exceeds ceiling {ceiling}")]
    LimitExceeded {
        what: &'static str,
        amount: u64,
        ceiling: u64,
    },

    #[error("KYC {tier} daily limit {limit} exceeded for {owner}: used {used}, requested {requested}")]
    KycLimitExceeded {
        owner: String,
        tier: KycTier,
        limit: u64,
        used: u64,
        requested: u64,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Categorized for LedgerError {
    fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::EmptyInputs
            | LedgerError::EmptyOutputs
            | LedgerError::TooMany { .. }
            | LedgerError::ZeroAmount { .. }
            | LedgerError::MissingOwner { .. }
            | LedgerError::DuplicateInput(_)
            | LedgerError::AmountOverflow => ErrorCategory::Validation,
            LedgerError::Authority(e) => e.category(),
            LedgerError::NotOwner { .. } => ErrorCategory::Authorization,
            LedgerError::UtxoNotFound(_)
            | LedgerError::NotActive { .. }
            | LedgerError::InvalidTransition { .. }
            | LedgerError::AccountFrozen(_)
            | LedgerError::AccountNotFrozen(_)
            | LedgerError::LedgerHalted
            | LedgerError::InsufficientFunds { .. } => ErrorCategory::State,
            LedgerError::ConservationViolation { .. }
            | LedgerError::InvariantViolation(_)
            | LedgerError::DuplicateUtxo(_) => ErrorCategory::Integrity,
            LedgerError::LimitExceeded { .. } | LedgerError::KycLimitExceeded { .. } => {
                ErrorCategory::Policy
            }
            LedgerError::Store(_) => ErrorCategory::Storage,
        }
    }
}
