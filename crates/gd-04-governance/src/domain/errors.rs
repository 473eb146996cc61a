//! # Governance Errors

use gd_02_commitment_tracker::CommitmentError;
use gd_03_ledger_engine::LedgerError;
use shared_types::{AuthorityError, Categorized, ErrorCategory, StoreError};
use thiserror::Error;

use crate::domain::policy::GovernanceAction;
use crate::domain::proposal::{ProposalStatus, ProposalType};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("Field {0} must not be empty")]
    EmptyField(&'static str),

    #[error("Amount must be positive")]
    ZeroAmount,

    #[error("Payload kind {found} does not match proposal type {expected}")]
    PayloadMismatch {
        expected: ProposalType,
        found: ProposalType,
    },

    #[error("Invalid multisig configuration: {0}")]
    InvalidMultisig(String),

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("{0} is not an authorized governance signer")]
    NotAuthorizedSigner(String),

    #[error("{executor} did not approve proposal {proposal_id}")]
    NotApprover { executor: String, proposal_id: String },

    #[error("{actor} holds no role permitted to {action}")]
    RoleNotPermitted { actor: String, action: GovernanceAction },

    #[error("{0} requires a multisig proposal")]
    MultisigRequired(GovernanceAction),

    #[error(transparent)]
    Authority(#[from] AuthorityError),

    #[error("Proposal {0} not found")]
    ProposalNotFound(String),

    #[error("Proposal {id} is {status}, expected {expected}")]
    InvalidState {
        id: String,
        status: ProposalStatus,
        expected: ProposalStatus,
    },

    #[error("Proposal {0} has expired")]
    ProposalExpired(String),

    #[error("Proposal {0} already exists")]
    DuplicateProposal(String),

    #[error("Redemption {0} not found")]
    RedemptionNotFound(String),

    #[error("{signer} already voted on proposal {proposal_id}")]
    DuplicateApproval { signer: String, proposal_id: String },

    #[error("{action} cooldown active: {remaining_secs}s remaining")]
    CooldownViolation {
        action: GovernanceAction,
        remaining_secs: u64,
    },

    #[error("{action} amount {amount} exceeds ceiling {ceiling}")]
    LimitExceeded {
        action: GovernanceAction,
        amount: u64,
        ceiling: u64,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Commitment(#[from] CommitmentError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Categorized for GovernanceError {
    fn category(&self) -> ErrorCategory {
        match self {
            GovernanceError::EmptyField(_)
            | GovernanceError::ZeroAmount
            | GovernanceError::PayloadMismatch { .. }
            | GovernanceError::InvalidMultisig(_)
            | GovernanceError::InvalidPolicy(_) => ErrorCategory::Validation,
            GovernanceError::NotAuthorizedSigner(_)
            | GovernanceError::NotApprover { .. }
            | GovernanceError::RoleNotPermitted { .. }
            | GovernanceError::MultisigRequired(_) => ErrorCategory::Authorization,
            GovernanceError::Authority(e) => e.category(),
            GovernanceError::ProposalNotFound(_)
            | GovernanceError::InvalidState { .. }
            | GovernanceError::ProposalExpired(_)
            | GovernanceError::DuplicateProposal(_)
            | GovernanceError::RedemptionNotFound(_) => ErrorCategory::State,
            GovernanceError::DuplicateApproval { .. } => ErrorCategory::Integrity,
            GovernanceError::CooldownViolation { .. } | GovernanceError::LimitExceeded { .. } => {
                ErrorCategory::Policy
            }
            GovernanceError::Ledger(e) => e.category(),
            GovernanceError::Commitment(e) => e.category(),
            GovernanceError::Store(_) => ErrorCategory::Storage,
        }
    }
}
