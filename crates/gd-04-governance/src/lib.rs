//! # Governance Subsystem (GD-04)
//!
//! M-of-N multisig proposals and role-gated privileged actions over the
//! ledger.
//!
//! ## Authorization paths
//!
//! | Path | Authority | Checks |
//! |------|-----------|--------|
//! | Proposal | quorum of configured signers | signer set, expiry, one vote per signer, executor approved |
//! | Direct | one role holder's signature | policy role, `requires_multisig`, context-bound signature |
//!
//! Both paths run the same effect code, so amount ceilings and cooldowns
//! from the [`PolicyRegistry`] bind either way.
//!
//! ## Proposal lifecycle
//!
//! `pending → approved → executed`, with `rejected` and `expired` as the
//! other terminal states. Expiry is applied lazily on the next vote or
//! execution attempt, or eagerly by [`GovernanceApi::sweep_expired`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::actions::{direct_action_message, ActionOutcome, ActionRequest, FreezeTarget};
pub use domain::errors::GovernanceError;
pub use domain::multisig::MultisigConfig;
pub use domain::policy::{CooldownScope, GovernanceAction, PolicyChange, PolicyRegistry, PolicyRule};
pub use domain::proposal::{
    Approval, GovernanceProposal, ProposalPayload, ProposalStatus, ProposalType, APPROVE_CONTEXT,
    REJECT_CONTEXT,
};
pub use domain::records::{AttestationRecord, RedemptionRecord};
pub use ports::inbound::{ExecutionResult, GovernanceApi};
pub use ports::outbound::{CommitmentGateway, LedgerGateway};
pub use service::{GovernanceDependencies, GovernanceEngine};
