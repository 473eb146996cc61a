//! # Inbound Ports (API)

use serde::{Deserialize, Serialize};

use crate::domain::actions::{ActionOutcome, ActionRequest, FreezeTarget};
use crate::domain::errors::GovernanceError;
use crate::domain::multisig::MultisigConfig;
use crate::domain::policy::PolicyRegistry;
use crate::domain::proposal::{GovernanceProposal, ProposalPayload, ProposalStatus, ProposalType};
use crate::domain::records::{AttestationRecord, RedemptionRecord};

/// Executed proposal together with the effect it applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub proposal: GovernanceProposal,
    pub outcome: ActionOutcome,
}

pub trait GovernanceApi: Send + Sync {
    // -------------------------------------------------------------------------
    // Proposal lifecycle
    // -------------------------------------------------------------------------

    /// Open a proposal. `proposer` must be a configured multisig signer.
    ///
    /// # Errors
    /// - `PayloadMismatch` when the payload kind is not `proposal_type`
    /// - `NotAuthorizedSigner`
    /// - `DuplicateProposal` when the derived id is taken
    fn create_proposal(
        &self,
        proposal_type: ProposalType,
        proposer: &str,
        payload: ProposalPayload,
    ) -> Result<GovernanceProposal, GovernanceError>;

    /// Add `signer`'s approval, signed over the proposal's signing message.
    ///
    /// # Errors
    /// - `NotAuthorizedSigner`, `ProposalNotFound`
    /// - `InvalidState` unless pending
    /// - `ProposalExpired` (the proposal is marked expired)
    /// - `DuplicateApproval`
    /// - `Authority` on a bad signature
    fn approve_proposal(&self, id: &str, signer: &str, signature: &[u8]) -> Result<GovernanceProposal, GovernanceError>;

    /// Record a negative vote. Same checks as approval.
    fn reject_proposal(&self, id: &str, signer: &str, signature: &[u8]) -> Result<GovernanceProposal, GovernanceError>;

    /// Apply an approved proposal's effect exactly once.
    ///
    /// # Errors
    /// - `InvalidState` unless approved
    /// - `NotApprover` when `executor` did not approve
    /// - `ProposalExpired`
    fn execute_proposal(&self, id: &str, executor: &str) -> Result<ExecutionResult, GovernanceError>;

    fn get_proposal(&self, id: &str) -> Result<GovernanceProposal, GovernanceError>;

    /// Proposals ordered by creation time, optionally filtered by status.
    fn list_proposals(&self, status: Option<ProposalStatus>) -> Result<Vec<GovernanceProposal>, GovernanceError>;

    /// Mark every non-terminal proposal past its expiry as expired.
    fn sweep_expired(&self) -> Result<Vec<String>, GovernanceError>;

    // -------------------------------------------------------------------------
    // Direct actions
    // -------------------------------------------------------------------------

    /// Perform a privileged action on one role holder's signature.
    ///
    /// # Errors
    /// - `MultisigRequired` when policy forbids the direct path
    /// - `RoleNotPermitted`, `Authority`
    /// - `LimitExceeded`, `CooldownViolation`
    fn execute_action(&self, request: ActionRequest, actor: &str, signature: &[u8]) -> Result<ActionOutcome, GovernanceError>;

    fn freeze_account(
        &self,
        target: FreezeTarget,
        reason: &str,
        actor: &str,
        signature: &[u8],
    ) -> Result<ActionOutcome, GovernanceError> {
        let request = ActionRequest::FreezeAccount {
            target,
            reason: reason.to_string(),
        };
        self.execute_action(request, actor, signature)
    }

    fn unfreeze_account(&self, target: FreezeTarget, actor: &str, signature: &[u8]) -> Result<ActionOutcome, GovernanceError> {
        self.execute_action(ActionRequest::UnfreezeAccount { target }, actor, signature)
    }

    fn seize_utxo(
        &self,
        utxo_id: &str,
        vault_owner: &str,
        reason: &str,
        actor: &str,
        signature: &[u8],
    ) -> Result<ActionOutcome, GovernanceError> {
        let request = ActionRequest::SeizeUtxo {
            utxo_id: utxo_id.to_string(),
            vault_owner: vault_owner.to_string(),
            reason: reason.to_string(),
        };
        self.execute_action(request, actor, signature)
    }

    fn redeem_stablecoin(
        &self,
        user_id: &str,
        amount: u64,
        bank_reference: &str,
        actor: &str,
        signature: &[u8],
    ) -> Result<ActionOutcome, GovernanceError> {
        let request = ActionRequest::RedeemStablecoin {
            user_id: user_id.to_string(),
            amount,
            bank_reference: bank_reference.to_string(),
        };
        self.execute_action(request, actor, signature)
    }

    fn attest_reserve(
        &self,
        reserve_amount: u64,
        report_hash: &str,
        commitment: Option<&str>,
        actor: &str,
        signature: &[u8],
    ) -> Result<ActionOutcome, GovernanceError> {
        let request = ActionRequest::AttestReserve {
            reserve_amount,
            report_hash: report_hash.to_string(),
            commitment: commitment.map(str::to_string),
        };
        self.execute_action(request, actor, signature)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    fn policy(&self) -> Result<PolicyRegistry, GovernanceError>;

    fn multisig_config(&self) -> Result<MultisigConfig, GovernanceError>;

    fn latest_attestation(&self) -> Result<Option<AttestationRecord>, GovernanceError>;

    fn get_redemption(&self, redemption_id: &str) -> Result<RedemptionRecord, GovernanceError>;
}
