//! # Governance Service
//!
//! Implements [`GovernanceApi`] over the host store.
//!
//! ## Architecture
//!
//! 1. Proposal lifecycle (create, vote, execute, expire) lives here
//! 2. Privileged effects are shared by both authorization paths (`actions`)
//! 3. Ledger and commitment mutations go through outbound ports inside the
//!    same [`StagedState`], so an effect and its proposal status change
//!    commit together

mod actions;
mod helpers;

use std::sync::Arc;

use serde_json::json;
use shared_types::keys::{self, LATEST_ATTESTATION, PROPOSAL_PREFIX};
use shared_types::{AuditSink, SignatureGateway, StagedState, StateStore, TimeSource};
use tracing::info;

use crate::domain::actions::{direct_action_message, ActionOutcome, ActionRequest};
use crate::domain::errors::GovernanceError;
use crate::domain::multisig::MultisigConfig;
use crate::domain::policy::PolicyRegistry;
use crate::domain::proposal::{
    Approval, GovernanceProposal, ProposalPayload, ProposalStatus, ProposalType, APPROVE_CONTEXT,
    REJECT_CONTEXT,
};
use crate::domain::records::{AttestationRecord, RedemptionRecord};
use crate::ports::inbound::{ExecutionResult, GovernanceApi};
use crate::ports::outbound::{CommitmentGateway, LedgerGateway};

use actions::ActionContext;

pub const PROPOSAL_CREATED_EVENT: &str = "ProposalCreated";
pub const PROPOSAL_APPROVED_EVENT: &str = "ProposalApproved";
pub const PROPOSAL_REJECTED_EVENT: &str = "ProposalRejected";
pub const PROPOSAL_EXECUTED_EVENT: &str = "ProposalExecuted";
pub const PROPOSAL_EXPIRED_EVENT: &str = "ProposalExpired";

/// Collaborators injected into the engine.
pub struct GovernanceDependencies {
    pub store: Arc<dyn StateStore>,
    pub gateway: Arc<dyn SignatureGateway>,
    pub ledger: Arc<dyn LedgerGateway>,
    pub commitments: Arc<dyn CommitmentGateway>,
    pub clock: Arc<dyn TimeSource>,
    pub audit: Arc<dyn AuditSink>,
}

pub struct GovernanceEngine {
    pub(crate) store: Arc<dyn StateStore>,
    pub(crate) gateway: Arc<dyn SignatureGateway>,
    pub(crate) ledger: Arc<dyn LedgerGateway>,
    pub(crate) commitments: Arc<dyn CommitmentGateway>,
    pub(crate) clock: Arc<dyn TimeSource>,
    pub(crate) audit: Arc<dyn AuditSink>,
    /// Used until `MULTISIG_CONFIG` is persisted.
    pub(crate) default_multisig: MultisigConfig,
    /// Used until `POLICY_REGISTRY` is persisted.
    pub(crate) default_policy: PolicyRegistry,
}

impl GovernanceEngine {
    pub fn new(deps: GovernanceDependencies, multisig: MultisigConfig) -> Self {
        Self {
            store: deps.store,
            gateway: deps.gateway,
            ledger: deps.ledger,
            commitments: deps.commitments,
            clock: deps.clock,
            audit: deps.audit,
            default_multisig: multisig,
            default_policy: PolicyRegistry::default(),
        }
    }

    pub fn with_policy(mut self, policy: PolicyRegistry) -> Self {
        self.default_policy = policy;
        self
    }

    /// Persist the default multisig config and policy table if absent.
    ///
    /// Returns `true` when anything was written.
    pub fn initialize_in(&self, state: &mut StagedState<'_>) -> Result<bool, GovernanceError> {
        self.default_multisig.validate()?;
        let mut wrote = false;
        if state.get(keys::MULTISIG_CONFIG)?.is_none() {
            state.put_json(keys::MULTISIG_CONFIG, &self.default_multisig)?;
            wrote = true;
        }
        if state.get(keys::POLICY_REGISTRY)?.is_none() {
            state.put_json(keys::POLICY_REGISTRY, &self.default_policy)?;
            wrote = true;
        }
        Ok(wrote)
    }

    // =========================================================================
    // VOTING
    // =========================================================================

    fn vote(&self, id: &str, signer: &str, signature: &[u8], approved: bool) -> Result<GovernanceProposal, GovernanceError> {
        let mut state = StagedState::begin(self.store.as_ref());
        let multisig = self.load_multisig(&state)?;
        if !multisig.is_signer(signer) {
            return Err(GovernanceError::NotAuthorizedSigner(signer.to_string()));
        }

        let mut proposal = self.load_proposal(&state, id)?;
        if proposal.status != ProposalStatus::Pending {
            return Err(GovernanceError::InvalidState {
                id: id.to_string(),
                status: proposal.status,
                expected: ProposalStatus::Pending,
            });
        }
        let now = self.clock.now();
        if proposal.is_expired(now) {
            return self.expire_and_fail(state, proposal);
        }
        if proposal.approvals.contains_key(signer) {
            return Err(GovernanceError::DuplicateApproval {
                signer: signer.to_string(),
                proposal_id: id.to_string(),
            });
        }

        let context = if approved { APPROVE_CONTEXT } else { REJECT_CONTEXT };
        let message = proposal.signing_message()?;
        self.gateway
            .verify_with_context(&message, signature, signer, context)?;

        proposal.record_vote(
            Approval {
                signer: signer.to_string(),
                timestamp: now,
                signature: signature.to_vec(),
                approved,
            },
            multisig.signers.len(),
        );
        self.save_proposal(&mut state, &proposal)?;
        let event = if approved { PROPOSAL_APPROVED_EVENT } else { PROPOSAL_REJECTED_EVENT };
        state.emit(
            event,
            &json!({
                "proposal_id": proposal.id,
                "signer": signer,
                "approvals": proposal.approval_count(),
                "rejections": proposal.rejection_count(),
                "status": proposal.status,
            }),
        )?;
        state.commit()?;

        info!(
            proposal_id = %proposal.id,
            signer = %signer,
            approved,
            approvals = proposal.approval_count(),
            required = proposal.required_signatures,
            status = %proposal.status,
            "Vote recorded"
        );
        Ok(proposal)
    }

    /// Commit the `expired` status, then report the expiry to the caller.
    fn expire_and_fail<T>(
        &self,
        mut state: StagedState<'_>,
        mut proposal: GovernanceProposal,
    ) -> Result<T, GovernanceError> {
        self.expire_in(&mut state, &mut proposal)?;
        state.commit()?;
        Err(GovernanceError::ProposalExpired(proposal.id))
    }

    fn expire_in(&self, state: &mut StagedState<'_>, proposal: &mut GovernanceProposal) -> Result<(), GovernanceError> {
        proposal.status = ProposalStatus::Expired;
        self.save_proposal(state, proposal)?;
        state.emit(
            PROPOSAL_EXPIRED_EVENT,
            &json!({ "proposal_id": proposal.id, "expires_at": proposal.expires_at }),
        )?;
        Ok(())
    }
}

impl GovernanceApi for GovernanceEngine {
    fn create_proposal(
        &self,
        proposal_type: ProposalType,
        proposer: &str,
        payload: ProposalPayload,
    ) -> Result<GovernanceProposal, GovernanceError> {
        let event = self.event("CREATE_PROPOSAL", proposer, proposal_type.as_str());
        let outcome = (|| -> Result<GovernanceProposal, GovernanceError> {
            let found = payload.proposal_type();
            if found != proposal_type {
                return Err(GovernanceError::PayloadMismatch {
                    expected: proposal_type,
                    found,
                });
            }
            payload.validate()?;

            let mut state = StagedState::begin(self.store.as_ref());
            let multisig = self.load_multisig(&state)?;
            if !multisig.is_signer(proposer) {
                return Err(GovernanceError::NotAuthorizedSigner(proposer.to_string()));
            }

            let proposal = GovernanceProposal::new(
                proposer,
                payload,
                self.clock.now(),
                multisig.proposal_ttl_secs,
                multisig.required_signatures,
            );
            if state.get(&keys::proposal_key(&proposal.id))?.is_some() {
                return Err(GovernanceError::DuplicateProposal(proposal.id));
            }
            self.save_proposal(&mut state, &proposal)?;
            state.emit(
                PROPOSAL_CREATED_EVENT,
                &json!({
                    "proposal_id": proposal.id,
                    "type": proposal.proposal_type,
                    "proposer": proposal.proposer,
                    "expires_at": proposal.expires_at,
                }),
            )?;
            state.commit()?;
            Ok(proposal)
        })();
        self.report(event, outcome, |p| p.id.clone())
    }

    fn approve_proposal(&self, id: &str, signer: &str, signature: &[u8]) -> Result<GovernanceProposal, GovernanceError> {
        let event = self.event("APPROVE_PROPOSAL", signer, id);
        let outcome = self.vote(id, signer, signature, true);
        self.report(event, outcome, |p| p.status.to_string())
    }

    fn reject_proposal(&self, id: &str, signer: &str, signature: &[u8]) -> Result<GovernanceProposal, GovernanceError> {
        let event = self.event("REJECT_PROPOSAL", signer, id);
        let outcome = self.vote(id, signer, signature, false);
        self.report(event, outcome, |p| p.status.to_string())
    }

    fn execute_proposal(&self, id: &str, executor: &str) -> Result<ExecutionResult, GovernanceError> {
        let event = self.event("EXECUTE_PROPOSAL", executor, id);
        let outcome = (|| -> Result<ExecutionResult, GovernanceError> {
            let mut state = StagedState::begin(self.store.as_ref());
            let mut proposal = self.load_proposal(&state, id)?;
            let now = self.clock.now();

            if !proposal.status.is_terminal() && proposal.is_expired(now) {
                return self.expire_and_fail(state, proposal);
            }
            if proposal.status != ProposalStatus::Approved {
                return Err(GovernanceError::InvalidState {
                    id: id.to_string(),
                    status: proposal.status,
                    expected: ProposalStatus::Approved,
                });
            }
            if !proposal.has_approved(executor) {
                return Err(GovernanceError::NotApprover {
                    executor: executor.to_string(),
                    proposal_id: id.to_string(),
                });
            }

            let outcome = self.apply_payload(&mut state, &proposal)?;

            proposal.status = ProposalStatus::Executed;
            proposal.executed_at = Some(now);
            proposal.executed_by = Some(executor.to_string());
            self.save_proposal(&mut state, &proposal)?;
            state.emit(
                PROPOSAL_EXECUTED_EVENT,
                &json!({
                    "proposal_id": proposal.id,
                    "type": proposal.proposal_type,
                    "executor": executor,
                    "executed_at": now,
                }),
            )?;
            state.commit()?;
            self.settle_committed(&outcome);
            Ok(ExecutionResult { proposal, outcome })
        })();
        self.report(event, outcome, |r| r.proposal.proposal_type.to_string())
    }

    fn get_proposal(&self, id: &str) -> Result<GovernanceProposal, GovernanceError> {
        self.load_proposal(&StagedState::begin(self.store.as_ref()), id)
    }

    fn list_proposals(&self, status: Option<ProposalStatus>) -> Result<Vec<GovernanceProposal>, GovernanceError> {
        let state = StagedState::begin(self.store.as_ref());
        let mut proposals: Vec<GovernanceProposal> = state
            .scan_json::<GovernanceProposal>(PROPOSAL_PREFIX)?
            .into_iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .collect();
        proposals.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(proposals)
    }

    fn sweep_expired(&self) -> Result<Vec<String>, GovernanceError> {
        let event = self.event("SWEEP_EXPIRED", "governance", "PROPOSALS");
        let outcome = (|| -> Result<Vec<String>, GovernanceError> {
            let mut state = StagedState::begin(self.store.as_ref());
            let now = self.clock.now();
            let mut expired = Vec::new();
            for mut proposal in state.scan_json::<GovernanceProposal>(PROPOSAL_PREFIX)? {
                if !proposal.status.is_terminal() && proposal.is_expired(now) {
                    self.expire_in(&mut state, &mut proposal)?;
                    expired.push(proposal.id);
                }
            }
            state.commit()?;
            Ok(expired)
        })();
        self.report(event, outcome, |ids| ids.len().to_string())
    }

    fn execute_action(&self, request: ActionRequest, actor: &str, signature: &[u8]) -> Result<ActionOutcome, GovernanceError> {
        let action = request.action();
        let event = self.event(action.as_str(), actor, &request.target());
        let outcome = (|| -> Result<ActionOutcome, GovernanceError> {
            request.validate()?;
            let mut state = StagedState::begin(self.store.as_ref());
            let policy = self.load_policy(&state)?;

            if policy.rule(action)?.requires_multisig {
                return Err(GovernanceError::MultisigRequired(action));
            }
            let held = self.gateway.roles_of(actor);
            let role = policy
                .permitted_role(action, &held)?
                .ok_or_else(|| GovernanceError::RoleNotPermitted {
                    actor: actor.to_string(),
                    action,
                })?;
            let message = direct_action_message(state.tx_id(), actor, &request)?;
            self.gateway
                .verify_role(&message, signature, actor, role, action.context())?;

            let outcome = self.apply_action(&mut state, &policy, &request, &ActionContext::direct(actor))?;
            state.commit()?;
            self.settle_committed(&outcome);
            Ok(outcome)
        })();
        self.report(event, outcome, |_| action.to_string())
    }

    fn policy(&self) -> Result<PolicyRegistry, GovernanceError> {
        self.load_policy(&StagedState::begin(self.store.as_ref()))
    }

    fn multisig_config(&self) -> Result<MultisigConfig, GovernanceError> {
        self.load_multisig(&StagedState::begin(self.store.as_ref()))
    }

    fn latest_attestation(&self) -> Result<Option<AttestationRecord>, GovernanceError> {
        Ok(StagedState::begin(self.store.as_ref()).get_json(LATEST_ATTESTATION)?)
    }

    fn get_redemption(&self, redemption_id: &str) -> Result<RedemptionRecord, GovernanceError> {
        StagedState::begin(self.store.as_ref())
            .get_json(&keys::redemption_key(redemption_id))?
            .ok_or_else(|| GovernanceError::RedemptionNotFound(redemption_id.to_string()))
    }
}
