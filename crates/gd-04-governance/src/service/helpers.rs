//! # Governance Service - Helper Methods
//!
//! Store access for proposals and configuration, plus audit reporting.

use shared_types::keys::{self, MULTISIG_CONFIG, POLICY_REGISTRY};
use shared_types::{AuditEvent, AuditEventType, Categorized, ErrorCategory, StagedState};
use tracing::{error, info, warn};

use super::GovernanceEngine;
use crate::domain::errors::GovernanceError;
use crate::domain::multisig::MultisigConfig;
use crate::domain::policy::PolicyRegistry;
use crate::domain::proposal::GovernanceProposal;

impl GovernanceEngine {
    /// Persisted policy table, or the engine default before initialisation.
    pub(crate) fn load_policy(&self, state: &StagedState<'_>) -> Result<PolicyRegistry, GovernanceError> {
        Ok(state
            .get_json(POLICY_REGISTRY)?
            .unwrap_or_else(|| self.default_policy.clone()))
    }

    pub(crate) fn load_multisig(&self, state: &StagedState<'_>) -> Result<MultisigConfig, GovernanceError> {
        Ok(state
            .get_json(MULTISIG_CONFIG)?
            .unwrap_or_else(|| self.default_multisig.clone()))
    }

    pub(crate) fn load_proposal(&self, state: &StagedState<'_>, id: &str) -> Result<GovernanceProposal, GovernanceError> {
        state
            .get_json(&keys::proposal_key(id))?
            .ok_or_else(|| GovernanceError::ProposalNotFound(id.to_string()))
    }

    pub(crate) fn save_proposal(
        &self,
        state: &mut StagedState<'_>,
        proposal: &GovernanceProposal,
    ) -> Result<(), GovernanceError> {
        state.put_json(keys::proposal_key(&proposal.id), proposal)?;
        Ok(())
    }

    pub(crate) fn event(&self, action: &str, actor: &str, target: &str) -> AuditEvent {
        AuditEvent::new(
            AuditEventType::Governance,
            action,
            actor,
            target,
            self.clock.now(),
            self.store.tx_id(),
        )
    }

    /// Log the outcome and hand exactly one audit event to the sink.
    pub(crate) fn report<T>(
        &self,
        event: AuditEvent,
        outcome: Result<T, GovernanceError>,
        detail: impl FnOnce(&T) -> String,
    ) -> Result<T, GovernanceError> {
        let event = match &outcome {
            Ok(value) => event.param("detail", detail(value)),
            Err(_) => event,
        }
        .with_outcome(&outcome);

        match &outcome {
            Ok(_) => info!(
                tx_id = %event.tx_id,
                action = %event.action,
                actor = %event.actor,
                subject = %event.target,
                "Governance operation committed"
            ),
            Err(e) if e.category() == ErrorCategory::Integrity => error!(
                tx_id = %event.tx_id,
                action = %event.action,
                actor = %event.actor,
                subject = %event.target,
                error = %e,
                "Governance integrity violation"
            ),
            Err(e) => warn!(
                tx_id = %event.tx_id,
                action = %event.action,
                actor = %event.actor,
                subject = %event.target,
                category = ?e.category(),
                error = %e,
                "Governance operation rejected"
            ),
        }
        self.audit.log_event(event);
        outcome
    }
}
