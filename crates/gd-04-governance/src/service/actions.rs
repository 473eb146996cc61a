//! # Governance Service - Privileged Effects
//!
//! Effect code shared by the direct single-signature path and by executed
//! proposals. Amount ceilings and cooldowns are enforced here, so both
//! paths are bound by the same policy.

use serde_json::json;
use shared_types::keys::{self, LATEST_ATTESTATION, MULTISIG_CONFIG, POLICY_REGISTRY};
use shared_types::{StagedState, Timestamp};
use tracing::{debug, info, warn};

use super::GovernanceEngine;
use crate::domain::actions::{ActionOutcome, ActionRequest, FreezeTarget};
use crate::domain::errors::GovernanceError;
use crate::domain::policy::{frozen_at_key, PolicyChange, PolicyRegistry};
use crate::domain::proposal::{GovernanceProposal, ProposalPayload};
use crate::domain::records::{collateral_ratio_bps, derive_record_id, AttestationRecord, RedemptionRecord};

pub const ACCOUNT_FROZEN_EVENT: &str = "AccountFrozen";
pub const ACCOUNT_UNFROZEN_EVENT: &str = "AccountUnfrozen";
pub const UTXO_SEIZED_EVENT: &str = "UtxoSeized";
pub const STABLECOIN_REDEEMED_EVENT: &str = "StablecoinRedeemed";
pub const RESERVE_ATTESTED_EVENT: &str = "ReserveAttested";
pub const POLICY_UPDATED_EVENT: &str = "PolicyUpdated";

/// Who an effect is performed on behalf of.
pub(crate) struct ActionContext<'a> {
    /// Identity recorded on ledger transitions and records.
    pub authority: String,
    /// Subject of actor-scoped cooldowns.
    pub cooldown_actor: &'a str,
    pub proposal_id: Option<&'a str>,
}

impl<'a> ActionContext<'a> {
    pub fn direct(actor: &'a str) -> Self {
        Self {
            authority: actor.to_string(),
            cooldown_actor: actor,
            proposal_id: None,
        }
    }

    /// Authority of an executed proposal. Actor-scoped cooldowns count
    /// against the proposer.
    pub fn quorum(proposal: &'a GovernanceProposal) -> Self {
        Self {
            authority: format!("governance:{}", proposal.id),
            cooldown_actor: &proposal.proposer,
            proposal_id: Some(&proposal.id),
        }
    }
}

impl GovernanceEngine {
    /// Apply an approved proposal's payload inside `state`.
    pub(crate) fn apply_payload(
        &self,
        state: &mut StagedState<'_>,
        proposal: &GovernanceProposal,
    ) -> Result<ActionOutcome, GovernanceError> {
        let ctx = ActionContext::quorum(proposal);
        match &proposal.payload {
            ProposalPayload::PolicyUpdate { change } => self.apply_policy_change(state, change),
            ProposalPayload::MintLarge { outputs } => {
                let receipt = self.ledger.mint(state, &ctx.authority, outputs)?;
                info!(
                    proposal_id = %proposal.id,
                    amount = receipt.amount,
                    total_supply = receipt.total_supply,
                    "Large mint executed"
                );
                Ok(ActionOutcome::Minted { receipt })
            }
            payload => {
                let request = payload.as_action().ok_or_else(|| {
                    GovernanceError::InvalidPolicy(format!("{} has no action effect", payload.proposal_type()))
                })?;
                let policy = self.load_policy(state)?;
                self.apply_action(state, &policy, &request, &ctx)
            }
        }
    }

    /// Enforce ceilings and cooldowns for `request`, then apply it.
    pub(crate) fn apply_action(
        &self,
        state: &mut StagedState<'_>,
        policy: &PolicyRegistry,
        request: &ActionRequest,
        ctx: &ActionContext<'_>,
    ) -> Result<ActionOutcome, GovernanceError> {
        request.validate()?;
        let action = request.action();
        let target = request.target();
        let now = self.clock.now();

        match request {
            ActionRequest::RedeemStablecoin { amount, .. } => policy.check_amount(action, *amount)?,
            ActionRequest::SeizeUtxo { utxo_id, .. } => {
                let utxo = self.ledger.load_utxo(state, utxo_id)?;
                policy.check_amount(action, utxo.amount)?;
            }
            _ => {}
        }

        let cooldown_key = policy.cooldown_key(action, &target, ctx.cooldown_actor)?;
        if let Some(key) = &cooldown_key {
            let last = state.get_json::<Timestamp>(key)?;
            policy.check_cooldown(action, last, now)?;
        }

        let outcome = match request {
            ActionRequest::FreezeAccount { target, reason } => self.set_frozen(state, target, true, Some(reason.as_str()), ctx)?,
            ActionRequest::UnfreezeAccount { target } => self.set_frozen(state, target, false, None, ctx)?,
            ActionRequest::SeizeUtxo {
                utxo_id,
                vault_owner,
                reason,
            } => self.seize(state, utxo_id, vault_owner, reason, ctx)?,
            ActionRequest::RedeemStablecoin {
                user_id,
                amount,
                bank_reference,
            } => ActionOutcome::Redeemed {
                record: self.redeem(state, user_id, *amount, bank_reference, ctx)?,
            },
            ActionRequest::AttestReserve {
                reserve_amount,
                report_hash,
                commitment,
            } => ActionOutcome::Attested {
                record: self.attest(state, *reserve_amount, report_hash, commitment.as_deref(), ctx)?,
            },
        };

        // Unfreeze reads the freeze timestamp and must not overwrite it.
        if action.cooldown_anchor() == action {
            if let Some(key) = cooldown_key {
                state.put_json(key, &now)?;
            }
        }
        Ok(outcome)
    }

    /// Refresh commitment reads after the state holding `outcome` committed.
    pub(crate) fn settle_committed(&self, outcome: &ActionOutcome) {
        if let ActionOutcome::Attested { record } = outcome {
            if let Some(commitment) = &record.commitment {
                self.commitments.settle(commitment);
            }
        }
    }

    fn set_frozen(
        &self,
        state: &mut StagedState<'_>,
        target: &FreezeTarget,
        frozen: bool,
        reason: Option<&str>,
        ctx: &ActionContext<'_>,
    ) -> Result<ActionOutcome, GovernanceError> {
        let outcome = match target {
            FreezeTarget::Account(id) => {
                let account = self.ledger.set_account_frozen(state, id, frozen, &ctx.authority, reason)?;
                if frozen {
                    ActionOutcome::AccountFrozen { account }
                } else {
                    ActionOutcome::AccountUnfrozen { account }
                }
            }
            FreezeTarget::Utxo(id) => {
                let utxo = self.ledger.set_utxo_frozen(state, id, frozen, &ctx.authority, reason)?;
                if frozen {
                    ActionOutcome::UtxoFrozen { utxo }
                } else {
                    ActionOutcome::UtxoUnfrozen { utxo }
                }
            }
        };
        if frozen {
            // Unfreeze is timed from here regardless of the freeze rule's scope.
            state.put_json(frozen_at_key(target.id()), &self.clock.now())?;
        }
        let name = if frozen { ACCOUNT_FROZEN_EVENT } else { ACCOUNT_UNFROZEN_EVENT };
        state.emit(
            name,
            &json!({
                "target": target,
                "reason": reason,
                "authority": ctx.authority,
                "proposal_id": ctx.proposal_id,
            }),
        )?;
        info!(subject = %target, frozen, authority = %ctx.authority, "Freeze state changed");
        Ok(outcome)
    }

    fn seize(
        &self,
        state: &mut StagedState<'_>,
        utxo_id: &str,
        vault_owner: &str,
        reason: &str,
        ctx: &ActionContext<'_>,
    ) -> Result<ActionOutcome, GovernanceError> {
        let seizure = self.ledger.seize(state, utxo_id, vault_owner, &ctx.authority, reason)?;
        let amount = seizure.seized.amount;
        state.emit(
            UTXO_SEIZED_EVENT,
            &json!({
                "seized_utxo": seizure.seized.id,
                "vault_utxo": seizure.vault.id,
                "vault_owner": vault_owner,
                "amount": amount,
                "reason": reason,
                "authority": ctx.authority,
            }),
        )?;
        warn!(
            utxo_id = %utxo_id,
            vault_owner = %vault_owner,
            amount,
            authority = %ctx.authority,
            "UTXO seized"
        );
        Ok(ActionOutcome::Seized {
            seized_utxo: seizure.seized.id,
            vault_utxo: seizure.vault.id,
            amount,
        })
    }

    fn redeem(
        &self,
        state: &mut StagedState<'_>,
        user_id: &str,
        amount: u64,
        bank_reference: &str,
        ctx: &ActionContext<'_>,
    ) -> Result<RedemptionRecord, GovernanceError> {
        let tx_id = state.tx_id().to_string();
        let redemption_id = derive_record_id(&[user_id, bank_reference, &tx_id]);
        let receipt = self
            .ledger
            .redeem(state, user_id, amount, &ctx.authority, &redemption_id)?;

        let record = RedemptionRecord {
            redemption_id,
            user_id: user_id.to_string(),
            amount,
            bank_reference: bank_reference.to_string(),
            authorized_by: ctx.authority.clone(),
            consumed_utxos: receipt.spent,
            change_utxo: receipt.created.into_iter().next(),
            proposal_id: ctx.proposal_id.map(str::to_string),
            timestamp: self.clock.now(),
            tx_id,
        };
        state.put_json(keys::redemption_key(&record.redemption_id), &record)?;
        state.emit(STABLECOIN_REDEEMED_EVENT, &record)?;
        info!(
            redemption_id = %record.redemption_id,
            user_id = %user_id,
            amount,
            total_supply = receipt.total_supply,
            "Stablecoin redeemed"
        );
        Ok(record)
    }

    fn attest(
        &self,
        state: &mut StagedState<'_>,
        reserve_amount: u64,
        report_hash: &str,
        commitment: Option<&str>,
        ctx: &ActionContext<'_>,
    ) -> Result<AttestationRecord, GovernanceError> {
        if let Some(commitment) = commitment {
            let consumed = self.commitments.consume(state, commitment)?;
            debug!(commitment = %consumed.commitment, "Attestation consumed commitment");
        }

        let total_supply = self.ledger.total_supply(state)?;
        let tx_id = state.tx_id().to_string();
        let record = AttestationRecord {
            attestation_id: derive_record_id(&[&ctx.authority, report_hash, &tx_id]),
            auditor: ctx.authority.clone(),
            reserve_amount,
            total_supply,
            collateral_ratio_bps: collateral_ratio_bps(reserve_amount, total_supply),
            report_hash: report_hash.to_string(),
            commitment: commitment.map(str::to_string),
            timestamp: self.clock.now(),
            tx_id,
        };
        state.put_json(keys::attestation_key(&record.attestation_id), &record)?;
        state.put_json(LATEST_ATTESTATION, &record)?;
        state.emit(RESERVE_ATTESTED_EVENT, &record)?;

        if record.is_fully_collateralized() {
            info!(
                attestation_id = %record.attestation_id,
                reserve = reserve_amount,
                total_supply,
                "Reserve attested"
            );
        } else {
            warn!(
                attestation_id = %record.attestation_id,
                reserve = reserve_amount,
                total_supply,
                ratio_bps = ?record.collateral_ratio_bps,
                "Reserve below outstanding supply"
            );
        }
        Ok(record)
    }

    pub(crate) fn apply_policy_change(
        &self,
        state: &mut StagedState<'_>,
        change: &PolicyChange,
    ) -> Result<ActionOutcome, GovernanceError> {
        change.validate()?;
        match change {
            PolicyChange::SetRule { action, rule } => {
                let mut policy = self.load_policy(state)?;
                policy.set_rule(*action, rule.clone())?;
                state.put_json(POLICY_REGISTRY, &policy)?;
            }
            PolicyChange::SetMultisig { config } => state.put_json(MULTISIG_CONFIG, config)?,
            PolicyChange::SetHalt { halted } => self.ledger.set_halted(state, *halted)?,
        }
        state.emit(POLICY_UPDATED_EVENT, change)?;
        info!(change = ?change, "Policy updated");
        Ok(ActionOutcome::PolicyUpdated { change: change.clone() })
    }
}
