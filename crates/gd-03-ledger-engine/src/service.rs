//! # Ledger Engine Service
//!
//! UTXO state machine over the host store. Each public operation runs in
//! one [`StagedState`]: every check completes before the single commit, so
//! a rejected call leaves the store untouched.
//!
//! The `*_in` methods expose the same mutations inside a caller-owned
//! staged state. Governance uses them so that a proposal's effect and its
//! status change commit together.

use std::collections::HashSet;
use std::sync::Arc;

use shared_types::{
    AuditEvent, AuditEventType, AuditSink, Categorized, ErrorCategory, Role, SignatureGateway,
    StagedState, StateStore, TimeSource, Timestamp,
};
use tracing::{error, info, warn};

use crate::domain::config::LedgerConfig;
use crate::domain::entities::{
    AccountRecord, LedgerOperation, LedgerReceipt, OutputSpec, Utxo, UtxoMetadata, UtxoOrigin,
    UtxoStatus,
};
use crate::domain::errors::LedgerError;
use crate::domain::invariants::{
    apply_supply_delta, check_conservation, checked_sum, SupplyAudit, SupplyDelta,
};
use crate::domain::kyc::{day_of, effective_tier};
use crate::domain::messages::{self, LedgerAction};
use crate::domain::utxo_set::{self, ensure_not_frozen, ensure_not_halted};
use crate::ports::inbound::LedgerApi;

pub const MINT_EVENT: &str = "Mint";
pub const TRANSFER_EVENT: &str = "Transfer";
pub const BURN_EVENT: &str = "Burn";

/// Outcome of a governance seizure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seizure {
    pub seized: Utxo,
    pub vault: Utxo,
}

pub struct LedgerEngine {
    store: Arc<dyn StateStore>,
    gateway: Arc<dyn SignatureGateway>,
    clock: Arc<dyn TimeSource>,
    audit: Arc<dyn AuditSink>,
    config: LedgerConfig,
}

impl LedgerEngine {
    pub fn new(
        store: Arc<dyn StateStore>,
        gateway: Arc<dyn SignatureGateway>,
        clock: Arc<dyn TimeSource>,
        audit: Arc<dyn AuditSink>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            store,
            gateway,
            clock,
            audit,
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    fn validate_outputs(&self, outputs: &[OutputSpec]) -> Result<u64, LedgerError> {
        if outputs.is_empty() {
            return Err(LedgerError::EmptyOutputs);
        }
        if outputs.len() > self.config.max_outputs {
            return Err(LedgerError::TooMany {
                what: "outputs",
                count: outputs.len(),
                max: self.config.max_outputs,
            });
        }
        for (index, spec) in outputs.iter().enumerate() {
            if spec.owner.trim().is_empty() {
                return Err(LedgerError::MissingOwner { index });
            }
            if spec.amount == 0 {
                return Err(LedgerError::ZeroAmount { index });
            }
        }
        checked_sum(outputs.iter().map(|o| o.amount))
    }

    fn validate_inputs(&self, inputs: &[String]) -> Result<(), LedgerError> {
        if inputs.is_empty() {
            return Err(LedgerError::EmptyInputs);
        }
        if inputs.len() > self.config.max_inputs {
            return Err(LedgerError::TooMany {
                what: "inputs",
                count: inputs.len(),
                max: self.config.max_inputs,
            });
        }
        let mut seen = HashSet::with_capacity(inputs.len());
        for id in inputs {
            if !seen.insert(id.as_str()) {
                return Err(LedgerError::DuplicateInput(id.clone()));
            }
        }
        Ok(())
    }

    fn validate_amount(amount: u64) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount { index: 0 });
        }
        Ok(())
    }

    // =========================================================================
    // STAGED BUILDING BLOCKS
    // =========================================================================

    /// Create one active output per spec with ids `{tx_id}:{index}`.
    fn create_outputs(
        &self,
        state: &mut StagedState<'_>,
        outputs: &[OutputSpec],
        origin: &UtxoOrigin,
        now: Timestamp,
    ) -> Result<Vec<Utxo>, LedgerError> {
        let mut created = Vec::with_capacity(outputs.len());
        for (index, spec) in outputs.iter().enumerate() {
            ensure_not_frozen(state, &spec.owner)?;
            let utxo = Utxo {
                id: shared_types::keys::utxo_id(state.tx_id(), index),
                owner: spec.owner.clone(),
                asset_code: self.config.asset_code.clone(),
                amount: spec.amount,
                status: UtxoStatus::Active,
                kyc_tag: spec.kyc_tag.clone(),
                created_at: now,
                metadata: UtxoMetadata {
                    origin: origin.clone(),
                    memo: spec.memo.clone(),
                    extension: spec.extension.clone(),
                    last_transition: None,
                },
            };
            utxo_set::insert_utxo(state, &utxo)?;
            created.push(utxo);
        }
        Ok(created)
    }

    /// Mark loaded inputs spent.
    fn consume(
        &self,
        state: &mut StagedState<'_>,
        inputs: Vec<Utxo>,
        actor: &str,
        reason: Option<&str>,
        now: Timestamp,
    ) -> Result<Vec<String>, LedgerError> {
        let tx_id = state.tx_id().to_string();
        let mut ids = Vec::with_capacity(inputs.len());
        for mut utxo in inputs {
            utxo.transition(UtxoStatus::Spent, actor, reason, now, &tx_id)?;
            utxo_set::save_utxo(state, &utxo)?;
            ids.push(utxo.id);
        }
        Ok(ids)
    }

    fn load_inputs(&self, state: &StagedState<'_>, inputs: &[String], owner: &str) -> Result<Vec<Utxo>, LedgerError> {
        inputs
            .iter()
            .map(|id| utxo_set::load_spendable(state, id, owner))
            .collect()
    }

    /// Charge the sender's KYC daily allowance for value leaving them.
    fn enforce_kyc(
        &self,
        state: &mut StagedState<'_>,
        sender: &str,
        spent: &[Utxo],
        outputs: &[OutputSpec],
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let Some(tier) = effective_tier(spent.iter().map(|u| u.kyc_tag.as_deref())) else {
            return Ok(());
        };
        let Some(limit) = tier.daily_limit() else {
            return Ok(());
        };
        let outflow = checked_sum(outputs.iter().filter(|o| o.owner != sender).map(|o| o.amount))?;
        if outflow == 0 {
            return Ok(());
        }
        let day = day_of(now);
        let used = utxo_set::kyc_usage(state, sender, day)?;
        let total = used.checked_add(outflow).ok_or(LedgerError::AmountOverflow)?;
        if total > limit {
            return Err(LedgerError::KycLimitExceeded {
                owner: sender.to_string(),
                tier,
                limit,
                used,
                requested: outflow,
            });
        }
        utxo_set::set_kyc_usage(state, sender, day, total)
    }

    fn transfer_in(
        &self,
        state: &mut StagedState<'_>,
        sender: &str,
        inputs: &[String],
        outputs: &[OutputSpec],
    ) -> Result<LedgerReceipt, LedgerError> {
        ensure_not_halted(state)?;
        ensure_not_frozen(state, sender)?;

        let spent = self.load_inputs(state, inputs, sender)?;
        let input_sum = checked_sum(spent.iter().map(|u| u.amount))?;
        let output_sum = checked_sum(outputs.iter().map(|o| o.amount))?;
        check_conservation(input_sum, output_sum)?;

        let now = self.clock.now();
        self.enforce_kyc(state, sender, &spent, outputs, now)?;

        let spent_ids = self.consume(state, spent, sender, None, now)?;
        let origin = UtxoOrigin::Transfer {
            sender: sender.to_string(),
        };
        let created = self.create_outputs(state, outputs, &origin, now)?;

        let receipt = LedgerReceipt {
            tx_id: state.tx_id().to_string(),
            operation: LedgerOperation::Transfer,
            created: created.into_iter().map(|u| u.id).collect(),
            spent: spent_ids,
            amount: output_sum,
            total_supply: utxo_set::read_supply(state)?,
        };
        state.emit(TRANSFER_EVENT, &receipt)?;
        Ok(receipt)
    }

    /// Spend `selected`, return anything above `amount` to `owner`, and
    /// shrink supply by `amount`.
    fn burn_selected(
        &self,
        state: &mut StagedState<'_>,
        owner: &str,
        actor: &str,
        selected: Vec<Utxo>,
        amount: u64,
        change_origin: UtxoOrigin,
    ) -> Result<LedgerReceipt, LedgerError> {
        let total = checked_sum(selected.iter().map(|u| u.amount))?;
        let change = total.checked_sub(amount).ok_or(LedgerError::InsufficientFunds {
            owner: owner.to_string(),
            available: total,
            requested: amount,
        })?;
        let change_tag = effective_tier(selected.iter().map(|u| u.kyc_tag.as_deref())).map(|t| t.to_string());
        let now = self.clock.now();

        let supply = apply_supply_delta(utxo_set::read_supply(state)?, SupplyDelta::Decrease(amount))?;
        let spent = self.consume(state, selected, actor, None, now)?;
        let created = if change > 0 {
            let spec = OutputSpec {
                owner: owner.to_string(),
                amount: change,
                kyc_tag: change_tag,
                memo: None,
                extension: None,
            };
            self.create_outputs(state, &[spec], &change_origin, now)?
        } else {
            Vec::new()
        };
        utxo_set::write_supply(state, supply)?;

        let receipt = LedgerReceipt {
            tx_id: state.tx_id().to_string(),
            operation: LedgerOperation::Burn,
            created: created.into_iter().map(|u| u.id).collect(),
            spent,
            amount,
            total_supply: supply,
        };
        state.emit(BURN_EVENT, &receipt)?;
        Ok(receipt)
    }

    // =========================================================================
    // GOVERNANCE EFFECTS
    // =========================================================================

    /// Mint without signature checks or the direct threshold.
    pub fn mint_in(
        &self,
        state: &mut StagedState<'_>,
        issuer: &str,
        outputs: &[OutputSpec],
    ) -> Result<LedgerReceipt, LedgerError> {
        let total = self.validate_outputs(outputs)?;
        ensure_not_halted(state)?;

        let supply = apply_supply_delta(utxo_set::read_supply(state)?, SupplyDelta::Increase(total))?;
        let origin = UtxoOrigin::Mint {
            issuer: issuer.to_string(),
        };
        let created = self.create_outputs(state, outputs, &origin, self.clock.now())?;
        utxo_set::write_supply(state, supply)?;

        let receipt = LedgerReceipt {
            tx_id: state.tx_id().to_string(),
            operation: LedgerOperation::Mint,
            created: created.into_iter().map(|u| u.id).collect(),
            spent: Vec::new(),
            amount: total,
            total_supply: supply,
        };
        state.emit(MINT_EVENT, &receipt)?;
        Ok(receipt)
    }

    pub fn set_utxo_frozen_in(
        &self,
        state: &mut StagedState<'_>,
        utxo_id: &str,
        frozen: bool,
        by: &str,
        reason: Option<&str>,
    ) -> Result<Utxo, LedgerError> {
        let mut utxo = utxo_set::load_utxo(state, utxo_id)?;
        let next = if frozen { UtxoStatus::Frozen } else { UtxoStatus::Active };
        let tx_id = state.tx_id().to_string();
        utxo.transition(next, by, reason, self.clock.now(), &tx_id)?;
        utxo_set::save_utxo(state, &utxo)?;
        Ok(utxo)
    }

    pub fn set_account_frozen_in(
        &self,
        state: &mut StagedState<'_>,
        account_id: &str,
        frozen: bool,
        by: &str,
        reason: Option<&str>,
    ) -> Result<AccountRecord, LedgerError> {
        let mut account = utxo_set::load_account(state, account_id)?;
        let now = self.clock.now();
        match (frozen, account.frozen) {
            (true, true) => return Err(LedgerError::AccountFrozen(account_id.to_string())),
            (false, false) => return Err(LedgerError::AccountNotFrozen(account_id.to_string())),
            (true, false) => {
                account.frozen = true;
                account.freeze_reason = reason.map(str::to_string);
                account.frozen_at = Some(now);
                account.frozen_by = Some(by.to_string());
            }
            (false, true) => {
                account.frozen = false;
                account.unfrozen_at = Some(now);
                account.unfrozen_by = Some(by.to_string());
            }
        }
        utxo_set::save_account(state, &account)?;
        Ok(account)
    }

    /// Move an active output to a new vault-owned output. Supply is unchanged.
    pub fn seize_in(
        &self,
        state: &mut StagedState<'_>,
        utxo_id: &str,
        vault_owner: &str,
        authority: &str,
        reason: &str,
    ) -> Result<Seizure, LedgerError> {
        let mut seized = utxo_set::load_utxo(state, utxo_id)?;
        if seized.status != UtxoStatus::Active {
            return Err(LedgerError::NotActive {
                utxo_id: seized.id,
                status: seized.status,
            });
        }
        let now = self.clock.now();
        let tx_id = state.tx_id().to_string();
        seized.transition(UtxoStatus::Seized, authority, Some(reason), now, &tx_id)?;
        utxo_set::save_utxo(state, &seized)?;

        let spec = OutputSpec {
            owner: vault_owner.to_string(),
            amount: seized.amount,
            kyc_tag: None,
            memo: None,
            extension: None,
        };
        let origin = UtxoOrigin::Seizure {
            source_utxo: seized.id.clone(),
            authority: authority.to_string(),
            reason: reason.to_string(),
        };
        let mut created = self.create_outputs(state, &[spec], &origin, now)?;
        let vault = created.pop().ok_or_else(|| {
            LedgerError::InvariantViolation(format!("seizure of {utxo_id} produced no vault output"))
        })?;
        Ok(Seizure { seized, vault })
    }

    /// Retire `amount` of `owner`'s balance for an off-ledger payout.
    pub fn redeem_in(
        &self,
        state: &mut StagedState<'_>,
        owner: &str,
        amount: u64,
        authority: &str,
        redemption_id: &str,
    ) -> Result<LedgerReceipt, LedgerError> {
        Self::validate_amount(amount)?;
        let candidates = utxo_set::active_utxos_of(state, owner)?;
        let (selected, _) = utxo_set::select_inputs(owner, candidates, amount)?;
        let origin = UtxoOrigin::RedemptionChange {
            redemption_id: redemption_id.to_string(),
        };
        self.burn_selected(state, owner, authority, selected, amount, origin)
    }

    pub fn set_halted_in(&self, state: &mut StagedState<'_>, halted: bool) -> Result<(), LedgerError> {
        utxo_set::set_halted(state, halted)
    }

    pub fn is_halted(&self) -> Result<bool, LedgerError> {
        utxo_set::is_halted(&StagedState::begin(self.store.as_ref()))
    }

    // =========================================================================
    // REPORTING
    // =========================================================================

    fn finish(
        &self,
        event: AuditEvent,
        outcome: Result<LedgerReceipt, LedgerError>,
    ) -> Result<LedgerReceipt, LedgerError> {
        let event = match &outcome {
            Ok(receipt) => event
                .param("amount", receipt.amount)
                .param("total_supply", receipt.total_supply)
                .param("created", receipt.created.len()),
            Err(_) => event,
        }
        .with_outcome(&outcome);

        match &outcome {
            Ok(receipt) => info!(
                tx_id = %receipt.tx_id,
                action = %event.action,
                actor = %event.actor,
                amount = receipt.amount,
                total_supply = receipt.total_supply,
                "Ledger operation committed"
            ),
            Err(e) if e.category() == ErrorCategory::Integrity => error!(
                tx_id = %event.tx_id,
                action = %event.action,
                actor = %event.actor,
                error = %e,
                "Ledger integrity violation"
            ),
            Err(e) => warn!(
                tx_id = %event.tx_id,
                action = %event.action,
                actor = %event.actor,
                error = %e,
                "Ledger operation rejected"
            ),
        }
        self.audit.log_event(event);
        outcome
    }

    fn event(&self, event_type: AuditEventType, action: LedgerAction, actor: &str, target: &str) -> AuditEvent {
        AuditEvent::new(event_type, action.tag(), actor, target, self.clock.now(), self.store.tx_id())
    }

    fn read<T>(&self, f: impl FnOnce(&StagedState<'_>) -> Result<T, LedgerError>) -> Result<T, LedgerError> {
        f(&StagedState::begin(self.store.as_ref()))
    }
}

fn owners(outputs: &[OutputSpec]) -> String {
    outputs.iter().map(|o| o.owner.as_str()).collect::<Vec<_>>().join(",")
}

impl LedgerApi for LedgerEngine {
    fn mint(&self, outputs: &[OutputSpec], issuer: &str, signature: &[u8]) -> Result<LedgerReceipt, LedgerError> {
        let event = self.event(AuditEventType::Mint, LedgerAction::Mint, issuer, &owners(outputs));
        let outcome = (|| -> Result<LedgerReceipt, LedgerError> {
            let total = self.validate_outputs(outputs)?;
            let mut state = StagedState::begin(self.store.as_ref());
            let message = messages::mint_message(state.tx_id(), issuer, outputs)?;
            self.gateway
                .verify_role(&message, signature, issuer, Role::Issuer, LedgerAction::Mint.context())?;
            if total > self.config.large_mint_threshold {
                return Err(LedgerError::LimitExceeded {
                    what: "direct mint",
                    amount: total,
                    ceiling: self.config.large_mint_threshold,
                });
            }
            let receipt = self.mint_in(&mut state, issuer, outputs)?;
            state.commit()?;
            Ok(receipt)
        })();
        self.finish(event, outcome)
    }

    fn transfer(
        &self,
        inputs: &[String],
        outputs: &[OutputSpec],
        sender: &str,
        signature: &[u8],
    ) -> Result<LedgerReceipt, LedgerError> {
        let event = self.event(AuditEventType::Transfer, LedgerAction::Transfer, sender, &owners(outputs));
        let outcome = (|| -> Result<LedgerReceipt, LedgerError> {
            self.validate_inputs(inputs)?;
            self.validate_outputs(outputs)?;
            let mut state = StagedState::begin(self.store.as_ref());
            let message = messages::transfer_message(state.tx_id(), sender, inputs, outputs)?;
            self.gateway
                .verify_with_context(&message, signature, sender, LedgerAction::Transfer.context())?;
            let receipt = self.transfer_in(&mut state, sender, inputs, outputs)?;
            state.commit()?;
            Ok(receipt)
        })();
        self.finish(event, outcome)
    }

    fn burn(&self, inputs: &[String], owner: &str, signature: &[u8]) -> Result<LedgerReceipt, LedgerError> {
        let event = self.event(AuditEventType::Burn, LedgerAction::Burn, owner, owner);
        let outcome = (|| -> Result<LedgerReceipt, LedgerError> {
            self.validate_inputs(inputs)?;
            let mut state = StagedState::begin(self.store.as_ref());
            let message = messages::burn_message(state.tx_id(), owner, inputs)?;
            self.gateway
                .verify_with_context(&message, signature, owner, LedgerAction::Burn.context())?;
            ensure_not_halted(&state)?;
            ensure_not_frozen(&state, owner)?;
            let selected = self.load_inputs(&state, inputs, owner)?;
            let amount = checked_sum(selected.iter().map(|u| u.amount))?;
            let origin = UtxoOrigin::Transfer {
                sender: owner.to_string(),
            };
            let receipt = self.burn_selected(&mut state, owner, owner, selected, amount, origin)?;
            state.commit()?;
            Ok(receipt)
        })();
        self.finish(event, outcome)
    }

    fn simple_transfer(
        &self,
        sender: &str,
        recipient: &str,
        amount: u64,
        signature: &[u8],
    ) -> Result<LedgerReceipt, LedgerError> {
        let event = self
            .event(AuditEventType::Transfer, LedgerAction::SimpleTransfer, sender, recipient)
            .param("requested", amount);
        let outcome = (|| -> Result<LedgerReceipt, LedgerError> {
            Self::validate_amount(amount)?;
            if recipient.trim().is_empty() {
                return Err(LedgerError::MissingOwner { index: 0 });
            }
            let mut state = StagedState::begin(self.store.as_ref());
            let message = messages::simple_transfer_message(state.tx_id(), sender, recipient, amount)?;
            self.gateway
                .verify_with_context(&message, signature, sender, LedgerAction::SimpleTransfer.context())?;

            let candidates = utxo_set::active_utxos_of(&state, sender)?;
            let (selected, total) = utxo_set::select_inputs(sender, candidates, amount)?;
            let change_tag =
                effective_tier(selected.iter().map(|u| u.kyc_tag.as_deref())).map(|t| t.to_string());
            let inputs: Vec<String> = selected.into_iter().map(|u| u.id).collect();

            let mut outputs = vec![OutputSpec::new(recipient, amount)];
            if total > amount {
                let mut change = OutputSpec::new(sender, total - amount);
                change.kyc_tag = change_tag;
                outputs.push(change);
            }
            let receipt = self.transfer_in(&mut state, sender, &inputs, &outputs)?;
            state.commit()?;
            Ok(receipt)
        })();
        self.finish(event, outcome)
    }

    fn simple_burn(&self, owner: &str, amount: u64, signature: &[u8]) -> Result<LedgerReceipt, LedgerError> {
        let event = self.event(AuditEventType::Burn, LedgerAction::SimpleBurn, owner, owner);
        let outcome = (|| -> Result<LedgerReceipt, LedgerError> {
            Self::validate_amount(amount)?;
            let mut state = StagedState::begin(self.store.as_ref());
            let message = messages::simple_burn_message(state.tx_id(), owner, amount)?;
            self.gateway
                .verify_with_context(&message, signature, owner, LedgerAction::SimpleBurn.context())?;
            ensure_not_halted(&state)?;
            ensure_not_frozen(&state, owner)?;

            let candidates = utxo_set::active_utxos_of(&state, owner)?;
            let (selected, _) = utxo_set::select_inputs(owner, candidates, amount)?;
            let origin = UtxoOrigin::Transfer {
                sender: owner.to_string(),
            };
            let receipt = self.burn_selected(&mut state, owner, owner, selected, amount, origin)?;
            state.commit()?;
            Ok(receipt)
        })();
        self.finish(event, outcome)
    }

    fn get_balance(&self, owner: &str) -> Result<u64, LedgerError> {
        self.read(|state| utxo_set::balance_of(state, owner))
    }

    fn get_utxo(&self, id: &str) -> Result<Utxo, LedgerError> {
        self.read(|state| utxo_set::load_utxo(state, id))
    }

    fn list_utxos(&self, owner: &str) -> Result<Vec<Utxo>, LedgerError> {
        self.read(|state| {
            Ok(utxo_set::scan_utxos(state)?
                .into_iter()
                .filter(|u| u.owner == owner)
                .collect())
        })
    }

    fn get_total_supply(&self) -> Result<u64, LedgerError> {
        self.read(utxo_set::read_supply)
    }

    fn get_account(&self, account_id: &str) -> Result<AccountRecord, LedgerError> {
        self.read(|state| utxo_set::load_account(state, account_id))
    }

    fn audit_supply(&self) -> Result<SupplyAudit, LedgerError> {
        let outcome = self.read(|state| {
            let utxos = utxo_set::scan_utxos(state)?;
            SupplyAudit::compute(utxo_set::read_supply(state)?, &utxos)
        });
        let event = AuditEvent::new(
            AuditEventType::InvariantCheck,
            "AUDIT_SUPPLY",
            "ledger",
            "TOTAL_SUPPLY",
            self.clock.now(),
            self.store.tx_id(),
        );
        let event = match &outcome {
            Ok(audit) if !audit.consistent => {
                error!(
                    recorded = audit.recorded_supply,
                    outstanding = audit.outstanding(),
                    "Total supply does not match outstanding outputs"
                );
                let violation = LedgerError::InvariantViolation(format!(
                    "recorded supply {} != outstanding {}",
                    audit.recorded_supply,
                    audit.outstanding()
                ));
                event.failed(&violation)
            }
            Ok(audit) => event
                .param("recorded", audit.recorded_supply)
                .param("utxos", audit.utxo_count),
            Err(e) => event.failed(e),
        };
        self.audit.log_event(event);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use shared_types::test_utils::{digest_sign, DigestGateway};
    use shared_types::{AuditResult, InMemoryStateStore, ManualTimeSource, RecordingAuditSink};

    use super::*;
    use crate::domain::kyc::KycTier;

    const DAY0: u64 = 1_700_000_000;

    struct Harness {
        store: Arc<InMemoryStateStore>,
        clock: Arc<ManualTimeSource>,
        audit: Arc<RecordingAuditSink>,
        ledger: LedgerEngine,
    }

    fn harness_with(config: LedgerConfig) -> Harness {
        let store = Arc::new(InMemoryStateStore::new());
        let clock = Arc::new(ManualTimeSource::new(DAY0));
        let audit = Arc::new(RecordingAuditSink::new());
        let gateway = DigestGateway::new()
            .with_identity("central_bank", &[Role::Issuer])
            .with_identity("user1", &[])
            .with_identity("user2", &[]);
        let ledger = LedgerEngine::new(
            store.clone(),
            Arc::new(gateway),
            clock.clone(),
            audit.clone(),
            config,
        );
        Harness {
            store,
            clock,
            audit,
            ledger,
        }
    }

    fn harness() -> Harness {
        harness_with(LedgerConfig::default())
    }

    impl Harness {
        fn mint(&self, tx: &str, outputs: &[OutputSpec]) -> Result<LedgerReceipt, LedgerError> {
            self.store.set_tx_id(tx);
            let msg = messages::mint_message(tx, "central_bank", outputs).unwrap();
            let sig = digest_sign("central_bank", &msg, LedgerAction::Mint.context());
            self.ledger.mint(outputs, "central_bank", &sig)
        }

        fn transfer(
            &self,
            tx: &str,
            sender: &str,
            inputs: &[&str],
            outputs: &[OutputSpec],
        ) -> Result<LedgerReceipt, LedgerError> {
            self.store.set_tx_id(tx);
            let inputs: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
            let msg = messages::transfer_message(tx, sender, &inputs, outputs).unwrap();
            let sig = digest_sign(sender, &msg, LedgerAction::Transfer.context());
            self.ledger.transfer(&inputs, outputs, sender, &sig)
        }

        fn burn(&self, tx: &str, owner: &str, inputs: &[&str]) -> Result<LedgerReceipt, LedgerError> {
            self.store.set_tx_id(tx);
            let inputs: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
            let msg = messages::burn_message(tx, owner, &inputs).unwrap();
            let sig = digest_sign(owner, &msg, LedgerAction::Burn.context());
            self.ledger.burn(&inputs, owner, &sig)
        }

        fn simple_transfer(&self, tx: &str, sender: &str, to: &str, amount: u64) -> Result<LedgerReceipt, LedgerError> {
            self.store.set_tx_id(tx);
            let msg = messages::simple_transfer_message(tx, sender, to, amount).unwrap();
            let sig = digest_sign(sender, &msg, LedgerAction::SimpleTransfer.context());
            self.ledger.simple_transfer(sender, to, amount, &sig)
        }

        fn balance(&self, owner: &str) -> u64 {
            self.ledger.get_balance(owner).unwrap()
        }

        fn supply(&self) -> u64 {
            self.ledger.get_total_supply().unwrap()
        }
    }

    // =========================================================================
    // Mint
    // =========================================================================

    /// Test: Mint creates deterministic ids and grows supply
    #[test]
    fn test_mint_creates_outputs_and_supply() {
        let h = harness();
        let receipt = h
            .mint("tx-1", &[OutputSpec::new("central_bank", 600), OutputSpec::new("user1", 400)])
            .unwrap();

        assert_eq!(receipt.created, vec!["tx-1:0", "tx-1:1"]);
        assert_eq!(receipt.total_supply, 1000);
        assert_eq!(h.supply(), 1000);
        assert_eq!(h.balance("user1"), 400);

        let utxo = h.ledger.get_utxo("tx-1:0").unwrap();
        assert_eq!(utxo.asset_code, "GENUSD");
        assert_eq!(utxo.created_at, DAY0);
        assert_eq!(
            utxo.metadata.origin,
            UtxoOrigin::Mint {
                issuer: "central_bank".into()
            }
        );
        assert_eq!(h.store.events().last().unwrap().name, MINT_EVENT);
    }

    #[test]
    fn test_mint_requires_issuer_role() {
        let h = harness();
        h.store.set_tx_id("tx-1");
        let outputs = [OutputSpec::new("user1", 10)];
        let msg = messages::mint_message("tx-1", "user1", &outputs).unwrap();
        let sig = digest_sign("user1", &msg, LedgerAction::Mint.context());
        let err = h.ledger.mint(&outputs, "user1", &sig).unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Authorization);
        assert_eq!(h.supply(), 0);
        assert_eq!(h.audit.last().unwrap().result, AuditResult::Failure);
    }

    /// Test: A signature over one transaction id does not authorise another
    #[test]
    fn test_mint_signature_bound_to_tx() {
        let h = harness();
        let outputs = [OutputSpec::new("user1", 10)];
        let msg = messages::mint_message("tx-1", "central_bank", &outputs).unwrap();
        let sig = digest_sign("central_bank", &msg, LedgerAction::Mint.context());
        h.store.set_tx_id("tx-2");
        let err = h.ledger.mint(&outputs, "central_bank", &sig).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Signature);
    }

    #[test]
    fn test_mint_validation() {
        let h = harness();
        assert_eq!(h.mint("tx-1", &[]), Err(LedgerError::EmptyOutputs));
        assert_eq!(
            h.mint("tx-1", &[OutputSpec::new("a", 5), OutputSpec::new("b", 0)]),
            Err(LedgerError::ZeroAmount { index: 1 })
        );
        assert_eq!(
            h.mint("tx-1", &[OutputSpec::new(" ", 5)]),
            Err(LedgerError::MissingOwner { index: 0 })
        );
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_direct_mint_threshold() {
        let h = harness_with(LedgerConfig {
            large_mint_threshold: 1_000,
            ..LedgerConfig::default()
        });
        let err = h.mint("tx-1", &[OutputSpec::new("user1", 1_001)]).unwrap_err();
        assert!(matches!(err, LedgerError::LimitExceeded { ceiling: 1_000, .. }));

        let mut state = StagedState::begin(h.store.as_ref());
        h.ledger
            .mint_in(&mut state, "governance", &[OutputSpec::new("user1", 1_001)])
            .unwrap();
        state.commit().unwrap();
        assert_eq!(h.supply(), 1_001);
    }

    #[test]
    fn test_reused_tx_id_cannot_overwrite_outputs() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 10)]).unwrap();
        assert_eq!(
            h.mint("tx-1", &[OutputSpec::new("user2", 99)]),
            Err(LedgerError::DuplicateUtxo("tx-1:0".into()))
        );
        assert_eq!(h.supply(), 10);
    }

    // =========================================================================
    // Transfer / Burn
    // =========================================================================

    /// Test: Mint 1000, transfer 200, burn 100 leaves supply 900
    #[test]
    fn test_mint_transfer_burn_scenario() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("central_bank", 1000)]).unwrap();
        assert_eq!(h.balance("central_bank"), 1000);

        h.transfer(
            "tx-2",
            "central_bank",
            &["tx-1:0"],
            &[OutputSpec::new("user1", 200), OutputSpec::new("central_bank", 800)],
        )
        .unwrap();
        assert_eq!(h.balance("central_bank"), 800);
        assert_eq!(h.balance("user1"), 200);
        assert_eq!(h.supply(), 1000);

        h.transfer(
            "tx-3",
            "user1",
            &["tx-2:0"],
            &[OutputSpec::new("user1", 100), OutputSpec::new("user1", 100)],
        )
        .unwrap();
        h.burn("tx-4", "user1", &["tx-3:0"]).unwrap();

        assert_eq!(h.balance("user1"), 100);
        assert_eq!(h.supply(), 900);
        assert!(h.ledger.audit_supply().unwrap().consistent);
    }

    /// Test: Unequal sums fail and change nothing
    #[test]
    fn test_conservation_violation_is_atomic() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 60_000), OutputSpec::new("user1", 40_000)])
            .unwrap();
        let before = h.store.snapshot();

        let err = h
            .transfer("tx-2", "user1", &["tx-1:0", "tx-1:1"], &[OutputSpec::new("user2", 110_000)])
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::ConservationViolation {
                inputs: 100_000,
                outputs: 110_000
            }
        );
        assert_eq!(h.store.snapshot(), before);
        assert!(h.ledger.get_utxo("tx-1:0").unwrap().is_active());
    }

    /// Test: A spent output is never accepted again
    #[test]
    fn test_spend_once() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 50)]).unwrap();
        h.transfer("tx-2", "user1", &["tx-1:0"], &[OutputSpec::new("user2", 50)]).unwrap();

        let err = h
            .transfer("tx-3", "user1", &["tx-1:0"], &[OutputSpec::new("user2", 50)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotActive { status: UtxoStatus::Spent, .. }));
        assert!(matches!(
            h.burn("tx-4", "user1", &["tx-1:0"]),
            Err(LedgerError::NotActive { .. })
        ));
    }

    #[test]
    fn test_transfer_input_checks() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 50)]).unwrap();

        assert!(matches!(
            h.transfer("tx-2", "user2", &["tx-1:0"], &[OutputSpec::new("user2", 50)]),
            Err(LedgerError::NotOwner { .. })
        ));
        assert!(matches!(
            h.transfer("tx-2", "user1", &["nope:0"], &[OutputSpec::new("user2", 50)]),
            Err(LedgerError::UtxoNotFound(_))
        ));
        assert!(matches!(
            h.transfer("tx-2", "user1", &["tx-1:0", "tx-1:0"], &[OutputSpec::new("user2", 100)]),
            Err(LedgerError::DuplicateInput(_))
        ));
        assert_eq!(h.burn("tx-2", "user1", &[]), Err(LedgerError::EmptyInputs));
    }

    #[test]
    fn test_frozen_account_cannot_send_or_receive() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 50), OutputSpec::new("user2", 50)])
            .unwrap();

        let mut state = StagedState::begin(h.store.as_ref());
        h.ledger
            .set_account_frozen_in(&mut state, "user2", true, "compliance", Some("aml"))
            .unwrap();
        state.commit().unwrap();

        assert_eq!(
            h.transfer("tx-2", "user1", &["tx-1:0"], &[OutputSpec::new("user2", 50)]),
            Err(LedgerError::AccountFrozen("user2".into()))
        );
        assert_eq!(
            h.transfer("tx-3", "user2", &["tx-1:1"], &[OutputSpec::new("user1", 50)]),
            Err(LedgerError::AccountFrozen("user2".into()))
        );
        assert!(h.ledger.get_account("user2").unwrap().frozen);
    }

    #[test]
    fn test_halt_blocks_ledger_operations() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 50)]).unwrap();
        let mut state = StagedState::begin(h.store.as_ref());
        h.ledger.set_halted_in(&mut state, true).unwrap();
        state.commit().unwrap();

        assert_eq!(h.mint("tx-2", &[OutputSpec::new("user1", 1)]), Err(LedgerError::LedgerHalted));
        assert_eq!(h.burn("tx-3", "user1", &["tx-1:0"]), Err(LedgerError::LedgerHalted));
        assert!(h.ledger.is_halted().unwrap());
    }

    // =========================================================================
    // KYC
    // =========================================================================

    #[test]
    fn test_kyc_daily_limit() {
        let h = harness();
        h.mint(
            "tx-1",
            &[
                OutputSpec::new("user1", 80_000).with_kyc_tag("basic"),
                OutputSpec::new("user1", 80_000).with_kyc_tag("basic"),
            ],
        )
        .unwrap();

        h.transfer("tx-2", "user1", &["tx-1:0"], &[OutputSpec::new("user2", 80_000)])
            .unwrap();
        let err = h
            .transfer("tx-3", "user1", &["tx-1:1"], &[OutputSpec::new("user2", 80_000)])
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::KycLimitExceeded {
                tier: KycTier::Basic,
                used: 80_000,
                ..
            }
        ));

        // Next day the allowance resets.
        h.clock.advance(86_400);
        h.transfer("tx-4", "user1", &["tx-1:1"], &[OutputSpec::new("user2", 80_000)])
            .unwrap();
    }

    #[test]
    fn test_kyc_ignores_change_back_to_sender() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 500_000).with_kyc_tag("basic")])
            .unwrap();
        h.transfer(
            "tx-2",
            "user1",
            &["tx-1:0"],
            &[OutputSpec::new("user2", 1_000), OutputSpec::new("user1", 499_000)],
        )
        .unwrap();
        assert_eq!(h.balance("user1"), 499_000);
    }

    // =========================================================================
    // Coin-selected operations
    // =========================================================================

    #[test]
    fn test_simple_transfer_returns_change() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 30), OutputSpec::new("user1", 50)])
            .unwrap();
        let receipt = h.simple_transfer("tx-2", "user1", "user2", 60).unwrap();

        assert_eq!(receipt.spent, vec!["tx-1:0", "tx-1:1"]);
        assert_eq!(receipt.created, vec!["tx-2:0", "tx-2:1"]);
        assert_eq!(h.balance("user2"), 60);
        assert_eq!(h.balance("user1"), 20);

        let err = h.simple_transfer("tx-3", "user1", "user2", 100).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { available: 20, .. }));
    }

    #[test]
    fn test_simple_burn_partial() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 100)]).unwrap();
        h.store.set_tx_id("tx-2");
        let msg = messages::simple_burn_message("tx-2", "user1", 30).unwrap();
        let sig = digest_sign("user1", &msg, LedgerAction::SimpleBurn.context());
        h.ledger.simple_burn("user1", 30, &sig).unwrap();

        assert_eq!(h.balance("user1"), 70);
        assert_eq!(h.supply(), 70);
        assert!(h.ledger.audit_supply().unwrap().consistent);
    }

    // =========================================================================
    // Governance effects
    // =========================================================================

    #[test]
    fn test_seize_keeps_supply() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 70)]).unwrap();
        h.store.set_tx_id("tx-2");
        let mut state = StagedState::begin(h.store.as_ref());
        let seizure = h
            .ledger
            .seize_in(&mut state, "tx-1:0", "vault", "admin", "court order")
            .unwrap();
        state.commit().unwrap();

        assert_eq!(seizure.seized.status, UtxoStatus::Seized);
        assert_eq!(seizure.vault.id, "tx-2:0");
        assert_eq!(h.balance("vault"), 70);
        assert_eq!(h.balance("user1"), 0);
        assert_eq!(h.supply(), 70);
        assert!(h.ledger.audit_supply().unwrap().consistent);
    }

    #[test]
    fn test_frozen_utxo_cannot_be_spent_or_seized() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 70)]).unwrap();
        let mut state = StagedState::begin(h.store.as_ref());
        h.ledger
            .set_utxo_frozen_in(&mut state, "tx-1:0", true, "compliance", None)
            .unwrap();
        state.commit().unwrap();

        assert!(matches!(
            h.transfer("tx-2", "user1", &["tx-1:0"], &[OutputSpec::new("user2", 70)]),
            Err(LedgerError::NotActive { status: UtxoStatus::Frozen, .. })
        ));
        let mut state = StagedState::begin(h.store.as_ref());
        assert!(h.ledger.seize_in(&mut state, "tx-1:0", "vault", "admin", "x").is_err());
        assert!(h.ledger.audit_supply().unwrap().consistent);
    }

    #[test]
    fn test_redeem_consumes_in_id_order() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 40), OutputSpec::new("user1", 40)])
            .unwrap();
        h.store.set_tx_id("tx-2");
        let mut state = StagedState::begin(h.store.as_ref());
        let receipt = h.ledger.redeem_in(&mut state, "user1", 50, "issuer", "r-1").unwrap();
        state.commit().unwrap();

        assert_eq!(receipt.spent, vec!["tx-1:0", "tx-1:1"]);
        assert_eq!(h.balance("user1"), 30);
        assert_eq!(h.supply(), 30);
        let change = h.ledger.get_utxo("tx-2:0").unwrap();
        assert_eq!(
            change.metadata.origin,
            UtxoOrigin::RedemptionChange {
                redemption_id: "r-1".into()
            }
        );
    }

    #[test]
    fn test_audit_detects_drift() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 10)]).unwrap();
        h.store.put_state(shared_types::keys::TOTAL_SUPPLY, b"11".to_vec()).unwrap();

        let audit = h.ledger.audit_supply().unwrap();
        assert!(!audit.consistent);
        let event = h.audit.last().unwrap();
        assert_eq!(event.event_type, AuditEventType::InvariantCheck);
        assert_eq!(event.result, AuditResult::Failure);
    }

    #[test]
    fn test_one_audit_event_per_operation() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 10)]).unwrap();
        let _ = h.transfer("tx-2", "user1", &["tx-1:0"], &[OutputSpec::new("user2", 11)]);
        assert_eq!(h.audit.count_of(AuditEventType::Mint), 1);
        assert_eq!(h.audit.count_of(AuditEventType::Transfer), 1);
    }

    #[test]
    fn test_list_utxos_includes_spent() {
        let h = harness();
        h.mint("tx-1", &[OutputSpec::new("user1", 10)]).unwrap();
        h.burn("tx-2", "user1", &["tx-1:0"]).unwrap();
        let listed = h.ledger.list_utxos("user1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, UtxoStatus::Spent);
    }
}
