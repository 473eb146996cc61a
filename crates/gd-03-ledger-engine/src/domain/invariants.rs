//! # Invariant Checker
//!
//! Pure arithmetic guards shared by every supply-affecting path. Nothing
//! here touches state.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Utxo, UtxoStatus};
use crate::domain::errors::LedgerError;

/// Overflow-checked sum.
pub fn checked_sum(amounts: impl IntoIterator<Item = u64>) -> Result<u64, LedgerError> {
    amounts
        .into_iter()
        .try_fold(0u64, |acc, a| acc.checked_add(a))
        .ok_or(LedgerError::AmountOverflow)
}

/// Inputs must exactly equal outputs.
pub fn check_conservation(inputs: u64, outputs: u64) -> Result<(), LedgerError> {
    if inputs != outputs {
        return Err(LedgerError::ConservationViolation { inputs, outputs });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyDelta {
    Increase(u64),
    Decrease(u64),
}

/// New total supply after `delta`; never negative, never wraps.
pub fn apply_supply_delta(current: u64, delta: SupplyDelta) -> Result<u64, LedgerError> {
    match delta {
        SupplyDelta::Increase(n) => current.checked_add(n).ok_or_else(|| {
            LedgerError::InvariantViolation(format!("total supply overflow: {current} + {n}"))
        }),
        SupplyDelta::Decrease(n) => current.checked_sub(n).ok_or_else(|| {
            LedgerError::InvariantViolation(format!("total supply would go negative: {current} - {n}"))
        }),
    }
}

/// Snapshot comparison of the supply counter with the UTXO set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyAudit {
    pub recorded_supply: u64,
    pub active_sum: u64,
    pub frozen_sum: u64,
    pub utxo_count: usize,
    pub consistent: bool,
}

impl SupplyAudit {
    /// Frozen value still exists, so it counts toward supply.
    pub fn compute(recorded_supply: u64, utxos: &[Utxo]) -> Result<Self, LedgerError> {
        let sum_of = |status: UtxoStatus| {
            checked_sum(utxos.iter().filter(|u| u.status == status).map(|u| u.amount))
        };
        let active_sum = sum_of(UtxoStatus::Active)?;
        let frozen_sum = sum_of(UtxoStatus::Frozen)?;
        let outstanding = active_sum
            .checked_add(frozen_sum)
            .ok_or(LedgerError::AmountOverflow)?;
        Ok(Self {
            recorded_supply,
            active_sum,
            frozen_sum,
            utxo_count: utxos.len(),
            consistent: outstanding == recorded_supply,
        })
    }

    pub fn outstanding(&self) -> u64 {
        self.active_sum.saturating_add(self.frozen_sum)
    }
}
