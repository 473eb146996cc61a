//! # UTXO Set Access
//!
//! Every read and write of ledger records goes through these helpers on a
//! [`StagedState`], so status checks always see the store (plus the
//! operation's own writes) and never a cached copy.

use shared_types::keys::{self, LEDGER_HALTED, TOTAL_SUPPLY, UTXO_PREFIX};
use shared_types::StagedState;

use crate::domain::entities::{AccountRecord, Utxo, UtxoStatus};
use crate::domain::errors::LedgerError;
use crate::domain::invariants::checked_sum;

// =============================================================================
// UTXOS
// =============================================================================

pub fn load_utxo(state: &StagedState<'_>, id: &str) -> Result<Utxo, LedgerError> {
    state
        .get_json::<Utxo>(&keys::utxo_key(id))?
        .ok_or_else(|| LedgerError::UtxoNotFound(id.to_string()))
}

/// Load `id` and require it to be active and owned by `owner`.
pub fn load_spendable(state: &StagedState<'_>, id: &str, owner: &str) -> Result<Utxo, LedgerError> {
    let utxo = load_utxo(state, id)?;
    if utxo.status != UtxoStatus::Active {
        return Err(LedgerError::NotActive {
            utxo_id: utxo.id,
            status: utxo.status,
        });
    }
    if utxo.owner != owner {
        return Err(LedgerError::NotOwner {
            utxo_id: utxo.id,
            owner: utxo.owner,
            actor: owner.to_string(),
        });
    }
    Ok(utxo)
}

pub fn save_utxo(state: &mut StagedState<'_>, utxo: &Utxo) -> Result<(), LedgerError> {
    state.put_json(keys::utxo_key(&utxo.id), utxo)?;
    Ok(())
}

/// Persist a freshly created output; ids are never reused.
pub fn insert_utxo(state: &mut StagedState<'_>, utxo: &Utxo) -> Result<(), LedgerError> {
    if state.get(&keys::utxo_key(&utxo.id))?.is_some() {
        return Err(LedgerError::DuplicateUtxo(utxo.id.clone()));
    }
    save_utxo(state, utxo)
}

pub fn scan_utxos(state: &StagedState<'_>) -> Result<Vec<Utxo>, LedgerError> {
    Ok(state.scan_json(UTXO_PREFIX)?)
}

/// Active outputs of `owner` in id order.
pub fn active_utxos_of(state: &StagedState<'_>, owner: &str) -> Result<Vec<Utxo>, LedgerError> {
    Ok(scan_utxos(state)?
        .into_iter()
        .filter(|u| u.owner == owner && u.is_active())
        .collect())
}

pub fn balance_of(state: &StagedState<'_>, owner: &str) -> Result<u64, LedgerError> {
    checked_sum(active_utxos_of(state, owner)?.iter().map(|u| u.amount))
}

/// Take candidates in order until `amount` is covered.
///
/// Returns the chosen outputs and their total, which may exceed `amount`.
pub fn select_inputs(owner: &str, candidates: Vec<Utxo>, amount: u64) -> Result<(Vec<Utxo>, u64), LedgerError> {
    let mut chosen = Vec::new();
    let mut total = 0u64;
    for utxo in candidates {
        if total >= amount {
            break;
        }
        total = total.checked_add(utxo.amount).ok_or(LedgerError::AmountOverflow)?;
        chosen.push(utxo);
    }
    if total < amount {
        return Err(LedgerError::InsufficientFunds {
            owner: owner.to_string(),
            available: total,
            requested: amount,
        });
    }
    Ok((chosen, total))
}

// =============================================================================
// SCALARS
// =============================================================================

pub fn read_supply(state: &StagedState<'_>) -> Result<u64, LedgerError> {
    Ok(state.get_json::<u64>(TOTAL_SUPPLY)?.unwrap_or(0))
}

pub fn write_supply(state: &mut StagedState<'_>, supply: u64) -> Result<(), LedgerError> {
    state.put_json(TOTAL_SUPPLY, &supply)?;
    Ok(())
}

pub fn is_halted(state: &StagedState<'_>) -> Result<bool, LedgerError> {
    Ok(state.get_json::<bool>(LEDGER_HALTED)?.unwrap_or(false))
}

pub fn set_halted(state: &mut StagedState<'_>, halted: bool) -> Result<(), LedgerError> {
    state.put_json(LEDGER_HALTED, &halted)?;
    Ok(())
}

pub fn ensure_not_halted(state: &StagedState<'_>) -> Result<(), LedgerError> {
    if is_halted(state)? {
        return Err(LedgerError::LedgerHalted);
    }
    Ok(())
}

pub fn kyc_usage(state: &StagedState<'_>, owner: &str, day: u64) -> Result<u64, LedgerError> {
    Ok(state.get_json::<u64>(&keys::kyc_usage_key(owner, day))?.unwrap_or(0))
}

pub fn set_kyc_usage(state: &mut StagedState<'_>, owner: &str, day: u64, used: u64) -> Result<(), LedgerError> {
    state.put_json(keys::kyc_usage_key(owner, day), &used)?;
    Ok(())
}

// =============================================================================
// ACCOUNTS
// =============================================================================

pub fn load_account(state: &StagedState<'_>, account_id: &str) -> Result<AccountRecord, LedgerError> {
    Ok(state
        .get_json::<AccountRecord>(&keys::account_key(account_id))?
        .unwrap_or_else(|| AccountRecord::unfrozen(account_id)))
}

pub fn save_account(state: &mut StagedState<'_>, account: &AccountRecord) -> Result<(), LedgerError> {
    state.put_json(keys::account_key(&account.account_id), account)?;
    Ok(())
}

pub fn ensure_not_frozen(state: &StagedState<'_>, account_id: &str) -> Result<(), LedgerError> {
    if load_account(state, account_id)?.frozen {
        return Err(LedgerError::AccountFrozen(account_id.to_string()));
    }
    Ok(())
}
