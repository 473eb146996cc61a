//! Privileged action requests and their outcomes.
//!
//! The same [`ActionRequest`] is produced by the direct single-signature
//! path and by an executed proposal, so both run identical effect code.

use std::fmt;

use gd_03_ledger_engine::{AccountRecord, LedgerReceipt, Utxo};
use serde::{Deserialize, Serialize};
use shared_types::hashing::canonical_hash;
use shared_types::StoreError;

use crate::domain::errors::GovernanceError;
use crate::domain::policy::{GovernanceAction, PolicyChange};
use crate::domain::records::{AttestationRecord, RedemptionRecord};

/// Holder or single output a freeze applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreezeTarget {
    Account(String),
    Utxo(String),
}

impl FreezeTarget {
    pub fn id(&self) -> &str {
        match self {
            FreezeTarget::Account(id) | FreezeTarget::Utxo(id) => id,
        }
    }
}

impl fmt::Display for FreezeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreezeTarget::Account(id) => write!(f, "account:{id}"),
            FreezeTarget::Utxo(id) => write!(f, "utxo:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionRequest {
    FreezeAccount {
        target: FreezeTarget,
        reason: String,
    },
    UnfreezeAccount {
        target: FreezeTarget,
    },
    SeizeUtxo {
        utxo_id: String,
        vault_owner: String,
        reason: String,
    },
    RedeemStablecoin {
        user_id: String,
        amount: u64,
        bank_reference: String,
    },
    AttestReserve {
        reserve_amount: u64,
        report_hash: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        commitment: Option<String>,
    },
}

impl ActionRequest {
    pub fn action(&self) -> GovernanceAction {
        match self {
            ActionRequest::FreezeAccount { .. } => GovernanceAction::FreezeAccount,
            ActionRequest::UnfreezeAccount { .. } => GovernanceAction::UnfreezeAccount,
            ActionRequest::SeizeUtxo { .. } => GovernanceAction::SeizeUtxo,
            ActionRequest::RedeemStablecoin { .. } => GovernanceAction::RedeemStablecoin,
            ActionRequest::AttestReserve { .. } => GovernanceAction::AttestReserve,
        }
    }

    /// Subject used for audit and target-scoped cooldowns.
    pub fn target(&self) -> String {
        match self {
            ActionRequest::FreezeAccount { target, .. } | ActionRequest::UnfreezeAccount { target } => {
                target.id().to_string()
            }
            ActionRequest::SeizeUtxo { utxo_id, .. } => utxo_id.clone(),
            ActionRequest::RedeemStablecoin { user_id, .. } => user_id.clone(),
            ActionRequest::AttestReserve { .. } => "RESERVE".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        let require = |value: &str, field: &'static str| {
            if value.trim().is_empty() {
                Err(GovernanceError::EmptyField(field))
            } else {
                Ok(())
            }
        };
        match self {
            ActionRequest::FreezeAccount { target, reason } => {
                require(target.id(), "target")?;
                require(reason, "reason")
            }
            ActionRequest::UnfreezeAccount { target } => require(target.id(), "target"),
            ActionRequest::SeizeUtxo {
                utxo_id,
                vault_owner,
                reason,
            } => {
                require(utxo_id, "utxo_id")?;
                require(vault_owner, "vault_owner")?;
                require(reason, "reason")
            }
            ActionRequest::RedeemStablecoin {
                user_id,
                amount,
                bank_reference,
            } => {
                require(user_id, "user_id")?;
                require(bank_reference, "bank_reference")?;
                if *amount == 0 {
                    return Err(GovernanceError::ZeroAmount);
                }
                Ok(())
            }
            ActionRequest::AttestReserve { report_hash, .. } => require(report_hash, "report_hash"),
        }
    }
}

/// Message a role holder signs for the direct path:
/// `{ACTION}|{tx_id}|{actor}|{sha3(request json)}`.
pub fn direct_action_message(tx_id: &str, actor: &str, request: &ActionRequest) -> Result<Vec<u8>, GovernanceError> {
    let action = request.action();
    let digest = canonical_hash(request).map_err(|e| StoreError::Encode {
        key: action.as_str().to_string(),
        reason: e.to_string(),
    })?;
    Ok(format!("{action}|{tx_id}|{actor}|{digest}").into_bytes())
}

/// What an action or executed proposal changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    AccountFrozen { account: AccountRecord },
    AccountUnfrozen { account: AccountRecord },
    UtxoFrozen { utxo: Utxo },
    UtxoUnfrozen { utxo: Utxo },
    Seized { seized_utxo: String, vault_utxo: String, amount: u64 },
    Redeemed { record: RedemptionRecord },
    Attested { record: AttestationRecord },
    PolicyUpdated { change: PolicyChange },
    Minted { receipt: LedgerReceipt },
}
