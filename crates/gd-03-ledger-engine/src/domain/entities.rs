//! # Ledger Entities
//!
//! Persisted shapes for UTXOs, accounts and receipts. Field names and the
//! status enum values are part of the stored-data compatibility surface.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::Timestamp;

use crate::domain::errors::LedgerError;

// =============================================================================
// UTXO STATUS
// =============================================================================

/// Lifecycle of an output.
///
/// ```text
/// active ──► spent
///   │ ▲
///   ▼ │
/// frozen
///
/// active ──► seized
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtxoStatus {
    Active,
    Frozen,
    Spent,
    Seized,
}

impl UtxoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UtxoStatus::Active => "active",
            UtxoStatus::Frozen => "frozen",
            UtxoStatus::Spent => "spent",
            UtxoStatus::Seized => "seized",
        }
    }

    pub fn can_transition_to(&self, next: UtxoStatus) -> bool {
        matches!(
            (self, next),
            (UtxoStatus::Active, UtxoStatus::Spent)
                | (UtxoStatus::Active, UtxoStatus::Frozen)
                | (UtxoStatus::Active, UtxoStatus::Seized)
                | (UtxoStatus::Frozen, UtxoStatus::Active)
        )
    }

    /// Still counted in total supply.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, UtxoStatus::Active | UtxoStatus::Frozen)
    }
}

impl fmt::Display for UtxoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// METADATA
// =============================================================================

/// How an output came into existence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UtxoOrigin {
    Mint {
        issuer: String,
    },
    Transfer {
        sender: String,
    },
    Seizure {
        source_utxo: String,
        authority: String,
        reason: String,
    },
    RedemptionChange {
        redemption_id: String,
    },
}

/// Last status change applied to an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub from: UtxoStatus,
    pub to: UtxoStatus,
    pub by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub at: Timestamp,
    pub tx_id: String,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoMetadata {
    pub origin: UtxoOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Opaque extension bytes, hex on the wire.
    #[serde_as(as = "Option<Hex>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition: Option<StatusTransition>,
}

impl UtxoMetadata {
    pub fn new(origin: UtxoOrigin) -> Self {
        Self {
            origin,
            memo: None,
            extension: None,
            last_transition: None,
        }
    }
}

// =============================================================================
// UTXO
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// `{tx_id}:{output_index}`.
    pub id: String,
    pub owner: String,
    pub asset_code: String,
    pub amount: u64,
    pub status: UtxoStatus,
    #[serde(default)]
    pub kyc_tag: Option<String>,
    pub created_at: Timestamp,
    pub metadata: UtxoMetadata,
}

impl Utxo {
    pub fn is_active(&self) -> bool {
        self.status == UtxoStatus::Active
    }

    /// Move to `next`, recording who did it.
    pub fn transition(
        &mut self,
        next: UtxoStatus,
        by: &str,
        reason: Option<&str>,
        at: Timestamp,
        tx_id: &str,
    ) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(next) {
            return Err(LedgerError::InvalidTransition {
                utxo_id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.metadata.last_transition = Some(StatusTransition {
            from: self.status,
            to: next,
            by: by.to_string(),
            reason: reason.map(str::to_string),
            at,
            tx_id: tx_id.to_string(),
        });
        self.status = next;
        Ok(())
    }
}

/// Requested output of a mint or transfer.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub owner: String,
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kyc_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde_as(as = "Option<Hex>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<u8>>,
}

impl OutputSpec {
    pub fn new(owner: impl Into<String>, amount: u64) -> Self {
        Self {
            owner: owner.into(),
            amount,
            kyc_tag: None,
            memo: None,
            extension: None,
        }
    }

    pub fn with_kyc_tag(mut self, tag: impl Into<String>) -> Self {
        self.kyc_tag = Some(tag.into());
        self
    }
}

// =============================================================================
// ACCOUNTS AND RECEIPTS
// =============================================================================

/// Compliance state of a holder. Absent record means not frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    pub frozen: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frozen_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unfrozen_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unfrozen_by: Option<String>,
}

impl AccountRecord {
    pub fn unfrozen(account_id: &str) -> Self {
        Self {
            account_id: account_id.to_string(),
            frozen: false,
            freeze_reason: None,
            frozen_at: None,
            frozen_by: None,
            unfrozen_at: None,
            unfrozen_by: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerOperation {
    Mint,
    Transfer,
    Burn,
}

/// Result of a committed ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    pub tx_id: String,
    pub operation: LedgerOperation,
    pub created: Vec<String>,
    pub spent: Vec<String>,
    pub amount: u64,
    pub total_supply: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utxo() -> Utxo {
        Utxo {
            id: "tx1:0".into(),
            owner: "alice".into(),
            asset_code: "GENUSD".into(),
            amount: 10,
            status: UtxoStatus::Active,
            kyc_tag: None,
            created_at: 1,
            metadata: UtxoMetadata::new(UtxoOrigin::Mint { issuer: "cb".into() }),
        }
    }

    /// Test: Only the documented lifecycle edges are allowed
    #[test]
    fn test_transition_table() {
        use UtxoStatus::*;
        assert!(Active.can_transition_to(Spent));
        assert!(Active.can_transition_to(Frozen));
        assert!(Frozen.can_transition_to(Active));
        assert!(Active.can_transition_to(Seized));
        assert!(!Spent.can_transition_to(Active));
        assert!(!Frozen.can_transition_to(Seized));
        assert!(!Seized.can_transition_to(Active));
        assert!(!Frozen.can_transition_to(Spent));
    }

    #[test]
    fn test_transition_records_actor() {
        let mut u = utxo();
        u.transition(UtxoStatus::Frozen, "compliance", Some("aml"), 5, "tx2").unwrap();
        let t = u.metadata.last_transition.clone().unwrap();
        assert_eq!(t.from, UtxoStatus::Active);
        assert_eq!(t.by, "compliance");
        assert_eq!(u.status, UtxoStatus::Frozen);

        let err = u.transition(UtxoStatus::Spent, "x", None, 6, "tx3").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidTransition { .. }));
    }

    /// Test: Wire names of statuses and origins are stable
    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(utxo()).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["metadata"]["origin"]["kind"], "mint");
        assert!(json["metadata"].get("extension").is_none());
    }

    #[test]
    fn test_extension_bytes_hex() {
        let mut spec = OutputSpec::new("bob", 5);
        spec.extension = Some(vec![0xde, 0xad]);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["extension"], "dead");
        let back: OutputSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);

        let minimal: OutputSpec = serde_json::from_str(r#"{"owner":"x","amount":1}"#).unwrap();
        assert_eq!(minimal.extension, None);
    }
}
