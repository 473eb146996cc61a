//! # Governance Proposals
//!
//! ```text
//! pending ──(quorum)──► approved ──(execute)──► executed
//!    │                     │
//!    ├──(rejections)──► rejected
//!    └──(now > expires_at)──► expired ◄──┘
//! ```
//!
//! `executed`, `rejected` and `expired` are terminal.

use std::collections::BTreeMap;
use std::fmt;

use gd_03_ledger_engine::OutputSpec;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::hashing::{canonical_hash, sha256_hex};
use shared_types::{StoreError, Timestamp};

use crate::domain::actions::{ActionRequest, FreezeTarget};
use crate::domain::errors::GovernanceError;
use crate::domain::policy::PolicyChange;

pub const APPROVE_CONTEXT: &str = "genusd.governance.approve";
pub const REJECT_CONTEXT: &str = "genusd.governance.reject";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalType {
    Freeze,
    Unfreeze,
    Seize,
    Redeem,
    PolicyUpdate,
    MintLarge,
}

impl ProposalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalType::Freeze => "FREEZE",
            ProposalType::Unfreeze => "UNFREEZE",
            ProposalType::Seize => "SEIZE",
            ProposalType::Redeem => "REDEEM",
            ProposalType::PolicyUpdate => "POLICY_UPDATE",
            ProposalType::MintLarge => "MINT_LARGE",
        }
    }
}

impl fmt::Display for ProposalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Rejected,
    Executed,
    Expired,
}

impl ProposalStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProposalStatus::Rejected | ProposalStatus::Executed | ProposalStatus::Expired
        )
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Approved => "approved",
            ProposalStatus::Rejected => "rejected",
            ProposalStatus::Executed => "executed",
            ProposalStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// Action-specific proposal contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProposalPayload {
    Freeze { target: FreezeTarget, reason: String },
    Unfreeze { target: FreezeTarget },
    Seize { utxo_id: String, reason: String, vault_owner: String },
    Redeem { user_id: String, amount: u64, bank_reference: String },
    PolicyUpdate { change: PolicyChange },
    MintLarge { outputs: Vec<OutputSpec> },
}

impl ProposalPayload {
    pub fn proposal_type(&self) -> ProposalType {
        match self {
            ProposalPayload::Freeze { .. } => ProposalType::Freeze,
            ProposalPayload::Unfreeze { .. } => ProposalType::Unfreeze,
            ProposalPayload::Seize { .. } => ProposalType::Seize,
            ProposalPayload::Redeem { .. } => ProposalType::Redeem,
            ProposalPayload::PolicyUpdate { .. } => ProposalType::PolicyUpdate,
            ProposalPayload::MintLarge { .. } => ProposalType::MintLarge,
        }
    }

    /// Direct-path equivalent, for payloads that have one.
    pub fn as_action(&self) -> Option<ActionRequest> {
        match self.clone() {
            ProposalPayload::Freeze { target, reason } => Some(ActionRequest::FreezeAccount { target, reason }),
            ProposalPayload::Unfreeze { target } => Some(ActionRequest::UnfreezeAccount { target }),
            ProposalPayload::Seize {
                utxo_id,
                reason,
                vault_owner,
            } => Some(ActionRequest::SeizeUtxo {
                utxo_id,
                vault_owner,
                reason,
            }),
            ProposalPayload::Redeem {
                user_id,
                amount,
                bank_reference,
            } => Some(ActionRequest::RedeemStablecoin {
                user_id,
                amount,
                bank_reference,
            }),
            ProposalPayload::PolicyUpdate { .. } | ProposalPayload::MintLarge { .. } => None,
        }
    }

    pub fn validate(&self) -> Result<(), GovernanceError> {
        if let Some(action) = self.as_action() {
            return action.validate();
        }
        match self {
            ProposalPayload::PolicyUpdate { change } => change.validate(),
            ProposalPayload::MintLarge { outputs } => {
                if outputs.is_empty() {
                    return Err(GovernanceError::EmptyField("outputs"));
                }
                if outputs.iter().any(|o| o.amount == 0) {
                    return Err(GovernanceError::ZeroAmount);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Canonical hash of the payload, as bound into direct action messages.
    pub fn digest(&self) -> Result<String, GovernanceError> {
        let digest = canonical_hash(self).map_err(|e| StoreError::Encode {
            key: "proposal payload".to_string(),
            reason: e.to_string(),
        })?;
        Ok(digest)
    }
}

/// One signer's vote.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub signer: String,
    pub timestamp: Timestamp,
    #[serde_as(as = "Hex")]
    pub signature: Vec<u8>,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceProposal {
    pub id: String,
    #[serde(rename = "type")]
    pub proposal_type: ProposalType,
    pub proposer: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub status: ProposalStatus,
    pub approvals: BTreeMap<String, Approval>,
    pub required_signatures: usize,
    pub payload: ProposalPayload,
    pub nonce: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_by: Option<String>,
}

impl GovernanceProposal {
    pub fn new(
        proposer: &str,
        payload: ProposalPayload,
        now: Timestamp,
        ttl_secs: u64,
        required_signatures: usize,
    ) -> Self {
        let proposal_type = payload.proposal_type();
        let id = derive_proposal_id(proposal_type, proposer, now);
        let nonce = sha256_hex(format!("{id}:{now}").as_bytes());
        Self {
            id,
            proposal_type,
            proposer: proposer.to_string(),
            created_at: now,
            expires_at: now.saturating_add(ttl_secs),
            status: ProposalStatus::Pending,
            approvals: BTreeMap::new(),
            required_signatures,
            payload,
            nonce,
            executed_at: None,
            executed_by: None,
        }
    }

    /// `now > expires_at`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    pub fn approval_count(&self) -> usize {
        self.approvals.values().filter(|a| a.approved).count()
    }

    pub fn rejection_count(&self) -> usize {
        self.approvals.values().filter(|a| !a.approved).count()
    }

    pub fn has_approved(&self, signer: &str) -> bool {
        self.approvals.get(signer).is_some_and(|a| a.approved)
    }

    /// `{TYPE}:{id}:{nonce}:{payload digest}`, signed by approvers and
    /// rejecters under their respective contexts.
    pub fn signing_message(&self) -> Result<Vec<u8>, GovernanceError> {
        Ok(format!(
            "{}:{}:{}:{}",
            self.proposal_type,
            self.id,
            self.nonce,
            self.payload.digest()?
        )
        .into_bytes())
    }

    /// Record a vote and move to `approved` or `rejected` when the count
    /// decides it. `eligible` is the size of the signer set.
    pub fn record_vote(&mut self, approval: Approval, eligible: usize) {
        self.approvals.insert(approval.signer.clone(), approval);
        if self.approval_count() >= self.required_signatures {
            self.status = ProposalStatus::Approved;
        } else if eligible.saturating_sub(self.rejection_count()) < self.required_signatures {
            self.status = ProposalStatus::Rejected;
        }
    }
}

/// `hex(sha256("{TYPE}:{proposer}:{timestamp}"))[..32]`.
pub fn derive_proposal_id(proposal_type: ProposalType, proposer: &str, timestamp: Timestamp) -> String {
    let mut id = sha256_hex(format!("{proposal_type}:{proposer}:{timestamp}").as_bytes());
    id.truncate(32);
    id
}
