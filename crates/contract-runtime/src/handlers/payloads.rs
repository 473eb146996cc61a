//! Typed request payloads, one per operation that takes arguments.

use gd_03_ledger_engine::OutputSpec;
use gd_04_governance::{FreezeTarget, ProposalPayload, ProposalStatus, ProposalType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintRequest {
    pub outputs: Vec<OutputSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub inputs: Vec<String>,
    pub outputs: Vec<OutputSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnRequest {
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleTransferRequest {
    pub recipient: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountRequest {
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerQuery {
    pub owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtxoQuery {
    pub utxo_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountQuery {
    pub account_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitmentQuery {
    pub commitment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullifierQuery {
    pub nullifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyQuery {
    pub identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProposalRequest {
    pub proposal_type: ProposalType,
    pub payload: ProposalPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalRef {
    pub proposal_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposalFilter {
    #[serde(default)]
    pub status: Option<ProposalStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreezeRequest {
    pub target: FreezeTarget,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnfreezeRequest {
    pub target: FreezeTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeizeRequest {
    pub utxo_id: String,
    pub vault_owner: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub user_id: String,
    pub amount: u64,
    pub bank_reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestRequest {
    pub reserve_amount: u64,
    pub report_hash: String,
    #[serde(default)]
    pub commitment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedemptionQuery {
    pub redemption_id: String,
}
