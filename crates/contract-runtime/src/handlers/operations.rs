//! Operation names accepted in `ContractRequest::operation`.

use std::fmt;
use std::str::FromStr;

use shared_types::AuditEventType;

use crate::errors::RuntimeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    InitLedger,
    // Ledger
    Mint,
    Transfer,
    Burn,
    SimpleTransfer,
    SimpleBurn,
    GetBalance,
    GetUtxo,
    ListUtxos,
    GetTotalSupply,
    GetAccount,
    AuditSupply,
    // Commitments
    VerifyProof,
    GetCommitment,
    IsNullifierUsed,
    AuditNullifiers,
    // Proposals
    CreateProposal,
    ApproveProposal,
    RejectProposal,
    ExecuteProposal,
    GetProposal,
    ListProposals,
    SweepExpired,
    // Direct actions
    FreezeAccount,
    UnfreezeAccount,
    SeizeUtxo,
    RedeemStablecoin,
    AttestReserve,
    // Governance queries
    GetPolicy,
    GetMultisigConfig,
    GetLatestAttestation,
    GetRedemption,
    // Key registry
    ListKeys,
    GetKey,
}

impl Operation {
    pub const ALL: [Operation; 34] = [
        Operation::InitLedger,
        Operation::Mint,
        Operation::Transfer,
        Operation::Burn,
        Operation::SimpleTransfer,
        Operation::SimpleBurn,
        Operation::GetBalance,
        Operation::GetUtxo,
        Operation::ListUtxos,
        Operation::GetTotalSupply,
        Operation::GetAccount,
        Operation::AuditSupply,
        Operation::VerifyProof,
        Operation::GetCommitment,
        Operation::IsNullifierUsed,
        Operation::AuditNullifiers,
        Operation::CreateProposal,
        Operation::ApproveProposal,
        Operation::RejectProposal,
        Operation::ExecuteProposal,
        Operation::GetProposal,
        Operation::ListProposals,
        Operation::SweepExpired,
        Operation::FreezeAccount,
        Operation::UnfreezeAccount,
        Operation::SeizeUtxo,
        Operation::RedeemStablecoin,
        Operation::AttestReserve,
        Operation::GetPolicy,
        Operation::GetMultisigConfig,
        Operation::GetLatestAttestation,
        Operation::GetRedemption,
        Operation::ListKeys,
        Operation::GetKey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::InitLedger => "InitLedger",
            Operation::Mint => "Mint",
            Operation::Transfer => "Transfer",
            Operation::Burn => "Burn",
            Operation::SimpleTransfer => "SimpleTransfer",
            Operation::SimpleBurn => "SimpleBurn",
            Operation::GetBalance => "GetBalance",
            Operation::GetUtxo => "GetUtxo",
            Operation::ListUtxos => "ListUtxos",
            Operation::GetTotalSupply => "GetTotalSupply",
            Operation::GetAccount => "GetAccount",
            Operation::AuditSupply => "AuditSupply",
            Operation::VerifyProof => "VerifyProof",
            Operation::GetCommitment => "GetCommitment",
            Operation::IsNullifierUsed => "IsNullifierUsed",
            Operation::AuditNullifiers => "AuditNullifiers",
            Operation::CreateProposal => "CreateProposal",
            Operation::ApproveProposal => "ApproveProposal",
            Operation::RejectProposal => "RejectProposal",
            Operation::ExecuteProposal => "ExecuteProposal",
            Operation::GetProposal => "GetProposal",
            Operation::ListProposals => "ListProposals",
            Operation::SweepExpired => "SweepExpired",
            Operation::FreezeAccount => "FreezeAccount",
            Operation::UnfreezeAccount => "UnfreezeAccount",
            Operation::SeizeUtxo => "SeizeUtxo",
            Operation::RedeemStablecoin => "RedeemStablecoin",
            Operation::AttestReserve => "AttestReserve",
            Operation::GetPolicy => "GetPolicy",
            Operation::GetMultisigConfig => "GetMultisigConfig",
            Operation::GetLatestAttestation => "GetLatestAttestation",
            Operation::GetRedemption => "GetRedemption",
            Operation::ListKeys => "ListKeys",
            Operation::GetKey => "GetKey",
        }
    }

    /// Operations whose engine call carries no signature of its own.
    pub fn requires_envelope_signature(&self) -> bool {
        matches!(self, Operation::CreateProposal | Operation::ExecuteProposal)
    }

    /// Read-only operations never touch the store's write path.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Operation::GetBalance
                | Operation::GetUtxo
                | Operation::ListUtxos
                | Operation::GetTotalSupply
                | Operation::GetAccount
                | Operation::GetCommitment
                | Operation::IsNullifierUsed
                | Operation::GetProposal
                | Operation::ListProposals
                | Operation::GetPolicy
                | Operation::GetMultisigConfig
                | Operation::GetLatestAttestation
                | Operation::GetRedemption
                | Operation::ListKeys
                | Operation::GetKey
        )
    }

    /// Audit category for failures caught before an engine is reached.
    pub fn audit_type(&self) -> AuditEventType {
        match self {
            Operation::Mint => AuditEventType::Mint,
            Operation::Transfer | Operation::SimpleTransfer => AuditEventType::Transfer,
            Operation::Burn | Operation::SimpleBurn => AuditEventType::Burn,
            Operation::VerifyProof | Operation::GetCommitment | Operation::IsNullifierUsed => {
                AuditEventType::ZkVerify
            }
            Operation::AuditSupply | Operation::AuditNullifiers => AuditEventType::InvariantCheck,
            Operation::ListKeys | Operation::GetKey => AuditEventType::KeyRegistry,
            _ => AuditEventType::Governance,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| RuntimeError::UnknownOperation(s.to_string()))
    }
}
