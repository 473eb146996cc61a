//! Deterministic state-store key layout.
//!
//! These prefixes are part of the persisted compatibility surface.

pub const UTXO_PREFIX: &str = "UTXO_";
pub const PROPOSAL_PREFIX: &str = "PROPOSAL_";
pub const COMMITMENT_PREFIX: &str = "COMMITMENT_";
pub const NULLIFIER_PREFIX: &str = "NULLIFIER_";
pub const ACCOUNT_PREFIX: &str = "ACCOUNT_";
pub const REDEMPTION_PREFIX: &str = "REDEMPTION_";
pub const ATTESTATION_PREFIX: &str = "ATTESTATION_";
pub const COOLDOWN_PREFIX: &str = "COOLDOWN_";
pub const KYC_USAGE_PREFIX: &str = "KYC_USAGE_";

pub const TOTAL_SUPPLY: &str = "TOTAL_SUPPLY";
pub const LATEST_ATTESTATION: &str = "LATEST_ATTESTATION";
pub const POLICY_REGISTRY: &str = "POLICY_REGISTRY";
pub const MULTISIG_CONFIG: &str = "MULTISIG_CONFIG";
pub const LEDGER_HALTED: &str = "LEDGER_HALTED";

pub fn utxo_key(id: &str) -> String {
    format!("{UTXO_PREFIX}{id}")
}

pub fn proposal_key(id: &str) -> String {
    format!("{PROPOSAL_PREFIX}{id}")
}

pub fn commitment_key(commitment: &str) -> String {
    format!("{COMMITMENT_PREFIX}{commitment}")
}

pub fn nullifier_key(nullifier: &str) -> String {
    format!("{NULLIFIER_PREFIX}{nullifier}")
}

pub fn account_key(account_id: &str) -> String {
    format!("{ACCOUNT_PREFIX}{account_id}")
}

pub fn redemption_key(id: &str) -> String {
    format!("{REDEMPTION_PREFIX}{id}")
}

pub fn attestation_key(id: &str) -> String {
    format!("{ATTESTATION_PREFIX}{id}")
}

/// Last time `action` was performed for `subject`.
pub fn cooldown_key(action: &str, subject: &str) -> String {
    format!("{COOLDOWN_PREFIX}{action}_{subject}")
}

/// Outflow counter for `owner` on Unix day `day`.
pub fn kyc_usage_key(owner: &str, day: u64) -> String {
    format!("{KYC_USAGE_PREFIX}{owner}_{day}")
}

/// UTXO id for output `index` of transaction `tx_id`.
pub fn utxo_id(tx_id: &str, index: usize) -> String {
    format!("{tx_id}:{index}")
}
