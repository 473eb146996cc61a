//! Records left behind by redemptions and reserve attestations.

use serde::{Deserialize, Serialize};
use shared_types::hashing::sha256_hex;
use shared_types::Timestamp;

/// Off-ledger payout backed by retired supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionRecord {
    pub redemption_id: String,
    pub user_id: String,
    pub amount: u64,
    pub bank_reference: String,
    pub authorized_by: String,
    pub consumed_utxos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_utxo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<String>,
    pub timestamp: Timestamp,
    pub tx_id: String,
}

/// Auditor statement of reserves against supply at `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRecord {
    pub attestation_id: String,
    pub auditor: String,
    pub reserve_amount: u64,
    pub total_supply: u64,
    /// Reserve over supply in basis points; absent when supply is zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral_ratio_bps: Option<u64>,
    pub report_hash: String,
    /// Zero-knowledge commitment consumed by this attestation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment: Option<String>,
    pub timestamp: Timestamp,
    pub tx_id: String,
}

impl AttestationRecord {
    pub fn is_fully_collateralized(&self) -> bool {
        self.reserve_amount >= self.total_supply
    }
}

/// `reserve * 10_000 / supply`, saturating.
pub fn collateral_ratio_bps(reserve: u64, supply: u64) -> Option<u64> {
    if supply == 0 {
        return None;
    }
    let ratio = (reserve as u128) * 10_000 / (supply as u128);
    Some(u64::try_from(ratio).unwrap_or(u64::MAX))
}

/// 32-hex-char id derived from the given parts.
pub fn derive_record_id(parts: &[&str]) -> String {
    let mut id = sha256_hex(parts.join(":").as_bytes());
    id.truncate(32);
    id
}
