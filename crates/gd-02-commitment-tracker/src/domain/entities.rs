//! # Proof and Commitment Entities

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::Timestamp;

/// Descriptive metadata attached by the prover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofMetadata {
    pub proof_system: String,
    pub security_level: u32,
    pub version: String,
}

/// A submitted zero-knowledge proof.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarkProof {
    #[serde_as(as = "Hex")]
    pub proof_bytes: Vec<u8>,
    #[serde(default)]
    pub public_inputs: Vec<String>,
    pub commitment: String,
    pub nullifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_metadata: Option<ProofMetadata>,
    #[serde(default)]
    pub timestamp: Timestamp,
}

/// Persisted at `COMMITMENT_{commitment}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentRecord {
    pub commitment: String,
    pub nullifier: String,
    pub timestamp: Timestamp,
    pub used: bool,
    /// Transaction that stored the commitment, then the one that consumed it.
    pub transaction_id: String,
}

/// Persisted at `NULLIFIER_{nullifier}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullifierEntry {
    pub commitment: String,
    pub transaction_id: String,
}

/// Result of cross-checking the nullifier index against stored commitments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullifierAudit {
    pub commitments: usize,
    pub nullifiers: usize,
    /// Nullifiers with no commitment record carrying them.
    pub unreferenced: Vec<String>,
    /// Commitments whose nullifier is missing from the index.
    pub unindexed: Vec<String>,
}

impl NullifierAudit {
    pub fn is_consistent(&self) -> bool {
        self.unreferenced.is_empty() && self.unindexed.is_empty()
    }
}
