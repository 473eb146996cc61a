//! # Inbound Ports (API)

use crate::domain::entities::{CommitmentRecord, NullifierAudit, StarkProof};
use crate::domain::errors::CommitmentError;

pub trait CommitmentTrackerApi: Send + Sync {
    /// Validate a proof and persist its commitment and nullifier.
    ///
    /// # Errors
    /// - `Missing*` for structurally empty proofs
    /// - `NullifierReused` when the nullifier was seen before
    /// - `CommitmentExists` when the commitment was stored before
    /// - `CommitmentMismatch` when the commitment does not match its inputs
    /// - `ProofRejected` when the proof verifier says no
    fn verify_and_store(&self, proof: &StarkProof) -> Result<CommitmentRecord, CommitmentError>;

    fn get_commitment(&self, commitment: &str) -> Result<CommitmentRecord, CommitmentError>;

    fn is_nullifier_used(&self, nullifier: &str) -> Result<bool, CommitmentError>;

    /// Flag a stored commitment as consumed by `tx_id`.
    ///
    /// # Errors
    /// - `NotFound`, `AlreadyUsed`
    fn mark_commitment_used(&self, commitment: &str, tx_id: &str) -> Result<CommitmentRecord, CommitmentError>;

    /// Cross-check the nullifier index against stored commitments.
    fn audit_nullifiers(&self) -> Result<NullifierAudit, CommitmentError>;
}
