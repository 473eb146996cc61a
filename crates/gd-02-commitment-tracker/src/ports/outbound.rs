//! # Outbound Ports
//!
//! The zero-knowledge soundness check is a swappable black box.

use crate::domain::entities::StarkProof;

/// Proof-system verification contract.
///
/// Called at most once per submission, after structural, nullifier and
/// commitment checks have passed.
pub trait ProofVerifier: Send + Sync {
    fn verify(&self, proof: &StarkProof) -> bool;
}
