//! Commitment derivation and structural checks.

use sha3::{Digest, Sha3_256};

use crate::domain::entities::StarkProof;
use crate::domain::errors::CommitmentError;

pub const COMMITMENT_DOMAIN: &[u8] = b"STARK_COMMITMENT_V1";

/// `hex(sha3_256("STARK_COMMITMENT_V1" || inputs... || nullifier))`.
///
/// Inputs are concatenated without separators; existing stored commitments
/// were derived this way.
pub fn compute_commitment(public_inputs: &[String], nullifier: &str) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update(COMMITMENT_DOMAIN);
    for input in public_inputs {
        hasher.update(input.as_bytes());
    }
    hasher.update(nullifier.as_bytes());
    hex::encode(hasher.finalize())
}

/// Non-empty proof bytes, commitment and nullifier.
pub fn validate_structure(proof: &StarkProof) -> Result<(), CommitmentError> {
    if proof.proof_bytes.is_empty() {
        return Err(CommitmentError::MissingProofBytes);
    }
    if proof.commitment.trim().is_empty() {
        return Err(CommitmentError::MissingCommitment);
    }
    if proof.nullifier.trim().is_empty() {
        return Err(CommitmentError::MissingNullifier);
    }
    Ok(())
}

/// Fails when the supplied commitment is not the one the inputs imply.
pub fn check_commitment(proof: &StarkProof) -> Result<(), CommitmentError> {
    let expected = compute_commitment(&proof.public_inputs, &proof.nullifier);
    if expected != proof.commitment {
        return Err(CommitmentError::CommitmentMismatch {
            supplied: proof.commitment.clone(),
            expected,
        });
    }
    Ok(())
}
