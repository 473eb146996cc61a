//! # Transcript-Binding Proof System
//!
//! Reference [`ProofVerifier`] that accepts a proof only when its bytes are
//! the SHA3 transcript digest of its commitment, nullifier and public
//! inputs. It establishes binding, not zero-knowledge soundness; a real
//! STARK verifier slots in behind the same port.

use sha3::{Digest, Sha3_256};
use shared_types::Timestamp;

use crate::domain::commitment::compute_commitment;
use crate::domain::entities::{ProofMetadata, StarkProof};
use crate::ports::outbound::ProofVerifier;

const TRANSCRIPT_DOMAIN: &[u8] = b"STARK_TRANSCRIPT_V1";

fn transcript_digest(commitment: &str, nullifier: &str, public_inputs: &[String]) -> Vec<u8> {
    let mut hasher = Sha3_256::new();
    hasher.update(TRANSCRIPT_DOMAIN);
    hasher.update((commitment.len() as u32).to_be_bytes());
    hasher.update(commitment.as_bytes());
    hasher.update((nullifier.len() as u32).to_be_bytes());
    hasher.update(nullifier.as_bytes());
    for input in public_inputs {
        hasher.update((input.len() as u32).to_be_bytes());
        hasher.update(input.as_bytes());
    }
    hasher.finalize().to_vec()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptVerifier;

impl ProofVerifier for TranscriptVerifier {
    fn verify(&self, proof: &StarkProof) -> bool {
        proof.proof_bytes == transcript_digest(&proof.commitment, &proof.nullifier, &proof.public_inputs)
    }
}

/// Produces proofs [`TranscriptVerifier`] accepts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptProver;

impl TranscriptProver {
    pub fn prove(&self, public_inputs: Vec<String>, nullifier: &str, timestamp: Timestamp) -> StarkProof {
        let commitment = compute_commitment(&public_inputs, nullifier);
        let proof_bytes = transcript_digest(&commitment, nullifier, &public_inputs);
        StarkProof {
            proof_bytes,
            public_inputs,
            commitment,
            nullifier: nullifier.to_string(),
            proof_metadata: Some(ProofMetadata {
                proof_system: "transcript".to_string(),
                security_level: 128,
                version: "v1".to_string(),
            }),
            timestamp,
        }
    }
}
