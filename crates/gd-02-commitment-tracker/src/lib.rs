//! # Commitment Tracker Subsystem (GD-02)
//!
//! Zero-knowledge anti-replay bookkeeping: each accepted proof leaves a
//! commitment record and a nullifier index entry in the host store, and no
//! nullifier or commitment is ever accepted twice.
//!
//! ## Verify-and-store order
//!
//! | Step | Check | Failure |
//! |------|-------|---------|
//! | 1 | proof bytes, commitment, nullifier non-empty | `Missing*` |
//! | 2 | nullifier not indexed | `NullifierReused` |
//! | 3 | commitment not stored | `CommitmentExists` |
//! | 4 | commitment recomputes from inputs | `CommitmentMismatch` |
//! | 5 | [`ProofVerifier`] accepts (single call) | `ProofRejected` |
//! | 6 | persist record + nullifier, emit `CommitmentStored` | |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::transcript::{TranscriptProver, TranscriptVerifier};
pub use domain::cache::CommitmentCache;
pub use domain::commitment::compute_commitment;
pub use domain::entities::{CommitmentRecord, NullifierAudit, ProofMetadata, StarkProof};
pub use domain::errors::CommitmentError;
pub use ports::inbound::CommitmentTrackerApi;
pub use ports::outbound::ProofVerifier;
pub use service::CommitmentTracker;
