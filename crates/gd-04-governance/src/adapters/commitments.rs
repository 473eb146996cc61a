//! [`CommitmentGateway`] over the commitment tracker.

use gd_02_commitment_tracker::{CommitmentError, CommitmentRecord, CommitmentTracker, ProofVerifier};
use shared_types::StagedState;

use crate::ports::outbound::CommitmentGateway;

impl<V: ProofVerifier> CommitmentGateway for CommitmentTracker<V> {
    fn consume(&self, state: &mut StagedState<'_>, commitment: &str) -> Result<CommitmentRecord, CommitmentError> {
        self.consume_in(state, commitment)
    }

    fn settle(&self, commitment: &str) {
        CommitmentTracker::settle(self, commitment)
    }
}
