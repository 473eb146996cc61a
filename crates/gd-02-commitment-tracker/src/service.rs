//! # Commitment Tracker Service
//!
//! Verify-and-store for zero-knowledge proofs with global nullifier
//! uniqueness. All rejections are decided against the host store; the cache
//! only speeds up repeated reads.

use std::collections::BTreeSet;
use std::sync::Arc;

use shared_types::keys::{self, COMMITMENT_PREFIX, NULLIFIER_PREFIX};
use shared_types::{
    AuditEvent, AuditEventType, AuditSink, Categorized, StagedState, StateStore, TimeSource,
};
use tracing::{error, info, warn};

use crate::domain::cache::CommitmentCache;
use crate::domain::commitment::{check_commitment, validate_structure};
use crate::domain::entities::{CommitmentRecord, NullifierAudit, NullifierEntry, StarkProof};
use crate::domain::errors::CommitmentError;
use crate::ports::inbound::CommitmentTrackerApi;
use crate::ports::outbound::ProofVerifier;

pub const COMMITMENT_STORED_EVENT: &str = "CommitmentStored";

pub struct CommitmentTracker<V: ProofVerifier> {
    store: Arc<dyn StateStore>,
    verifier: V,
    cache: CommitmentCache,
    clock: Arc<dyn TimeSource>,
    audit: Arc<dyn AuditSink>,
}

impl<V: ProofVerifier> CommitmentTracker<V> {
    pub fn new(
        store: Arc<dyn StateStore>,
        verifier: V,
        clock: Arc<dyn TimeSource>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            store,
            verifier,
            cache: CommitmentCache::default(),
            clock,
            audit,
        }
    }

    pub fn with_cache(mut self, cache: CommitmentCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &CommitmentCache {
        &self.cache
    }

    /// Mark `commitment` used inside an operation owned by another engine.
    ///
    /// The consuming transaction is the staged state's. The caller runs
    /// [`settle`](Self::settle) once that state has committed.
    pub fn consume_in(
        &self,
        state: &mut StagedState<'_>,
        commitment: &str,
    ) -> Result<CommitmentRecord, CommitmentError> {
        let mut record = state
            .get_json::<CommitmentRecord>(&keys::commitment_key(commitment))?
            .ok_or_else(|| CommitmentError::NotFound(commitment.to_string()))?;
        if record.used {
            return Err(CommitmentError::AlreadyUsed(commitment.to_string()));
        }
        record.used = true;
        record.transaction_id = state.tx_id().to_string();
        state.put_json(keys::commitment_key(commitment), &record)?;
        Ok(record)
    }

    /// Drop the cached record of a commitment consumed by a committed
    /// transaction so later reads go to the store.
    pub fn settle(&self, commitment: &str) {
        self.cache.invalidate(commitment);
    }

    fn store_verified(&self, proof: &StarkProof) -> Result<CommitmentRecord, CommitmentError> {
        validate_structure(proof)?;

        let mut state = StagedState::begin(self.store.as_ref());

        // Authoritative reads; the cache is not consulted here.
        if state.get(&keys::nullifier_key(&proof.nullifier))?.is_some() {
            return Err(CommitmentError::NullifierReused(proof.nullifier.clone()));
        }
        if state.get(&keys::commitment_key(&proof.commitment))?.is_some() {
            return Err(CommitmentError::CommitmentExists(proof.commitment.clone()));
        }

        check_commitment(proof)?;

        if !self.verifier.verify(proof) {
            return Err(CommitmentError::ProofRejected(proof.commitment.clone()));
        }

        let record = CommitmentRecord {
            commitment: proof.commitment.clone(),
            nullifier: proof.nullifier.clone(),
            timestamp: self.clock.now(),
            used: false,
            transaction_id: state.tx_id().to_string(),
        };
        let entry = NullifierEntry {
            commitment: record.commitment.clone(),
            transaction_id: record.transaction_id.clone(),
        };
        state.put_json(keys::commitment_key(&record.commitment), &record)?;
        state.put_json(keys::nullifier_key(&record.nullifier), &entry)?;
        state.emit(
            COMMITMENT_STORED_EVENT,
            &serde_json::json!({
                "commitment": record.commitment,
                "nullifier": record.nullifier,
                "timestamp": record.timestamp,
            }),
        )?;
        state.commit()?;

        self.cache.store_record(record.clone());
        self.cache.remember_nullifier(&record.nullifier);
        Ok(record)
    }

    fn report(&self, action: &str, target: &str, tx_id: &str, outcome: &Result<CommitmentRecord, CommitmentError>) {
        let event = AuditEvent::new(
            AuditEventType::ZkVerify,
            action,
            "zk-verifier",
            target,
            self.clock.now(),
            tx_id,
        )
        .with_outcome(outcome);
        self.audit.log_event(event);
    }
}

impl<V: ProofVerifier> CommitmentTrackerApi for CommitmentTracker<V> {
    fn verify_and_store(&self, proof: &StarkProof) -> Result<CommitmentRecord, CommitmentError> {
        let tx_id = self.store.tx_id();
        let outcome = self.store_verified(proof);
        self.report("VERIFY_AND_STORE", &proof.commitment, &tx_id, &outcome);

        match &outcome {
            Ok(record) => info!(
                commitment = %record.commitment,
                tx_id = %record.transaction_id,
                "Stored proof commitment"
            ),
            Err(e) if e.category().is_security_relevant() => error!(
                commitment = %proof.commitment,
                nullifier = %proof.nullifier,
                error = %e,
                "Proof rejected: possible replay"
            ),
            Err(e) => warn!(commitment = %proof.commitment, error = %e, "Proof rejected"),
        }
        outcome
    }

    fn get_commitment(&self, commitment: &str) -> Result<CommitmentRecord, CommitmentError> {
        if let Some(record) = self.cache.record(commitment) {
            return Ok(record);
        }
        let state = StagedState::begin(self.store.as_ref());
        let record = state
            .get_json::<CommitmentRecord>(&keys::commitment_key(commitment))?
            .ok_or_else(|| CommitmentError::NotFound(commitment.to_string()))?;
        self.cache.store_record(record.clone());
        Ok(record)
    }

    fn is_nullifier_used(&self, nullifier: &str) -> Result<bool, CommitmentError> {
        if self.cache.nullifier_known(nullifier) {
            return Ok(true);
        }
        let used = self.store.get_state(&keys::nullifier_key(nullifier))?.is_some();
        if used {
            self.cache.remember_nullifier(nullifier);
        }
        Ok(used)
    }

    fn mark_commitment_used(&self, commitment: &str, tx_id: &str) -> Result<CommitmentRecord, CommitmentError> {
        let mut state = StagedState::begin(self.store.as_ref());
        let outcome = self.consume_in(&mut state, commitment).and_then(|mut record| {
            // Caller names the consuming transaction explicitly.
            record.transaction_id = tx_id.to_string();
            state.put_json(keys::commitment_key(commitment), &record)?;
            Ok(record)
        });
        let outcome = outcome.and_then(|record| {
            state.commit()?;
            self.settle(commitment);
            Ok(record)
        });
        self.report("MARK_COMMITMENT_USED", commitment, tx_id, &outcome);
        outcome
    }

    fn audit_nullifiers(&self) -> Result<NullifierAudit, CommitmentError> {
        let state = StagedState::begin(self.store.as_ref());
        let records: Vec<CommitmentRecord> = state.scan_json(COMMITMENT_PREFIX)?;
        let indexed: BTreeSet<String> = state
            .scan_prefix(NULLIFIER_PREFIX)?
            .into_iter()
            .map(|(key, _)| key[NULLIFIER_PREFIX.len()..].to_string())
            .collect();
        let carried: BTreeSet<&str> = records.iter().map(|r| r.nullifier.as_str()).collect();

        let audit = NullifierAudit {
            commitments: records.len(),
            nullifiers: indexed.len(),
            unreferenced: indexed
                .iter()
                .filter(|n| !carried.contains(n.as_str()))
                .cloned()
                .collect(),
            unindexed: records
                .iter()
                .filter(|r| !indexed.contains(&r.nullifier))
                .map(|r| r.commitment.clone())
                .collect(),
        };
        if !audit.is_consistent() {
            error!(
                unreferenced = audit.unreferenced.len(),
                unindexed = audit.unindexed.len(),
                "Nullifier index inconsistent with commitments"
            );
        }
        Ok(audit)
    }
}
