//! # Commitment Cache
//!
//! Bounded in-memory mirror of persisted commitment records and known-used
//! nullifiers.
//!
//! ## Rules
//!
//! - Populated only from committed store state.
//! - Writers invalidate before or after they change a record.
//! - Never the sole basis for a rejection: double-spend and double-use
//!   checks always read the store.
//!
//! A positive nullifier hit is final because the nullifier index is
//! append-only.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::RwLock;

use crate::domain::entities::CommitmentRecord;

pub const DEFAULT_CACHE_CAPACITY: usize = 4_096;

pub struct CommitmentCache {
    records: RwLock<LruCache<String, CommitmentRecord>>,
    nullifiers: RwLock<LruCache<String, ()>>,
}

impl CommitmentCache {
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            records: RwLock::new(LruCache::new(cap)),
            nullifiers: RwLock::new(LruCache::new(cap)),
        }
    }

    /// Cached record, without promoting it.
    pub fn record(&self, commitment: &str) -> Option<CommitmentRecord> {
        self.records.read().peek(commitment).cloned()
    }

    pub fn store_record(&self, record: CommitmentRecord) {
        self.records.write().put(record.commitment.clone(), record);
    }

    pub fn invalidate(&self, commitment: &str) {
        self.records.write().pop(commitment);
    }

    pub fn nullifier_known(&self, nullifier: &str) -> bool {
        self.nullifiers.read().contains(nullifier)
    }

    pub fn remember_nullifier(&self, nullifier: &str) {
        self.nullifiers.write().put(nullifier.to_string(), ());
    }

    pub fn clear(&self) {
        self.records.write().clear();
        self.nullifiers.write().clear();
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for CommitmentCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}
