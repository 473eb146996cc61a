//! # Host State Store
//!
//! The key-value store, transaction id and event hook supplied by the host
//! ledger, plus the in-memory adapter used by tests and local runs.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::errors::StoreError;

/// An event emitted through the host's event hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    pub name: String,
    pub payload: Vec<u8>,
}

/// All writes and events produced by one operation.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    pub puts: BTreeMap<String, Vec<u8>>,
    pub events: Vec<HostEvent>,
}

impl WriteBatch {
    pub fn is_empty(&self) -> bool {
        self.puts.is_empty() && self.events.is_empty()
    }
}

/// Key-value state store scoped to one ledger.
///
/// The host runs each top-level operation as one atomic unit; the core
/// submits every write of an operation through [`StateStore::apply`].
pub trait StateStore: Send + Sync {
    /// Read a value, `None` when absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a single value.
    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// All entries whose key starts with `prefix`, in key order.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError>;

    /// Id of the host transaction currently executing.
    fn tx_id(&self) -> String;

    /// Emit a named event through the host.
    fn emit_event(&self, name: &str, payload: Vec<u8>) -> Result<(), StoreError>;

    /// Apply every write and event of one operation.
    ///
    /// Backends with native batching should override this.
    fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        for (key, value) in batch.puts {
            self.put_state(&key, value)?;
        }
        for event in batch.events {
            self.emit_event(&event.name, event.payload)?;
        }
        Ok(())
    }
}

// =============================================================================
// IN-MEMORY ADAPTER
// =============================================================================

/// In-memory store with a settable transaction id.
///
/// Emitted events are kept so tests can assert on them.
pub struct InMemoryStateStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    events: RwLock<Vec<HostEvent>>,
    tx_id: RwLock<String>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            events: RwLock::new(Vec::new()),
            tx_id: RwLock::new("tx-genesis".to_string()),
        }
    }

    /// Set the id returned by [`StateStore::tx_id`] for the next operation.
    pub fn set_tx_id(&self, tx_id: impl Into<String>) {
        *self.tx_id.write() = tx_id.into();
    }

    /// Events emitted so far.
    pub fn events(&self) -> Vec<HostEvent> {
        self.events.read().clone()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Copy of every entry, for before/after comparisons.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.entries.read().clone()
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStateStore {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let entries = self.entries.read();
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn tx_id(&self) -> String {
        self.tx_id.read().clone()
    }

    fn emit_event(&self, name: &str, payload: Vec<u8>) -> Result<(), StoreError> {
        self.events.write().push(HostEvent {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }

    fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        // Both locks held so readers never observe half a batch.
        let mut entries = self.entries.write();
        let mut events = self.events.write();
        entries.extend(batch.puts);
        events.extend(batch.events);
        Ok(())
    }
}
