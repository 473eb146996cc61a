//! # Staged State
//!
//! Write overlay for one operation. Reads see the operation's own writes;
//! nothing reaches the host store until [`StagedState::commit`]. Dropping a
//! staged state discards every write, which is how failed operations leave
//! no visible change.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::StoreError;
use crate::store::{HostEvent, StateStore, WriteBatch};

pub struct StagedState<'a> {
    store: &'a dyn StateStore,
    tx_id: String,
    batch: WriteBatch,
}

impl<'a> StagedState<'a> {
    /// Begin an operation against `store`, capturing its transaction id.
    pub fn begin(store: &'a dyn StateStore) -> Self {
        Self {
            tx_id: store.tx_id(),
            store,
            batch: WriteBatch::default(),
        }
    }

    /// Host transaction id for this operation.
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(value) = self.batch.puts.get(key) {
            return Ok(Some(value.clone()));
        }
        self.store.get_state(key)
    }

    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.batch.puts.insert(key.into(), value);
    }

    /// Store entries under `prefix` merged with staged writes, in key order.
    pub fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let mut merged: BTreeMap<String, Vec<u8>> =
            self.store.scan_prefix(prefix)?.into_iter().collect();
        for (key, value) in &self.batch.puts {
            if key.starts_with(prefix) {
                merged.insert(key.clone(), value.clone());
            }
        }
        Ok(merged.into_iter().collect())
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key)? {
            Some(bytes) => decode(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    pub fn put_json<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<(), StoreError> {
        let key = key.into();
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::Encode {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.put(key, bytes);
        Ok(())
    }

    /// Decode every record under `prefix`.
    pub fn scan_json<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, StoreError> {
        self.scan_prefix(prefix)?
            .iter()
            .map(|(key, bytes)| decode(key, bytes))
            .collect()
    }

    /// Queue a host event; emitted only on commit.
    pub fn emit<T: Serialize>(&mut self, name: &str, payload: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(payload).map_err(|e| StoreError::Encode {
            key: name.to_string(),
            reason: e.to_string(),
        })?;
        self.batch.events.push(HostEvent {
            name: name.to_string(),
            payload: bytes,
        });
        Ok(())
    }

    /// Hand every staged write and event to the host store.
    pub fn commit(self) -> Result<(), StoreError> {
        if self.batch.is_empty() {
            return Ok(());
        }
        tracing::trace!(
            tx_id = %self.tx_id,
            writes = self.batch.puts.len(),
            events = self.batch.events.len(),
            "committing staged state"
        );
        self.store.apply(self.batch)
    }
}

/// Decode a stored JSON record.
pub fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Result<T, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
