//! # Key Registry
//!
//! Identifier → public key bindings plus the roles bound to each
//! identifier. The registry is an injected, lock-protected object: each
//! ledger instance owns its own, so several can coexist in one process.
//!
//! Readers (`get`, `roles_of`) run concurrently; `register`, `grant_role`
//! and `revoke_role` take the write lock.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;
use shared_types::{Role, Timestamp};

use crate::domain::entities::{DilithiumPublicKey, KeyInfo, RegisteredKey};
use crate::domain::errors::SignatureError;

#[derive(Default)]
pub struct KeyRegistry {
    keys: RwLock<HashMap<String, RegisteredKey>>,
    roles: RwLock<HashMap<String, BTreeSet<Role>>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `identifier`, replacing any previous key.
    pub fn register(
        &self,
        identifier: &str,
        key: DilithiumPublicKey,
        now: Timestamp,
    ) -> Result<RegisteredKey, SignatureError> {
        if identifier.trim().is_empty() {
            return Err(SignatureError::EmptyIdentifier);
        }
        if identifier.trim() != identifier {
            return Err(SignatureError::InvalidIdentifier(identifier.to_string()));
        }
        key.validate()?;

        let mut keys = self.keys.write();
        let rotation = keys
            .get(identifier)
            .map(|existing| existing.rotation + 1)
            .unwrap_or(0);
        let entry = RegisteredKey {
            identifier: identifier.to_string(),
            key,
            registered_at: now,
            rotation,
        };
        keys.insert(identifier.to_string(), entry.clone());
        Ok(entry)
    }

    pub fn get(&self, identifier: &str) -> Option<RegisteredKey> {
        self.keys.read().get(identifier).cloned()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.keys.read().contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// Bind `role` to a registered identifier.
    pub fn grant_role(&self, identifier: &str, role: Role) -> Result<(), SignatureError> {
        if !self.contains(identifier) {
            return Err(SignatureError::KeyNotFound(identifier.to_string()));
        }
        self.roles
            .write()
            .entry(identifier.to_string())
            .or_default()
            .insert(role);
        Ok(())
    }

    /// Returns whether the role was bound.
    pub fn revoke_role(&self, identifier: &str, role: Role) -> bool {
        self.roles
            .write()
            .get_mut(identifier)
            .map(|set| set.remove(&role))
            .unwrap_or(false)
    }

    pub fn has_role(&self, identifier: &str, role: Role) -> bool {
        self.roles
            .read()
            .get(identifier)
            .is_some_and(|set| set.contains(&role))
    }

    pub fn roles_of(&self, identifier: &str) -> Vec<Role> {
        self.roles
            .read()
            .get(identifier)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// All registered keys, sorted by identifier.
    pub fn list(&self) -> Vec<KeyInfo> {
        let keys = self.keys.read();
        let mut infos: Vec<KeyInfo> = keys
            .values()
            .map(|entry| KeyInfo {
                identifier: entry.identifier.clone(),
                mode: entry.key.mode,
                fingerprint: entry.key.fingerprint(),
                registered_at: entry.registered_at,
                rotation: entry.rotation,
                roles: self.roles_of(&entry.identifier),
            })
            .collect();
        infos.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        infos
    }
}
