//! # Genesis Keys
//!
//! `{identifier, mode, public_key_hex, roles}` entries registered with the
//! signature verifier before the first request is dispatched.

use std::collections::HashSet;
use std::env;
use std::fs;

use gd_01_signature_verification::{
    DilithiumMode, DilithiumPublicKey, KeyInfo, SignatureError, SignatureVerificationApi,
};
use serde::{Deserialize, Serialize};
use shared_types::Role;
use tracing::info;

use crate::errors::RuntimeError;

/// One identity provisioned at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisKey {
    pub identifier: String,
    pub mode: DilithiumMode,
    pub public_key_hex: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Genesis key set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    #[serde(default)]
    pub keys: Vec<GenesisKey>,
}

impl GenesisConfig {
    pub fn from_json(json: &str) -> Result<Self, RuntimeError> {
        serde_json::from_str(json).map_err(|e| RuntimeError::Config(format!("genesis: {e}")))
    }

    /// Load from the file named by `GENUSD_GENESIS_FILE`, or an empty set.
    pub fn from_env() -> Result<Self, RuntimeError> {
        match env::var("GENUSD_GENESIS_FILE") {
            Ok(path) => {
                let json = fs::read_to_string(&path)
                    .map_err(|e| RuntimeError::Config(format!("genesis file {path}: {e}")))?;
                Self::from_json(&json)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.keys.iter().any(|k| k.identifier == identifier)
    }

    /// Identifiers must be non-empty and unique.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        let mut seen = HashSet::new();
        for key in &self.keys {
            if key.identifier.trim().is_empty() {
                return Err(RuntimeError::Config("genesis key with empty identifier".into()));
            }
            if !seen.insert(key.identifier.as_str()) {
                return Err(RuntimeError::Config(format!(
                    "genesis key {} listed twice",
                    key.identifier
                )));
            }
        }
        Ok(())
    }

    /// Register every key and bind its roles.
    pub fn register(&self, verifier: &dyn SignatureVerificationApi) -> Result<Vec<KeyInfo>, RuntimeError> {
        self.validate()?;
        let mut registered = Vec::with_capacity(self.keys.len());
        for entry in &self.keys {
            let genesis_err = |source: SignatureError| RuntimeError::Genesis {
                identifier: entry.identifier.clone(),
                source,
            };
            let key = DilithiumPublicKey::from_hex(entry.mode, &entry.public_key_hex).map_err(genesis_err)?;
            verifier.register_key(&entry.identifier, key).map_err(genesis_err)?;
            for role in &entry.roles {
                verifier.grant_role(&entry.identifier, *role).map_err(genesis_err)?;
            }
            // Re-read so the listing reflects the granted roles.
            if let Some(info) = verifier.get_key(&entry.identifier) {
                info!(
                    identifier = %info.identifier,
                    mode = %info.mode,
                    fingerprint = %info.fingerprint,
                    roles = ?info.roles,
                    "Genesis key registered"
                );
                registered.push(info);
            }
        }
        Ok(registered)
    }
}
