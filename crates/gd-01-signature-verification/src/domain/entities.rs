//! # Key Entities
//!
//! Dilithium security modes and registered public keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use sha3::{Digest, Sha3_256};
use shared_types::{Role, Timestamp};

use crate::domain::errors::SignatureError;

// =============================================================================
// SECURITY MODES
// =============================================================================

/// Dilithium parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DilithiumMode {
    /// NIST level 2.
    Dilithium2,
    /// NIST level 3.
    Dilithium3,
    /// NIST level 5.
    Dilithium5,
}

impl DilithiumMode {
    pub const fn public_key_len(&self) -> usize {
        match self {
            DilithiumMode::Dilithium2 => 1312,
            DilithiumMode::Dilithium3 => 1952,
            DilithiumMode::Dilithium5 => 2592,
        }
    }

    pub const fn signature_len(&self) -> usize {
        match self {
            DilithiumMode::Dilithium2 => 2420,
            DilithiumMode::Dilithium3 => 3293,
            DilithiumMode::Dilithium5 => 4595,
        }
    }

    pub const fn security_level(&self) -> u8 {
        match self {
            DilithiumMode::Dilithium2 => 2,
            DilithiumMode::Dilithium3 => 3,
            DilithiumMode::Dilithium5 => 5,
        }
    }
}

impl Default for DilithiumMode {
    fn default() -> Self {
        DilithiumMode::Dilithium3
    }
}

impl fmt::Display for DilithiumMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dilithium{}", self.security_level())
    }
}

impl FromStr for DilithiumMode {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dilithium2" | "2" => Ok(DilithiumMode::Dilithium2),
            "dilithium3" | "3" => Ok(DilithiumMode::Dilithium3),
            "dilithium5" | "5" => Ok(DilithiumMode::Dilithium5),
            other => Err(SignatureError::UnknownMode(other.to_string())),
        }
    }
}

// =============================================================================
// PUBLIC KEYS
// =============================================================================

/// A public key together with its declared mode.
///
/// Construction checks the byte length against the mode.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DilithiumPublicKey {
    pub mode: DilithiumMode,
    #[serde_as(as = "Hex")]
    pub bytes: Vec<u8>,
}

impl DilithiumPublicKey {
    pub fn new(mode: DilithiumMode, bytes: Vec<u8>) -> Result<Self, SignatureError> {
        let key = Self { mode, bytes };
        key.validate()?;
        Ok(key)
    }

    pub fn from_hex(mode: DilithiumMode, encoded: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(encoded.trim()).map_err(|_| SignatureError::EmptyKey)?;
        Self::new(mode, bytes)
    }

    pub fn validate(&self) -> Result<(), SignatureError> {
        if self.bytes.is_empty() {
            return Err(SignatureError::EmptyKey);
        }
        let expected = self.mode.public_key_len();
        if self.bytes.len() != expected {
            return Err(SignatureError::KeySizeMismatch {
                mode: self.mode,
                expected,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }

    /// Short SHA3 fingerprint for logs and listings.
    pub fn fingerprint(&self) -> String {
        let digest = Sha3_256::digest(&self.bytes);
        hex::encode(&digest[..8])
    }
}

/// A key bound to an identifier in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredKey {
    pub identifier: String,
    pub key: DilithiumPublicKey,
    pub registered_at: Timestamp,
    /// Incremented each time the identifier's key is replaced.
    pub rotation: u32,
}

/// Registry listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    pub identifier: String,
    pub mode: DilithiumMode,
    pub fingerprint: String,
    pub registered_at: Timestamp,
    pub rotation: u32,
    pub roles: Vec<Role>,
}
