//! # CRYSTALS-Dilithium Adapter
//!
//! [`SignatureScheme`] over `pqcrypto-dilithium` detached signatures, plus a
//! keypair holder used by genesis tooling and tests.

use pqcrypto_dilithium::{dilithium2, dilithium3, dilithium5};
use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _};

use crate::domain::context::frame_with_context;
use crate::domain::entities::{DilithiumMode, DilithiumPublicKey};
use crate::domain::errors::SignatureError;
use crate::ports::outbound::SignatureScheme;

/// Detached-signature verification with `pqcrypto-dilithium`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PqDilithiumScheme;

impl SignatureScheme for PqDilithiumScheme {
    fn verify(&self, mode: DilithiumMode, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        match mode {
            DilithiumMode::Dilithium2 => {
                let (Ok(pk), Ok(sig)) = (
                    dilithium2::PublicKey::from_bytes(public_key),
                    dilithium2::DetachedSignature::from_bytes(signature),
                ) else {
                    return false;
                };
                dilithium2::verify_detached_signature(&sig, message, &pk).is_ok()
            }
            DilithiumMode::Dilithium3 => {
                let (Ok(pk), Ok(sig)) = (
                    dilithium3::PublicKey::from_bytes(public_key),
                    dilithium3::DetachedSignature::from_bytes(signature),
                ) else {
                    return false;
                };
                dilithium3::verify_detached_signature(&sig, message, &pk).is_ok()
            }
            DilithiumMode::Dilithium5 => {
                let (Ok(pk), Ok(sig)) = (
                    dilithium5::PublicKey::from_bytes(public_key),
                    dilithium5::DetachedSignature::from_bytes(signature),
                ) else {
                    return false;
                };
                dilithium5::verify_detached_signature(&sig, message, &pk).is_ok()
            }
        }
    }
}

// =============================================================================
// SIGNER
// =============================================================================

enum SecretMaterial {
    D2(dilithium2::SecretKey),
    D3(dilithium3::SecretKey),
    D5(dilithium5::SecretKey),
}

/// A freshly generated Dilithium keypair.
pub struct DilithiumSigner {
    public_key: DilithiumPublicKey,
    secret: SecretMaterial,
}

impl DilithiumSigner {
    pub fn generate(mode: DilithiumMode) -> Self {
        let (public_bytes, secret) = match mode {
            DilithiumMode::Dilithium2 => {
                let (pk, sk) = dilithium2::keypair();
                (pk.as_bytes().to_vec(), SecretMaterial::D2(sk))
            }
            DilithiumMode::Dilithium3 => {
                let (pk, sk) = dilithium3::keypair();
                (pk.as_bytes().to_vec(), SecretMaterial::D3(sk))
            }
            DilithiumMode::Dilithium5 => {
                let (pk, sk) = dilithium5::keypair();
                (pk.as_bytes().to_vec(), SecretMaterial::D5(sk))
            }
        };
        Self {
            public_key: DilithiumPublicKey {
                mode,
                bytes: public_bytes,
            },
            secret,
        }
    }

    pub fn mode(&self) -> DilithiumMode {
        self.public_key.mode
    }

    pub fn public_key(&self) -> DilithiumPublicKey {
        self.public_key.clone()
    }

    /// Detached signature over `message`.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match &self.secret {
            SecretMaterial::D2(sk) => dilithium2::detached_sign(message, sk).as_bytes().to_vec(),
            SecretMaterial::D3(sk) => dilithium3::detached_sign(message, sk).as_bytes().to_vec(),
            SecretMaterial::D5(sk) => dilithium5::detached_sign(message, sk).as_bytes().to_vec(),
        }
    }

    /// Signature that verifies under `verify_with_context(.., context)`.
    pub fn sign_with_context(&self, message: &[u8], context: &[u8]) -> Result<Vec<u8>, SignatureError> {
        Ok(self.sign(&frame_with_context(message, context)?))
    }
}

impl std::fmt::Debug for DilithiumSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DilithiumSigner")
            .field("mode", &self.public_key.mode)
            .field("fingerprint", &self.public_key.fingerprint())
            .finish_non_exhaustive()
    }
}
