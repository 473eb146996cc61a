//! Test utilities for the engines.
//!
//! Enable with the `test-utils` feature flag.
//!
//! [`DigestGateway`] stands in for the post-quantum verifier: a signature
//! is the SHA3 digest of signer, context and message, so tests can sign
//! without key generation while still binding every field.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;
use sha3::{Digest, Sha3_256};

use crate::authority::SignatureGateway;
use crate::errors::AuthorityError;
use crate::roles::Role;

/// Signature [`DigestGateway`] accepts for `signer` over `message` in `context`.
pub fn digest_sign(signer: &str, message: &[u8], context: &str) -> Vec<u8> {
    let mut hasher = Sha3_256::new();
    hasher.update(signer.as_bytes());
    hasher.update([0u8]);
    hasher.update(context.as_bytes());
    hasher.update([0u8]);
    hasher.update(message);
    hasher.finalize().to_vec()
}

#[derive(Default)]
pub struct DigestGateway {
    identities: RwLock<HashMap<String, BTreeSet<Role>>>,
}

impl DigestGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `signer` with `roles`.
    pub fn with_identity(self, signer: &str, roles: &[Role]) -> Self {
        self.identities
            .write()
            .insert(signer.to_string(), roles.iter().copied().collect());
        self
    }

    pub fn revoke(&self, signer: &str, role: Role) {
        if let Some(roles) = self.identities.write().get_mut(signer) {
            roles.remove(&role);
        }
    }
}

impl SignatureGateway for DigestGateway {
    fn verify_with_context(
        &self,
        message: &[u8],
        signature: &[u8],
        signer: &str,
        context: &str,
    ) -> Result<(), AuthorityError> {
        if !self.identities.read().contains_key(signer) {
            return Err(AuthorityError::SignatureRejected {
                signer: signer.to_string(),
                reason: "unknown signer".to_string(),
            });
        }
        if digest_sign(signer, message, context) != signature {
            return Err(AuthorityError::SignatureRejected {
                signer: signer.to_string(),
                reason: "digest mismatch".to_string(),
            });
        }
        Ok(())
    }

    fn verify_role(
        &self,
        message: &[u8],
        signature: &[u8],
        signer: &str,
        role: Role,
        context: &str,
    ) -> Result<(), AuthorityError> {
        let bound = self
            .identities
            .read()
            .get(signer)
            .is_some_and(|roles| roles.contains(&role));
        if !bound {
            return Err(AuthorityError::RoleNotBound {
                signer: signer.to_string(),
                role: role.to_string(),
            });
        }
        self.verify_with_context(message, signature, signer, context)
    }

    fn roles_of(&self, signer: &str) -> Vec<Role> {
        self.identities
            .read()
            .get(signer)
            .map(|roles| roles.iter().copied().collect())
            .unwrap_or_default()
    }
}
