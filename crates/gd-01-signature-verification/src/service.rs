//! # Signature Verification Service
//!
//! Application service implementing [`SignatureVerificationApi`].
//!
//! ## Architecture
//!
//! - Holds the injected [`KeyRegistry`] (shared via `Arc`)
//! - Delegates the cryptographic check to the outbound [`SignatureScheme`]
//! - Reports registry changes to the audit sink

use std::sync::Arc;

use shared_types::{AuditEvent, AuditEventType, AuditSink, Role, TimeSource};
use tracing::{debug, info, warn};

use crate::domain::context::frame_with_context;
use crate::domain::entities::{DilithiumPublicKey, KeyInfo};
use crate::domain::errors::SignatureError;
use crate::domain::registry::KeyRegistry;
use crate::ports::inbound::SignatureVerificationApi;
use crate::ports::outbound::SignatureScheme;

/// Signature verifier over a key registry and a signature scheme.
pub struct SignatureVerifier<S: SignatureScheme> {
    registry: Arc<KeyRegistry>,
    scheme: S,
    clock: Arc<dyn TimeSource>,
    audit: Arc<dyn AuditSink>,
}

impl<S: SignatureScheme> SignatureVerifier<S> {
    pub fn new(
        registry: Arc<KeyRegistry>,
        scheme: S,
        clock: Arc<dyn TimeSource>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            registry,
            scheme,
            clock,
            audit,
        }
    }

    pub fn registry(&self) -> &Arc<KeyRegistry> {
        &self.registry
    }

    fn audit_registry_change(&self, action: &str, identifier: &str, outcome: &Result<(), SignatureError>, detail: String) {
        let event = AuditEvent::new(
            AuditEventType::KeyRegistry,
            action,
            "registry",
            identifier,
            self.clock.now(),
            String::new(),
        )
        .param("detail", detail)
        .with_outcome(outcome);
        self.audit.log_event(event);
    }

    fn info_for(&self, identifier: &str) -> Option<KeyInfo> {
        self.registry
            .list()
            .into_iter()
            .find(|info| info.identifier == identifier)
    }
}

impl<S: SignatureScheme> SignatureVerificationApi for SignatureVerifier<S> {
    fn register_key(&self, identifier: &str, key: DilithiumPublicKey) -> Result<KeyInfo, SignatureError> {
        let mode = key.mode;
        let result = self.registry.register(identifier, key, self.clock.now());
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.audit_registry_change("REGISTER_KEY", identifier, &outcome, mode.to_string());

        let entry = result?;
        info!(
            identifier = %entry.identifier,
            mode = %entry.key.mode,
            rotation = entry.rotation,
            fingerprint = %entry.key.fingerprint(),
            "Registered signing key"
        );
        self.info_for(&entry.identifier)
            .ok_or_else(|| SignatureError::KeyNotFound(entry.identifier.clone()))
    }

    fn grant_role(&self, identifier: &str, role: Role) -> Result<(), SignatureError> {
        let outcome = self.registry.grant_role(identifier, role);
        self.audit_registry_change("GRANT_ROLE", identifier, &outcome, role.to_string());
        if outcome.is_ok() {
            info!(identifier, %role, "Granted role");
        }
        outcome
    }

    fn revoke_role(&self, identifier: &str, role: Role) -> bool {
        let removed = self.registry.revoke_role(identifier, role);
        let outcome = if removed {
            Ok(())
        } else {
            Err(SignatureError::RoleNotBound {
                identifier: identifier.to_string(),
                role,
            })
        };
        self.audit_registry_change("REVOKE_ROLE", identifier, &outcome, role.to_string());
        if removed {
            info!(identifier, %role, "Revoked role");
        }
        removed
    }

    fn roles_of(&self, identifier: &str) -> Vec<Role> {
        self.registry.roles_of(identifier)
    }

    fn get_key(&self, identifier: &str) -> Option<KeyInfo> {
        self.info_for(identifier)
    }

    fn list_keys(&self) -> Vec<KeyInfo> {
        self.registry.list()
    }

    fn verify(&self, message: &[u8], signature: &[u8], identifier: &str) -> Result<(), SignatureError> {
        let entry = self
            .registry
            .get(identifier)
            .ok_or_else(|| SignatureError::KeyNotFound(identifier.to_string()))?;
        let mode = entry.key.mode;

        // Cheap length checks before the expensive verification.
        if entry.key.bytes.len() != mode.public_key_len() {
            return Err(SignatureError::FormatError {
                what: "public key",
                mode,
                expected: mode.public_key_len(),
                actual: entry.key.bytes.len(),
            });
        }
        if signature.len() != mode.signature_len() {
            return Err(SignatureError::FormatError {
                what: "signature",
                mode,
                expected: mode.signature_len(),
                actual: signature.len(),
            });
        }

        if self.scheme.verify(mode, &entry.key.bytes, message, signature) {
            debug!(identifier, %mode, "Signature verified");
            Ok(())
        } else {
            warn!(identifier, %mode, "Signature rejected");
            Err(SignatureError::SignatureInvalid(identifier.to_string()))
        }
    }

    fn verify_with_context(
        &self,
        message: &[u8],
        signature: &[u8],
        identifier: &str,
        context: &[u8],
    ) -> Result<(), SignatureError> {
        let framed = frame_with_context(message, context)?;
        self.verify(&framed, signature, identifier)
    }

    fn verify_role(
        &self,
        message: &[u8],
        signature: &[u8],
        identifier: &str,
        role: Role,
        context: &[u8],
    ) -> Result<(), SignatureError> {
        if !self.registry.has_role(identifier, role) {
            warn!(identifier, %role, "Role check failed");
            return Err(SignatureError::RoleNotBound {
                identifier: identifier.to_string(),
                role,
            });
        }
        self.verify_with_context(message, signature, identifier, context)
    }
}
