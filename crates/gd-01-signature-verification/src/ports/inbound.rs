//! # Inbound Ports (Driving Ports / API)
//!
//! Public API of the signature verifier.

use shared_types::Role;

use crate::domain::entities::{DilithiumPublicKey, KeyInfo};
use crate::domain::errors::SignatureError;

/// Primary Signature Verification API.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait SignatureVerificationApi: Send + Sync {
    // =========================================================================
    // Registry
    // =========================================================================

    /// Bind a public key to an identifier (genesis or key rotation).
    ///
    /// # Errors
    /// - `EmptyIdentifier`, `InvalidIdentifier`, `EmptyKey`, `KeySizeMismatch`
    fn register_key(&self, identifier: &str, key: DilithiumPublicKey) -> Result<KeyInfo, SignatureError>;

    /// Bind a role to a registered identifier.
    fn grant_role(&self, identifier: &str, role: Role) -> Result<(), SignatureError>;

    /// Remove a role binding. Returns whether it was bound.
    fn revoke_role(&self, identifier: &str, role: Role) -> bool;

    fn roles_of(&self, identifier: &str) -> Vec<Role>;

    fn get_key(&self, identifier: &str) -> Option<KeyInfo>;

    fn list_keys(&self) -> Vec<KeyInfo>;

    // =========================================================================
    // Verification
    // =========================================================================

    /// Verify `signature` over `message` against the key registered for
    /// `identifier`.
    ///
    /// # Errors
    /// - `KeyNotFound` when nothing is registered
    /// - `FormatError` when key or signature length is wrong for the mode
    /// - `SignatureInvalid` when the scheme rejects the signature
    fn verify(&self, message: &[u8], signature: &[u8], identifier: &str) -> Result<(), SignatureError>;

    /// As [`SignatureVerificationApi::verify`], with `context` appended to the
    /// message so a signature for one call-site never verifies at another.
    fn verify_with_context(
        &self,
        message: &[u8],
        signature: &[u8],
        identifier: &str,
        context: &[u8],
    ) -> Result<(), SignatureError>;

    /// Role check first, then context-bound verification.
    fn verify_role(
        &self,
        message: &[u8],
        signature: &[u8],
        identifier: &str,
        role: Role,
        context: &[u8],
    ) -> Result<(), SignatureError>;
}
