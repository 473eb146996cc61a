//! # Signature Gateway
//!
//! Outbound port through which the ledger and governance engines reach the
//! signature verifier. Every privileged call names the context it signs
//! under so a signature for one call-site never verifies at another.

use crate::errors::AuthorityError;
use crate::roles::Role;

pub trait SignatureGateway: Send + Sync {
    /// Verify `signature` by `signer` over `message` framed with `context`.
    fn verify_with_context(
        &self,
        message: &[u8],
        signature: &[u8],
        signer: &str,
        context: &str,
    ) -> Result<(), AuthorityError>;

    /// Check `signer` holds `role`, then verify as above.
    fn verify_role(
        &self,
        message: &[u8],
        signature: &[u8],
        signer: &str,
        role: Role,
        context: &str,
    ) -> Result<(), AuthorityError>;

    /// Roles currently bound to `signer`.
    fn roles_of(&self, signer: &str) -> Vec<Role>;
}
