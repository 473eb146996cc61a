//! # Outbound Ports (Driven Ports)
//!
//! The cryptographic primitive is a black box behind [`SignatureScheme`].
//! Size and format checks happen before it is called.

use crate::domain::entities::DilithiumMode;

/// Underlying signature-scheme verification function.
pub trait SignatureScheme: Send + Sync {
    /// Returns `true` only for a valid signature by `public_key` over `message`.
    fn verify(&self, mode: DilithiumMode, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool;
}
