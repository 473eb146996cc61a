//! # Signature Verification Subsystem (GD-01)
//!
//! Post-quantum key registry and signature verification for GENUSD.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): key entities, registry and context framing
//! - **Ports Layer** (`ports/`): inbound API, outbound signature scheme
//! - **Adapters** (`adapters/`): `pqcrypto-dilithium` scheme and the
//!   [`shared_types::SignatureGateway`] used by the engines
//! - **Service Layer** (`service.rs`): wires registry and scheme together
//!
//! ## Security Notes
//!
//! - **No implicit default key**: verification always uses the key currently
//!   registered for the named identifier
//! - **Pre-checks**: key and signature lengths are validated against the
//!   declared mode before any cryptography runs
//! - **Domain separation**: privileged call-sites verify under a context tag

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::dilithium::{DilithiumSigner, PqDilithiumScheme};
pub use domain::context::frame_with_context;
pub use domain::entities::{DilithiumMode, DilithiumPublicKey, KeyInfo, RegisteredKey};
pub use domain::errors::SignatureError;
pub use domain::registry::KeyRegistry;
pub use ports::inbound::SignatureVerificationApi;
pub use ports::outbound::SignatureScheme;
pub use service::SignatureVerifier;
