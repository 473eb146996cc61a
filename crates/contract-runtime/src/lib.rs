//! # GENUSD Contract Runtime
//!
//! Wires the four engines over the host ledger's state store and exposes
//! the request dispatcher the host invokes once per transaction.
//!
//! ## Layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`container`] | [`RuntimeConfig`] and engine construction ([`GenusdServices`]) |
//! | [`genesis`] | Start-up key registration |
//! | [`handlers`] | Operation names, payloads, request signatures, [`GenusdContract`] |
//!
//! ## Request Flow
//!
//! ```text
//! ContractRequest ──▶ GenusdContract::handle ──▶ engine (staged, one commit)
//!                                          └──▶ ContractResponse {success, data|error}
//! ```

pub mod container;
pub mod errors;
pub mod genesis;
pub mod handlers;

pub use container::{GenusdServices, RuntimeConfig, RuntimeDependencies};
pub use errors::RuntimeError;
pub use genesis::{GenesisConfig, GenesisKey};
pub use handlers::{request_message, GenusdContract, Operation, REQUEST_CONTEXT};
