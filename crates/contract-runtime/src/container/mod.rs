//! # Engine Container
//!
//! Holds the engine instances wired over one host store.
//!
//! ## Wiring Order
//!
//! 1. Signature verifier (genesis keys registered)
//! 2. Commitment tracker
//! 3. Ledger engine (verifier as its signature gateway)
//! 4. Governance engine (ledger and tracker as its outbound ports)

pub mod config;
pub mod services;

pub use config::RuntimeConfig;
pub use services::{GenusdServices, RuntimeDependencies, Tracker, Verifier};
