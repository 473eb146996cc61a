//! # Genesis Module
//!
//! Start-up key registration and ledger initialisation.
//!
//! ## Initialization Sequence
//!
//! 1. Register every genesis key with the signature verifier
//! 2. Bind each key's roles
//! 3. Seed `TOTAL_SUPPLY`, `POLICY_REGISTRY` and `MULTISIG_CONFIG` if absent

pub mod keys;

pub use keys::{GenesisConfig, GenesisKey};
