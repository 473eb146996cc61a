//! # Domain Layer
//!
//! UTXO entities, ledger errors, invariant arithmetic, KYC tiers and the
//! staged-state helpers every UTXO mutation goes through.

pub mod config;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod kyc;
pub mod messages;
pub mod utxo_set;
