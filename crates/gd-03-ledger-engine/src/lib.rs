//! # Ledger Engine Subsystem (GD-03)
//!
//! The UTXO state machine behind GENUSD balances.
//!
//! ## Guarantees
//!
//! | Property | Enforced by |
//! |----------|-------------|
//! | Σ inputs = Σ outputs on transfer | [`domain::invariants::check_conservation`] |
//! | Supply never negative or wrapping | [`domain::invariants::apply_supply_delta`] |
//! | Spend-once | fresh status read of every input before any write |
//! | No partial effects | single [`shared_types::StagedState`] commit per call |
//!
//! `TOTAL_SUPPLY` equals the sum of active and frozen outputs; that
//! equality is checked by [`LedgerApi::audit_supply`], not on every call.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::config::LedgerConfig;
pub use domain::entities::{
    AccountRecord, LedgerOperation, LedgerReceipt, OutputSpec, StatusTransition, Utxo, UtxoMetadata,
    UtxoOrigin, UtxoStatus,
};
pub use domain::errors::LedgerError;
pub use domain::invariants::SupplyAudit;
pub use domain::kyc::KycTier;
pub use domain::messages::LedgerAction;
pub use ports::inbound::LedgerApi;
pub use service::{LedgerEngine, Seizure};
