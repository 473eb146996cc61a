//! # Integration Tests
//!
//! Cross-engine scenarios over one shared store.
//!
//! ## Flows Tested
//!
//! 1. **Ledger**: mint, transfer and burn keep supply equal to outstanding value
//! 2. **Governance**: threshold approval, single execution, effects on the ledger
//! 3. **Commitments**: nullifier uniqueness and attestation consumption
//! 4. **Runtime**: the same flows through the request dispatcher with Dilithium keys

pub mod commitment_flows;
pub mod governance_flows;
pub mod ledger_flows;
pub mod runtime_flows;
