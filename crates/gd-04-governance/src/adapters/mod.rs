//! # Adapters
//!
//! Outbound port implementations over the ledger engine and the
//! commitment tracker.

pub mod commitments;
pub mod ledger;
