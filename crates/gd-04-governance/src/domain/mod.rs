//! # Domain Layer
//!
//! Proposals, multisig configuration, the role/limit policy table, and
//! the records governance actions leave behind.

pub mod actions;
pub mod errors;
pub mod multisig;
pub mod policy;
pub mod proposal;
pub mod records;
