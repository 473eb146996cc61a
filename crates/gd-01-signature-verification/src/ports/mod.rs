//! Ports layer: inbound API and outbound scheme contract.

pub mod inbound;
pub mod outbound;
