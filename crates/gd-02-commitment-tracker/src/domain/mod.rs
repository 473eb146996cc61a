//! Domain layer: proof entities, commitment derivation, cache.

pub mod cache;
pub mod commitment;
pub mod entities;
pub mod errors;
