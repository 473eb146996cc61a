//! Domain layer: key entities, registry and context framing. No I/O.

pub mod context;
pub mod entities;
pub mod errors;
pub mod registry;
