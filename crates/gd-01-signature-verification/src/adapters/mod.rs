//! Adapters: concrete Dilithium scheme and the engine-facing gateway.

pub mod dilithium;
pub mod gateway;
