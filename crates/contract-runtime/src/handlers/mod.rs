//! # Handlers
//!
//! Request envelope, payload types and the dispatcher.

pub mod dispatch;
pub mod envelope;
pub mod operations;
pub mod payloads;

pub use dispatch::GenusdContract;
pub use envelope::{request_message, REQUEST_CONTEXT};
pub use operations::Operation;
