//! # Exploit Scenarios
//!
//! Attacks that must fail without leaving any state behind.
//!
//! | Module | Attack |
//! |--------|--------|
//! | `replay` | reusing a valid signature in another transaction or context |
//! | `double_spend` | spending an output twice or after seizure |
//! | `privilege` | acting beyond one's role or policy ceiling |

pub mod double_spend;
pub mod privilege;
pub mod replay;
