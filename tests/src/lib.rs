//! # GENUSD Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs      # Fully wired engines over one in-memory store
//! ├── integration/     # Cross-engine scenarios
//! └── exploits/        # Replay, double-spend and privilege attacks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p genusd-tests
//! cargo test -p genusd-tests integration::
//! cargo test -p genusd-tests exploits::
//! ```

#![allow(dead_code)]

pub mod fixtures;
pub mod exploits;
pub mod integration;
