//! # Shared Types Crate
//!
//! Types and ports shared by every GENUSD subsystem.
//!
//! ## Design Principles
//!
//! - **Host-owned state**: all domain records live in the host ledger's
//!   key-value store ([`StateStore`]). No subsystem keeps authoritative
//!   copies in memory.
//! - **Atomic operations**: each operation stages its writes in a
//!   [`StagedState`] and commits once, after every validation has passed.
//! - **Closed roles**: privilege is expressed through the [`Role`] enum,
//!   never through ad hoc strings.

pub mod audit;
pub mod authority;
pub mod envelope;
pub mod errors;
pub mod hashing;
pub mod keys;
pub mod roles;
pub mod staging;
pub mod store;
pub mod time;

/// Deterministic doubles for engine tests.
///
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use audit::{AuditEvent, AuditEventType, AuditResult, AuditSink, RecordingAuditSink};
pub use authority::SignatureGateway;
pub use envelope::{ContractRequest, ContractResponse, ErrorBody};
pub use errors::{AuthorityError, Categorized, ErrorCategory, StoreError};
pub use roles::Role;
pub use staging::StagedState;
pub use store::{HostEvent, InMemoryStateStore, StateStore, WriteBatch};
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource, Timestamp};
