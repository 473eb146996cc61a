//! Request-level signatures.
//!
//! Proposal creation and execution carry no engine-level signature, so the
//! dispatcher requires the caller to sign the whole request:
//! `GENUSD/REQUEST/v1|{tx_id}|{operation}|{actor}|{sha3(payload json)}`
//! under context [`REQUEST_CONTEXT`].

use shared_types::hashing::canonical_hash;
use shared_types::StoreError;

use crate::errors::RuntimeError;

pub const REQUEST_CONTEXT: &str = "genusd.request";

pub fn request_message(
    tx_id: &str,
    operation: &str,
    actor: &str,
    payload: &serde_json::Value,
) -> Result<Vec<u8>, RuntimeError> {
    let digest = canonical_hash(payload).map_err(|e| StoreError::Encode {
        key: operation.to_string(),
        reason: e.to_string(),
    })?;
    Ok(format!("GENUSD/REQUEST/v1|{tx_id}|{operation}|{actor}|{digest}").into_bytes())
}
