//! Hash helpers used for ids, nonces and payload binding.

use serde::Serialize;
use sha2::{Digest, Sha256};
use sha3::Sha3_256;

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

pub fn sha3_256_hex(data: &[u8]) -> String {
    hex::encode(Sha3_256::digest(data))
}

/// SHA3-256 over the canonical JSON encoding of `value`.
///
/// Struct fields serialize in declaration order and maps are `BTreeMap`s,
/// so the encoding is deterministic.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(sha3_256_hex(&serde_json::to_vec(value)?))
}
