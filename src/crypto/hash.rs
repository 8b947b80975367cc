//! Cryptographic hashing utilities for the ledger
//!
//! Block hashes are SHA-256 digests over a canonical JSON rendering of the
//! block fields. `serde_json`'s object map keeps its keys sorted, so the same
//! field values always produce the same bytes.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 hash and returns it as a hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Renders a set of named fields as compact JSON with lexicographically
/// sorted keys.
pub fn canonical_json<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, Value)>,
{
    let map: Map<String, Value> = fields
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    Value::Object(map).to_string()
}

/// Hashes a set of named fields through their canonical encoding
pub fn hash_fields<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, Value)>,
{
    sha256_hex(canonical_json(fields).as_bytes())
}
