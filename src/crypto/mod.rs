//! Cryptographic utilities for the ledger
//!
//! This module provides SHA-256 hashing over canonically encoded fields.

pub mod hash;

pub use hash::{canonical_json, hash_fields, sha256, sha256_hex};
