//! Block implementation for the ledger
//!
//! A block carries a single text payload and is linked to its predecessor
//! through `previous_hash`.

use crate::contract::ContractSnapshot;
use crate::crypto::hash_fields;
use chrono::Utc;
use serde_json::json;

/// Previous-hash sentinel of the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Payload of the genesis block
pub const GENESIS_DATA: &str = "0";

/// Payload handed to the ledger. Contract snapshots are rendered to their
/// canonical text before they reach a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockData {
    Text(String),
    Contract(ContractSnapshot),
}

impl BlockData {
    /// The text stored in the block
    pub fn into_text(self) -> String {
        match self {
            BlockData::Text(text) => text,
            BlockData::Contract(snapshot) => snapshot.canonical_text(),
        }
    }
}

impl From<&str> for BlockData {
    fn from(text: &str) -> Self {
        BlockData::Text(text.to_string())
    }
}

impl From<String> for BlockData {
    fn from(text: String) -> Self {
        BlockData::Text(text)
    }
}

impl From<ContractSnapshot> for BlockData {
    fn from(snapshot: ContractSnapshot) -> Self {
        BlockData::Contract(snapshot)
    }
}

/// A block in the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Position in the chain, 0 for genesis
    pub index: u64,
    /// Creation time in fractional seconds since the Unix epoch
    pub timestamp: f64,
    /// Payload text
    pub data: String,
    /// Hash of the preceding block, or "0" for genesis
    pub previous_hash: String,
    pub hash: String,
}

impl Block {
    /// Create a new block stamped with the current time
    pub fn new(index: u64, previous_hash: impl Into<String>, data: impl Into<BlockData>) -> Self {
        let mut block = Self {
            index,
            timestamp: now_seconds(),
            data: data.into().into_text(),
            previous_hash: previous_hash.into(),
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Create the genesis block
    pub fn genesis() -> Self {
        Self::new(0, GENESIS_PREVIOUS_HASH, GENESIS_DATA)
    }

    /// Rebuild a block from persisted values. The stored hash is taken as-is.
    pub fn from_parts(
        index: u64,
        timestamp: f64,
        hash: String,
        previous_hash: String,
        data: String,
    ) -> Self {
        Self {
            index,
            timestamp,
            data,
            previous_hash,
            hash,
        }
    }

    /// Digest over `{data, index, previous_hash, timestamp}`
    pub fn compute_hash(&self) -> String {
        hash_fields([
            ("index", json!(self.index)),
            ("timestamp", json!(self.timestamp)),
            ("data", json!(self.data)),
            ("previous_hash", json!(self.previous_hash)),
        ])
    }

    /// Verify the block hash
    pub fn verify_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash == GENESIS_PREVIOUS_HASH
    }
}

fn now_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
