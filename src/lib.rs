//! Contract-Ledger: a hash-chained ledger with a two-party contract lifecycle
//!
//! This crate provides:
//! - SHA-256 block hashing over a canonical field encoding
//! - An append-only chain of blocks, written through to a text log
//! - Contracts that move from `Created` to `Transferred`, with every
//!   lifecycle event kept in a sequential binary log
//! - Recovery of both logs on startup, trusting persisted hashes unless
//!   verification is requested
//!
//! The logs assume a single writer process.
//!
//! # Example
//!
//! ```rust
//! use contract_ledger::contract::ContractStore;
//! use contract_ledger::core::{Ledger, LoadPolicy};
//! use contract_ledger::storage::{BlockLog, MemoryLog};
//!
//! let mut ledger = Ledger::with_logs(
//!     BlockLog::new(MemoryLog::new()),
//!     ContractStore::new(MemoryLog::new()),
//!     LoadPolicy::default(),
//! )
//! .unwrap();
//!
//! let block = ledger.create_block("hello").unwrap();
//! assert_eq!(block.index, 1);
//! assert_eq!(block.previous_hash, ledger.chain()[0].hash);
//! ```

pub mod cli;
pub mod contract;
pub mod core;
pub mod crypto;
pub mod storage;

// Re-export commonly used types
pub use contract::{Contract, ContractSnapshot, ContractStatus, ContractStore};
pub use crate::core::{Block, BlockData, Ledger, LedgerError, LoadPolicy, SharedLedger};
pub use storage::{BlockLog, FileLog, LogBackend, MemoryLog, StorageConfig, StorageError};
