//! Storage module for ledger persistence

pub mod block_log;
pub mod persistence;

pub use block_log::{encode_record, parse_record, BlockLog};
pub use persistence::{FileLog, LogBackend, MemoryLog, StorageConfig, StorageError};
