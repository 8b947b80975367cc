//! Core ledger components
//!
//! This module contains the fundamental building blocks:
//! - Blocks (hash-linked, single text payload)
//! - Ledger (chain construction, contract lifecycle, load and recovery)

pub mod block;
pub mod ledger;

pub use block::{Block, BlockData, GENESIS_DATA, GENESIS_PREVIOUS_HASH};
pub use ledger::{ChainStats, Ledger, LedgerError, LoadPolicy, SharedLedger};
