//! Contract module
//!
//! Two-party contracts move from `Created` to `Transferred`. Each lifecycle
//! event is stored as a snapshot in a sequential binary log, which is
//! replayed into the ledger's contract list on startup.
//!
//! # Example
//!
//! ```rust
//! use contract_ledger::contract::{Contract, ContractStatus};
//!
//! let mut contract = Contract::new("alice", "bob", "100");
//! contract.transfer();
//! assert_eq!(contract.snapshot().status, ContractStatus::Transferred);
//! ```

pub mod contract;
pub mod store;

pub use contract::{Contract, ContractSnapshot, ContractStatus, UnknownStatus};
pub use store::ContractStore;
