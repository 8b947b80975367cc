//! CLI commands for the ledger
//!
//! Implements all command handlers for the CLI interface.

use crate::contract::{Contract, ContractStatus};
use crate::core::{Ledger, LedgerError};
use crate::storage::StorageConfig;
use chrono::{TimeZone, Utc};
use std::path::PathBuf;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub ledger: Ledger,
    pub config: StorageConfig,
}

impl AppState {
    /// Open (or start) the ledger stored in `data_dir`
    pub fn new(data_dir: PathBuf, verify_on_load: bool) -> CliResult<Self> {
        let config = StorageConfig {
            data_dir,
            verify_on_load,
            ..Default::default()
        };
        let ledger = Ledger::open(&config)?;
        Ok(Self { ledger, config })
    }
}

/// Create a new contract
pub fn cmd_create(
    state: &mut AppState,
    creator: &str,
    beneficiary: &str,
    figure: &str,
) -> CliResult<()> {
    let contract = Contract::new(creator, beneficiary, figure);
    let block = state.ledger.add_contract(&contract)?;

    println!("Contract created");
    println!("   ├─ {} -> {}: {}", creator, beneficiary, figure);
    println!("   └─ Block #{} {}", block.index, short_hash(&block.hash));
    Ok(())
}

/// Transfer every contract between two parties
pub fn cmd_transfer(state: &mut AppState, creator: &str, beneficiary: &str) -> CliResult<()> {
    match state.ledger.transfer_contract(creator, beneficiary) {
        Ok(count) => {
            println!(
                "Transferred {} contract record(s) from {} to {}",
                count, creator, beneficiary
            );
            Ok(())
        }
        Err(LedgerError::NotFound { .. }) => {
            println!("No contract from {} to {}", creator, beneficiary);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Show the current state of a contract
pub fn cmd_query(state: &AppState, creator: &str, beneficiary: &str) -> CliResult<()> {
    match state.ledger.query_contract(creator, beneficiary) {
        Ok(snapshot) => {
            let status = match snapshot.status {
                ContractStatus::Created => "created, not yet transferred",
                ContractStatus::Transferred => "transferred",
            };
            println!("Contract {} -> {}", snapshot.creator, snapshot.beneficiary);
            println!("   ├─ Figure: {}", snapshot.figure);
            println!("   └─ Status: {}", status);
            Ok(())
        }
        Err(LedgerError::NotFound { .. }) => {
            println!("No contract from {} to {}", creator, beneficiary);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Print the chain
pub fn cmd_chain(state: &AppState) -> CliResult<()> {
    let stats = state.ledger.stats();

    println!("Ledger Info");
    println!("   ├─ Data directory: {:?}", state.config.data_dir);
    println!("   ├─ Total blocks: {}", stats.total_blocks);
    println!("   ├─ Contract records: {}", stats.contract_records);
    println!("   └─ Latest hash: {}", stats.latest_hash);

    for block in state.ledger.chain() {
        let created = Utc
            .timestamp_micros((block.timestamp * 1_000_000.0) as i64)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| block.timestamp.to_string());

        println!();
        println!("   Block #{}", block.index);
        println!("   ├─ Timestamp: {}", created);
        println!("   ├─ Data: {}", block.data);
        println!("   ├─ Hash: {}", block.hash);
        println!("   └─ Previous Hash: {}", block.previous_hash);
    }

    Ok(())
}

/// Validate the chain
pub fn cmd_validate(state: &AppState) -> CliResult<()> {
    println!("Validating ledger...");

    match state.ledger.verify_chain() {
        Ok(()) => {
            println!("Ledger is valid!");
            println!("   {} blocks verified", state.ledger.len());
        }
        Err(e) => {
            println!("Ledger validation FAILED: {}", e);
            println!("   The log may have been edited by hand.");
        }
    }

    Ok(())
}

fn short_hash(hash: &str) -> &str {
    hash.get(..16).unwrap_or(hash)
}
