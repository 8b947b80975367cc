//! Restart and recovery tests against real files on disk

use contract_ledger::contract::{Contract, ContractStatus};
use contract_ledger::core::{Ledger, LedgerError};
use contract_ledger::storage::{StorageConfig, StorageError};
use std::fs;
use std::path::Path;

fn config_for(dir: &Path) -> StorageConfig {
    StorageConfig {
        data_dir: dir.to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn test_first_run_writes_genesis() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = config_for(temp_dir.path());

    let ledger = Ledger::open(&config).unwrap();
    assert_eq!(ledger.len(), 1);

    let genesis = &ledger.chain()[0];
    assert_eq!(genesis.index, 0);
    assert_eq!(genesis.data, "0");
    assert_eq!(genesis.previous_hash, "0");

    let text = fs::read_to_string(config.block_log_path()).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.ends_with(",0,0\n"));
    assert!(!config.contract_log_path().exists());
}

#[test]
fn test_missing_data_dir_is_created() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = config_for(&temp_dir.path().join("nested").join("ledger"));

    let ledger = Ledger::open(&config).unwrap();
    assert_eq!(ledger.len(), 1);
    assert!(config.block_log_path().exists());
}

#[test]
fn test_round_trip_across_restarts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = config_for(temp_dir.path());

    let mut ledger = Ledger::open(&config).unwrap();
    ledger.create_block("First block data").unwrap();
    ledger.create_block("Second, block, data").unwrap();
    let original = ledger.chain().to_vec();
    drop(ledger);

    let reloaded = Ledger::open(&config).unwrap();
    assert_eq!(reloaded.len(), original.len());
    for (a, b) in reloaded.chain().iter().zip(&original) {
        assert_eq!(a.index, b.index);
        assert_eq!(a.hash, b.hash);
        assert_eq!(a.previous_hash, b.previous_hash);
        assert_eq!(a.data, b.data);
        assert_eq!(a.timestamp, b.timestamp);
    }

    let strict = Ledger::open(&StorageConfig {
        verify_on_load: true,
        ..config
    })
    .unwrap();
    assert!(strict.is_valid());
}

#[test]
fn test_contract_lifecycle_across_restarts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = config_for(temp_dir.path());

    let mut ledger = Ledger::open(&config).unwrap();
    ledger
        .add_contract(&Contract::new("alice", "bob", "100"))
        .unwrap();

    let mut ledger = Ledger::open(&config).unwrap();
    ledger.transfer_contract("alice", "bob").unwrap();
    let snapshot = ledger.query_contract("alice", "bob").unwrap();
    assert_eq!(snapshot.creator, "alice");
    assert_eq!(snapshot.beneficiary, "bob");
    assert_eq!(snapshot.figure, "100");
    assert_eq!(snapshot.status, ContractStatus::Transferred);

    // Both the created and the transferred snapshot are replayed.
    let ledger = Ledger::open(&config).unwrap();
    assert_eq!(ledger.contracts().len(), 2);
    assert_eq!(ledger.len(), 3);
    assert_eq!(
        ledger.query_contract("alice", "bob").unwrap().status,
        ContractStatus::Transferred
    );
}

#[test]
fn test_query_unknown_pair() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ledger = Ledger::open(&config_for(temp_dir.path())).unwrap();

    let err = ledger.query_contract("alice", "bob").unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
}

#[test]
fn test_empty_block_log_gets_genesis() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = config_for(temp_dir.path());
    fs::write(config.block_log_path(), "").unwrap();

    let ledger = Ledger::open(&config).unwrap();
    assert_eq!(ledger.len(), 1);
    assert!(ledger.chain()[0].is_genesis());
}

#[test]
fn test_malformed_line_fails_load() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = config_for(temp_dir.path());
    fs::write(config.block_log_path(), "0,1700000000.0,abc\n").unwrap();

    let err = Ledger::open(&config).err().unwrap();
    assert!(matches!(
        err,
        LedgerError::Storage(StorageError::ParseError { line: 1, .. })
    ));
}

#[test]
fn test_tampered_log_is_trusted_by_default() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = config_for(temp_dir.path());

    let mut ledger = Ledger::open(&config).unwrap();
    ledger.create_block("honest").unwrap();
    drop(ledger);

    let text = fs::read_to_string(config.block_log_path()).unwrap();
    fs::write(config.block_log_path(), text.replace("honest", "forged")).unwrap();

    let trusted = Ledger::open(&config).unwrap();
    assert_eq!(trusted.chain()[1].data, "forged");
    assert!(!trusted.is_valid());

    let err = Ledger::open(&StorageConfig {
        verify_on_load: true,
        ..config
    })
    .err()
    .unwrap();
    assert!(matches!(err, LedgerError::HashMismatch { index: 1 }));
}
