//! Binary contract snapshot log
//!
//! Every lifecycle event appends one bincode-encoded [`ContractSnapshot`].
//! Records are length-prefixed, so the log is read back sequentially until
//! the bytes run out. Nothing is ever rewritten or deduplicated.

use crate::contract::{Contract, ContractSnapshot};
use crate::storage::{LogBackend, StorageError};
use bincode::Options;
use std::io::Cursor;

/// Record codec. Same layout as `bincode::serialize`, with every read
/// bounded by `limit` so a damaged length prefix cannot force a huge
/// allocation.
fn codec(limit: u64) -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(limit)
}

/// Sequential store of contract snapshots
pub struct ContractStore {
    backend: Box<dyn LogBackend>,
}

impl ContractStore {
    pub fn new(backend: impl LogBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Append one snapshot record
    pub fn append(&mut self, snapshot: &ContractSnapshot) -> Result<(), StorageError> {
        let record = codec(u64::MAX).serialize(snapshot)?;
        self.backend.append(&record)
    }

    /// Decode every snapshot in file order. A missing log means no contracts.
    pub fn replay(&self) -> Result<Vec<ContractSnapshot>, StorageError> {
        let bytes = match self.backend.read_all()? {
            Some(bytes) => bytes,
            None => return Ok(Vec::new()),
        };

        let total = bytes.len() as u64;
        let mut cursor = Cursor::new(bytes);
        let mut snapshots = Vec::new();
        while cursor.position() < total {
            let remaining = total - cursor.position();
            let snapshot: ContractSnapshot = codec(remaining).deserialize_from(&mut cursor)?;
            snapshots.push(snapshot);
        }

        log::debug!(
            "Replayed {} contract record(s) from {}",
            snapshots.len(),
            self.backend.describe()
        );
        Ok(snapshots)
    }

    /// Replay the log into contract objects
    pub fn load_contracts(&self) -> Result<Vec<Contract>, StorageError> {
        Ok(self.replay()?.into_iter().map(Contract::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::ContractStatus;
    use crate::storage::{FileLog, MemoryLog};

    #[test]
    fn test_missing_log_is_empty() {
        let store = ContractStore::new(MemoryLog::new());
        assert!(store.replay().unwrap().is_empty());
    }

    #[test]
    fn test_replay_keeps_order_and_duplicates() {
        let backend = MemoryLog::new();
        let mut store = ContractStore::new(backend.clone());

        let mut contract = Contract::new("alice", "bob", "100");
        store.append(&contract.snapshot()).unwrap();
        contract.transfer();
        store.append(&contract.snapshot()).unwrap();
        store
            .append(&Contract::new("carol", "dave", "7").snapshot())
            .unwrap();

        let contracts = ContractStore::new(backend).load_contracts().unwrap();
        assert_eq!(contracts.len(), 3);
        assert_eq!(contracts[0].status(), ContractStatus::Created);
        assert_eq!(contracts[1].status(), ContractStatus::Transferred);
        assert!(contracts[0].is_between("alice", "bob"));
        assert!(contracts[1].is_between("alice", "bob"));
        assert!(contracts[2].is_between("carol", "dave"));
    }

    #[test]
    fn test_truncated_record_is_an_error() {
        let mut record = bincode::serialize(&Contract::new("alice", "bob", "1").snapshot()).unwrap();
        record.truncate(record.len() - 1);

        let store = ContractStore::new(MemoryLog::with_contents(record));
        assert!(matches!(
            store.replay(),
            Err(StorageError::SerializationError(_))
        ));
    }

    #[test]
    fn test_oversized_length_prefix_is_an_error() {
        let mut record = vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00];
        record.extend_from_slice(b"alice");

        let store = ContractStore::new(MemoryLog::with_contents(record));
        assert!(matches!(
            store.replay(),
            Err(StorageError::SerializationError(_))
        ));
    }

    #[test]
    fn test_records_match_default_bincode_layout() {
        let snapshot = Contract::new("alice", "bob", "100").snapshot();
        let backend = MemoryLog::new();
        ContractStore::new(backend.clone()).append(&snapshot).unwrap();
        assert_eq!(
            backend.contents().unwrap(),
            bincode::serialize(&snapshot).unwrap()
        );
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let mut record = bincode::serialize(&Contract::new("a", "b", "1").snapshot()).unwrap();
        let last = record.len() - 1;
        record[last] = 9;

        let store = ContractStore::new(MemoryLog::with_contents(record));
        assert!(store.replay().is_err());
    }

    #[test]
    fn test_file_backed_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("contracts.bin");

        let mut store = ContractStore::new(FileLog::new(&path));
        store
            .append(&Contract::new("alice", "bob", "100").snapshot())
            .unwrap();

        let reopened = ContractStore::new(FileLog::new(&path));
        let snapshots = reopened.replay().unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].figure, "100");
    }
}
