//! Append-only log backends
//!
//! Both ledger logs sit on a [`LogBackend`]. The file backend opens its file
//! for the duration of a single read or append, so the handle is released on
//! every exit path. Nothing is created on disk until the first append.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Parse error on line {line}: {reason}")]
    ParseError { line: usize, reason: String },
    #[error("Serialization error: {0}")]
    SerializationError(#[from] bincode::Error),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub block_log_file: String,
    pub contract_log_file: String,
    /// Recompute and compare block hashes while loading
    pub verify_on_load: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".ledger_data"),
            block_log_file: "blockchain.txt".to_string(),
            contract_log_file: "block_contract_chain.bin".to_string(),
            verify_on_load: false,
        }
    }
}

impl StorageConfig {
    /// Path of the text block log
    pub fn block_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.block_log_file)
    }

    /// Path of the binary contract log
    pub fn contract_log_path(&self) -> PathBuf {
        self.data_dir.join(&self.contract_log_file)
    }
}

/// An append-only byte log.
///
/// Single writer only: two processes appending to the same log may
/// interleave records.
pub trait LogBackend: Send {
    /// Entire log contents, or `None` if the log has never been written
    fn read_all(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Durably append bytes to the end of the log
    fn append(&mut self, bytes: &[u8]) -> Result<(), StorageError>;

    /// Human readable location, for log messages
    fn describe(&self) -> String;
}

/// Log stored in a file on disk
#[derive(Debug, Clone)]
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Check if the log file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl LogBackend for FileLog {
    fn read_all(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn append(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory log. Clones share the same buffer, so a clone handed to a
/// second ledger sees everything the first one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    buffer: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that already holds `bytes`
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    /// Copy of the current contents
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Vec<u8>>> {
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogBackend for MemoryLog {
    fn read_all(&self) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.contents())
    }

    fn append(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        self.lock().get_or_insert_with(Vec::new).extend_from_slice(bytes);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
