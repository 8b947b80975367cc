//! Text block log
//!
//! One block per line: `index,timestamp,hash,previous_hash,data`. The payload
//! goes last because it may itself contain commas.

use crate::core::Block;
use crate::storage::persistence::{LogBackend, StorageError};
use std::io;

/// Number of comma separated fields in a record
const RECORD_FIELDS: usize = 5;

/// Render a block as one log line, including the trailing newline
pub fn encode_record(block: &Block) -> String {
    format!(
        "{},{},{},{},{}\n",
        block.index, block.timestamp, block.hash, block.previous_hash, block.data
    )
}

/// Parse one log line back into a block without recomputing its hash.
/// `line_no` is 1-based and only used for error reporting.
pub fn parse_record(line: &str, line_no: usize) -> Result<Block, StorageError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let parts: Vec<&str> = line.splitn(RECORD_FIELDS, ',').collect();
    if parts.len() < RECORD_FIELDS {
        return Err(StorageError::ParseError {
            line: line_no,
            reason: format!(
                "expected {} fields, found {}",
                RECORD_FIELDS,
                parts.len()
            ),
        });
    }

    let index = parts[0]
        .trim()
        .parse::<u64>()
        .map_err(|e| StorageError::ParseError {
            line: line_no,
            reason: format!("invalid index {:?}: {}", parts[0], e),
        })?;
    let timestamp = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|e| StorageError::ParseError {
            line: line_no,
            reason: format!("invalid timestamp {:?}: {}", parts[1], e),
        })?;

    Ok(Block::from_parts(
        index,
        timestamp,
        parts[2].to_string(),
        parts[3].to_string(),
        parts[4].to_string(),
    ))
}

/// Append-only text log of blocks
pub struct BlockLog {
    backend: Box<dyn LogBackend>,
}

impl BlockLog {
    pub fn new(backend: impl LogBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Append one block
    pub fn append(&mut self, block: &Block) -> Result<(), StorageError> {
        self.backend.append(encode_record(block).as_bytes())
    }

    /// Read every persisted block in file order.
    ///
    /// Returns `None` when the log does not exist yet.
    pub fn replay(&self) -> Result<Option<Vec<Block>>, StorageError> {
        let bytes = match self.backend.read_all()? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let text = String::from_utf8(bytes)
            .map_err(|e| StorageError::IoError(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let blocks = text
            .lines()
            .enumerate()
            .map(|(i, line)| parse_record(line, i + 1))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Replayed {} block(s) from {}",
            blocks.len(),
            self.backend.describe()
        );
        Ok(Some(blocks))
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }
}
