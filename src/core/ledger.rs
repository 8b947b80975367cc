//! Ledger implementation
//!
//! The ledger owns the in-memory chain and the replayed contract list, and
//! writes every new block through to the text block log. Contract lifecycle
//! events are additionally appended to the binary contract log.

use crate::contract::{Contract, ContractSnapshot, ContractStatus, ContractStore};
use crate::core::block::{Block, BlockData, GENESIS_PREVIOUS_HASH};
use crate::storage::{BlockLog, FileLog, StorageConfig, StorageError};
use std::fs;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Ledger-related errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("No contract from {creator} to {beneficiary}")]
    NotFound {
        creator: String,
        beneficiary: String,
    },
    #[error("Invalid block data: {0}")]
    InvalidData(String),
    #[error("Hash mismatch at block {index}")]
    HashMismatch { index: u64 },
    #[error("Block {index} does not link to its predecessor")]
    BrokenLink { index: u64 },
}

/// How persisted blocks are treated on load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadPolicy {
    /// Recompute every hash and check every link instead of trusting the log
    pub verify_on_load: bool,
}

/// A ledger shared between several callers
pub type SharedLedger = Arc<Mutex<Ledger>>;

/// The main ledger structure
pub struct Ledger {
    chain: Vec<Block>,
    contracts: Vec<Contract>,
    block_log: BlockLog,
    contract_store: ContractStore,
    policy: LoadPolicy,
}

impl Ledger {
    /// Open a file-backed ledger under `config.data_dir` and load it
    pub fn open(config: &StorageConfig) -> Result<Self, LedgerError> {
        fs::create_dir_all(&config.data_dir).map_err(StorageError::from)?;

        let policy = LoadPolicy {
            verify_on_load: config.verify_on_load,
        };
        Self::with_logs(
            BlockLog::new(FileLog::new(config.block_log_path())),
            ContractStore::new(FileLog::new(config.contract_log_path())),
            policy,
        )
    }

    /// Build a ledger over the given logs and load it
    pub fn with_logs(
        block_log: BlockLog,
        contract_store: ContractStore,
        policy: LoadPolicy,
    ) -> Result<Self, LedgerError> {
        let mut ledger = Self {
            chain: Vec::new(),
            contracts: Vec::new(),
            block_log,
            contract_store,
            policy,
        };
        ledger.load()?;
        Ok(ledger)
    }

    /// Rebuild the in-memory state from both logs.
    ///
    /// Persisted hashes and timestamps are kept verbatim unless the load
    /// policy asks for verification. An absent or empty block log gets a
    /// fresh genesis block. On error the previous state is left untouched.
    pub fn load(&mut self) -> Result<(), LedgerError> {
        let mut chain = match self.block_log.replay()? {
            Some(blocks) => {
                if blocks.is_empty() {
                    log::warn!(
                        "Block log {} is empty, writing genesis block",
                        self.block_log.describe()
                    );
                }
                blocks
            }
            None => {
                log::info!(
                    "No block log at {}, starting a new chain",
                    self.block_log.describe()
                );
                Vec::new()
            }
        };

        if !chain.is_empty() && self.policy.verify_on_load {
            verify_blocks(&chain)?;
        }

        let contracts = self.contract_store.load_contracts()?;

        if chain.is_empty() {
            let genesis = Block::genesis();
            self.block_log.append(&genesis)?;
            log::info!("Genesis block created: {}", genesis.hash);
            chain.push(genesis);
        }

        self.chain = chain;
        self.contracts = contracts;

        log::info!(
            "Loaded {} block(s) and {} contract record(s)",
            self.chain.len(),
            self.contracts.len()
        );
        Ok(())
    }

    /// Append a block holding `data` and write it to the block log
    pub fn create_block(&mut self, data: impl Into<BlockData>) -> Result<Block, LedgerError> {
        let data = data.into();
        if let BlockData::Text(text) = &data {
            if text.contains('\n') || text.contains('\r') {
                return Err(LedgerError::InvalidData(
                    "block data must fit on a single line".to_string(),
                ));
            }
        }

        let previous_hash = self
            .chain
            .last()
            .map(|b| b.hash.clone())
            .unwrap_or_else(|| GENESIS_PREVIOUS_HASH.to_string());
        let block = Block::new(self.chain.len() as u64, previous_hash, data);

        self.block_log.append(&block)?;
        self.chain.push(block.clone());

        log::debug!("Block {} appended: {}", block.index, block.hash);
        Ok(block)
    }

    /// Record a new contract on the chain and in the contract log.
    ///
    /// The block is written first. If the snapshot write then fails, the
    /// block stays in the chain and the block log without a matching
    /// contract record.
    ///
    /// The contract list is only rebuilt by [`Ledger::load`], so the new
    /// contract is not visible to transfers or queries until then.
    pub fn add_contract(&mut self, contract: &Contract) -> Result<Block, LedgerError> {
        let snapshot = contract.snapshot();
        let block = self.create_block(snapshot.clone())?;
        self.contract_store.append(&snapshot)?;
        Ok(block)
    }

    /// Transfer every contract between `creator` and `beneficiary`, in list
    /// order, recording each updated snapshot. Returns how many were
    /// transferred.
    ///
    /// A contract only changes in memory once both its block and its
    /// snapshot are written. Writes are not rolled back, so a failed
    /// snapshot append leaves a transfer block without a contract record.
    pub fn transfer_contract(
        &mut self,
        creator: &str,
        beneficiary: &str,
    ) -> Result<usize, LedgerError> {
        let mut transferred = 0;
        for i in 0..self.contracts.len() {
            if !self.contracts[i].is_between(creator, beneficiary) {
                continue;
            }
            let mut updated = self.contracts[i].clone();
            updated.transfer();
            let snapshot = updated.snapshot();
            self.create_block(snapshot.clone())?;
            self.contract_store.append(&snapshot)?;
            self.contracts[i] = updated;
            transferred += 1;
        }

        if transferred == 0 {
            return Err(LedgerError::NotFound {
                creator: creator.to_string(),
                beneficiary: beneficiary.to_string(),
            });
        }
        Ok(transferred)
    }

    /// Current state of the contract between `creator` and `beneficiary`.
    ///
    /// The first transferred record wins; otherwise the last created record
    /// is returned.
    pub fn query_contract(
        &self,
        creator: &str,
        beneficiary: &str,
    ) -> Result<ContractSnapshot, LedgerError> {
        let mut pending: Option<&Contract> = None;
        for contract in self
            .contracts
            .iter()
            .filter(|c| c.is_between(creator, beneficiary))
        {
            match contract.status() {
                ContractStatus::Transferred => return Ok(contract.snapshot()),
                ContractStatus::Created => pending = Some(contract),
            }
        }

        pending
            .map(Contract::snapshot)
            .ok_or_else(|| LedgerError::NotFound {
                creator: creator.to_string(),
                beneficiary: beneficiary.to_string(),
            })
    }

    /// Check every hash and link, failing on the first bad block
    pub fn verify_chain(&self) -> Result<(), LedgerError> {
        verify_blocks(&self.chain)
    }

    /// Validate the entire chain
    pub fn is_valid(&self) -> bool {
        self.verify_chain().is_ok()
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    /// Get a block by index
    pub fn get_block(&self, index: u64) -> Option<&Block> {
        self.chain.get(index as usize)
    }

    /// Get the latest block
    pub fn latest_block(&self) -> Option<&Block> {
        self.chain.last()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Get chain statistics
    pub fn stats(&self) -> ChainStats {
        ChainStats {
            total_blocks: self.chain.len() as u64,
            contract_records: self.contracts.len() as u64,
            latest_hash: self
                .latest_block()
                .map(|b| b.hash.clone())
                .unwrap_or_default(),
        }
    }

    /// Wrap the ledger for use by several callers
    pub fn into_shared(self) -> SharedLedger {
        Arc::new(Mutex::new(self))
    }
}

fn verify_blocks(chain: &[Block]) -> Result<(), LedgerError> {
    for (i, block) in chain.iter().enumerate() {
        if !block.verify_hash() {
            return Err(LedgerError::HashMismatch { index: block.index });
        }
        let linked = match i {
            0 => block.previous_hash == GENESIS_PREVIOUS_HASH,
            _ => block.previous_hash == chain[i - 1].hash,
        };
        if !linked || block.index != i as u64 {
            return Err(LedgerError::BrokenLink { index: block.index });
        }
    }
    Ok(())
}

/// Chain statistics
#[derive(Debug, Clone)]
pub struct ChainStats {
    pub total_blocks: u64,
    pub contract_records: u64,
    pub latest_hash: String,
}
