//! Two-party value transfer contracts
//!
//! A contract starts out `Created` and moves to `Transferred` once the
//! creator pays the beneficiary. There are no other states.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Raised when a persisted status code is neither 0 nor 1
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown contract status code: {0}")]
pub struct UnknownStatus(pub u8);

/// Lifecycle state of a contract, persisted as `0` / `1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ContractStatus {
    Created,
    Transferred,
}

impl From<ContractStatus> for u8 {
    fn from(status: ContractStatus) -> Self {
        match status {
            ContractStatus::Created => 0,
            ContractStatus::Transferred => 1,
        }
    }
}

impl TryFrom<u8> for ContractStatus {
    type Error = UnknownStatus;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ContractStatus::Created),
            1 => Ok(ContractStatus::Transferred),
            other => Err(UnknownStatus(other)),
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractStatus::Created => write!(f, "created"),
            ContractStatus::Transferred => write!(f, "transferred"),
        }
    }
}

/// Field-value view of a contract at one point in time.
///
/// This is what lands in block payloads and in the binary contract log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    pub creator: String,
    pub beneficiary: String,
    /// Amount being transferred, kept as the caller supplied it
    pub figure: String,
    pub status: ContractStatus,
}

impl ContractSnapshot {
    /// Compact JSON with sorted keys, used as block payload text
    pub fn canonical_text(&self) -> String {
        json!({
            "creator": self.creator,
            "beneficiary": self.beneficiary,
            "figure": self.figure,
            "status": u8::from(self.status),
        })
        .to_string()
    }
}

/// A contract between a creator and a beneficiary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    creator: String,
    beneficiary: String,
    figure: String,
    status: ContractStatus,
}

impl Contract {
    /// Create a new contract in the `Created` state
    pub fn new(
        creator: impl Into<String>,
        beneficiary: impl Into<String>,
        figure: impl Into<String>,
    ) -> Self {
        Self {
            creator: creator.into(),
            beneficiary: beneficiary.into(),
            figure: figure.into(),
            status: ContractStatus::Created,
        }
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn beneficiary(&self) -> &str {
        &self.beneficiary
    }

    pub fn figure(&self) -> &str {
        &self.figure
    }

    pub fn status(&self) -> ContractStatus {
        self.status
    }

    /// Whether this contract is between the given parties
    pub fn is_between(&self, creator: &str, beneficiary: &str) -> bool {
        self.creator == creator && self.beneficiary == beneficiary
    }

    /// Move the contract to `Transferred`. Already transferred contracts
    /// stay transferred.
    pub fn transfer(&mut self) {
        self.status = ContractStatus::Transferred;
        log::info!(
            "{} transferred {} to {}",
            self.creator,
            self.figure,
            self.beneficiary
        );
    }

    /// Current field values
    pub fn snapshot(&self) -> ContractSnapshot {
        ContractSnapshot {
            creator: self.creator.clone(),
            beneficiary: self.beneficiary.clone(),
            figure: self.figure.clone(),
            status: self.status,
        }
    }
}

impl From<ContractSnapshot> for Contract {
    fn from(snapshot: ContractSnapshot) -> Self {
        Self {
            creator: snapshot.creator,
            beneficiary: snapshot.beneficiary,
            figure: snapshot.figure,
            status: snapshot.status,
        }
    }
}
