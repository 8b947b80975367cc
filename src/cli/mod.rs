//! Command handlers used by the `contract-ledger` binary

pub mod commands;

pub use commands::{
    cmd_chain, cmd_create, cmd_query, cmd_transfer, cmd_validate, AppState, CliResult,
};
