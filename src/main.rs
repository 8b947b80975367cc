//! Contract-Ledger CLI Application
//!
//! A command-line interface for creating, transferring and querying
//! contracts recorded on the ledger.

use clap::{Parser, Subcommand};
use contract_ledger::cli::{self, AppState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "contract-ledger")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "Blockchain smart contract system", long_about = None)]
struct Cli {
    /// Data directory holding the block and contract logs
    #[arg(short, long, default_value = ".ledger_data")]
    data_dir: PathBuf,

    /// Recompute block hashes while loading instead of trusting the log
    #[arg(long)]
    verify_on_load: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new contract
    Create {
        creator: String,
        beneficiary: String,
        figure: String,
    },

    /// Transfer a contract
    Transfer { creator: String, beneficiary: String },

    /// Query a contract status
    Query { creator: String, beneficiary: String },

    /// Print the blockchain
    Chain,

    /// Validate the blockchain
    Validate,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut state = AppState::new(cli.data_dir, cli.verify_on_load)?;

    match cli.command {
        Commands::Create {
            creator,
            beneficiary,
            figure,
        } => cli::cmd_create(&mut state, &creator, &beneficiary, &figure)?,
        Commands::Transfer {
            creator,
            beneficiary,
        } => cli::cmd_transfer(&mut state, &creator, &beneficiary)?,
        Commands::Query {
            creator,
            beneficiary,
        } => cli::cmd_query(&state, &creator, &beneficiary)?,
        Commands::Chain => cli::cmd_chain(&state)?,
        Commands::Validate => cli::cmd_validate(&state)?,
    }

    Ok(())
}
