//! Command-line definition for `accountctl`.

use std::path::PathBuf;

use accounts_db::entities::AccountStatus;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "accountctl")]
#[command(about = "Account status administration", long_about = None)]
pub struct Cli {
    /// Config file to load instead of `config/default.toml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run pending database migrations
    Migrate,
    /// Register a new inactive account
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Print an account as JSON
    Show { id: String },
    /// Mark an account deleted, keeping the row
    SoftDelete { id: String },
    /// Ban an account
    Ban { id: String },
    /// Suspend an account
    Suspend { id: String },
    /// Activate an account, leaving status timestamps as they are
    Activate { id: String },
    /// Activate an account and clear all status timestamps
    Reactivate { id: String },
    /// Permanently remove an account row, skipping removal hooks
    HardDelete { id: String },
    /// Permanently remove an account row, running removal hooks
    HardDestroy { id: String },
    /// List accounts in a status
    List {
        status: AccountStatus,
        #[arg(long, default_value_t = 20)]
        limit: u64,
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    /// Count accounts per status
    Stats,
}
