pub mod add_screen;
pub mod app;
pub mod backup;
pub mod export;
pub mod init;
pub mod status;
pub mod transactions;
pub mod transactions_screen;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::db::{Store, DB_FILENAME};
use crate::error::Result;
use crate::logging;
use crate::models::{AccountType, Category};
use crate::settings::get_data_dir;

/// Open the configured database, creating the data directory and schema if
/// needed.
pub(crate) fn open_store() -> Result<Store> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    logging::init(&data_dir);
    let store = Store::new(data_dir.join(DB_FILENAME));
    store.initialize()?;
    Ok(store)
}

/// `<data_dir>/<subdir>/<prefix>-YYYYMMDD-HHMMSS.<ext>`
pub(crate) fn stamped_path(subdir: &str, prefix: &str, ext: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    get_data_dir()
        .join(subdir)
        .join(format!("{prefix}-{stamp}.{ext}"))
}

pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    name = "betterspend",
    version,
    about = "Manual spending tracker. Run without a subcommand for the interactive app."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for BetterSpend data (default: ~/Documents/betterspend)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Record a new transaction.
    Add {
        /// Where the money went
        #[arg(long)]
        merchant: Option<String>,
        /// Amount spent, greater than 0
        #[arg(long)]
        amount: Option<String>,
        /// One of: groceries, rent, dining, gas, entertainment, utilities,
        /// shopping, travel, health, other
        #[arg(long)]
        category: Option<Category>,
        /// debit, credit or cash
        #[arg(long, default_value_t = AccountType::Debit)]
        account: AccountType,
        /// RFC 3339 timestamp or YYYY-MM-DD (default: now)
        #[arg(long)]
        date: Option<String>,
    },
    /// List all transactions, most recent first.
    List,
    /// Change fields of an existing transaction.
    Edit {
        /// Transaction ID
        id: String,
        #[arg(long)]
        merchant: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        account: Option<AccountType>,
        /// RFC 3339 timestamp or YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a transaction.
    Delete {
        /// Transaction ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Export all transactions to CSV.
    Export {
        /// Output path (default: <data_dir>/exports/transactions-YYYYMMDD-HHMMSS.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Back up the database.
    Backup {
        /// Output path (default: <data_dir>/backups/betterspend-YYYYMMDD-HHMMSS.db)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show current database and summary statistics.
    Status,
}
