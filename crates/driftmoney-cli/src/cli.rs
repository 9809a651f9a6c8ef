use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use driftmoney_core::db::Entity;
use driftmoney_core::models::{Account, Bill, Budget, Category, Debt, ImportBatch, Transaction};

#[derive(Parser)]
#[command(name = "driftmoney")]
#[command(about = "Inspect and sync the local DriftMoney store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or upgrade the database and print its schema version
    Migrate,
    /// Show the schema version and per-table sync counts
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show records waiting to be uploaded
    Dirty {
        /// Print the full upload payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// Merge a JSON sync payload into the local store
    Apply {
        /// Payload file, keyed by kind (`{"budgets": [...], ...}`)
        file: PathBuf,
        /// Output the merge summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Flag records as uploaded
    ///
    /// Only the listed IDs change. With `import-batches`, uploaded transaction
    /// IDs can be passed via `--transaction` to mark them in the same step.
    MarkSynced {
        /// Record kind
        #[arg(value_enum)]
        kind: EntityKind,
        /// Record IDs
        #[arg(required = true)]
        ids: Vec<String>,
        /// Uploaded transaction ID to mark along with the batches (repeatable)
        #[arg(long = "transaction", value_name = "ID")]
        transactions: Vec<String>,
    },
    /// Read or change device settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print one setting, or all of them
    Get {
        #[arg(value_enum)]
        key: Option<SettingKey>,
    },
    /// Change a setting; an empty value clears optional settings
    Set {
        #[arg(value_enum)]
        key: SettingKey,
        value: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SettingKey {
    SyncEndpoint,
    DefaultCurrency,
}

/// Sync-tracked record kinds, in upload order
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum EntityKind {
    Categories,
    Accounts,
    Debts,
    ImportBatches,
    Transactions,
    Budgets,
    Bills,
}

impl EntityKind {
    pub const ALL: [Self; 7] = [
        Self::Categories,
        Self::Accounts,
        Self::Debts,
        Self::ImportBatches,
        Self::Transactions,
        Self::Budgets,
        Self::Bills,
    ];

    /// Storage table backing this kind
    pub const fn table(self) -> &'static str {
        match self {
            Self::Categories => Category::SCHEMA.table,
            Self::Accounts => Account::SCHEMA.table,
            Self::Debts => Debt::SCHEMA.table,
            Self::ImportBatches => ImportBatch::SCHEMA.table,
            Self::Transactions => Transaction::SCHEMA.table,
            Self::Budgets => Budget::SCHEMA.table,
            Self::Bills => Bill::SCHEMA.table,
        }
    }
}
