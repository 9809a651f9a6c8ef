//! Database layer for DriftMoney

pub mod codec;
mod connection;
pub mod migrations;
pub mod query;
mod repositories;
mod repository;
mod settings_repository;

pub use connection::Database;
pub use migrations::{Migration, MigrationReport, CURRENT_VERSION};
pub use repositories::{
    AccountFilter, AccountRepository, BillFilter, BillRepository, BudgetFilter, BudgetRepository,
    CategoryFilter, CategoryRepository, CategoryTotal, DebtFilter, ImportBatchFilter,
    ImportBatchRepository, SqliteAccountRepository, SqliteBillRepository, SqliteBudgetRepository,
    SqliteCategoryRepository, SqliteDebtRepository, SqliteImportBatchRepository,
    SqliteTransactionRepository, TransactionFilter, TransactionRepository,
};
pub use repository::{Entity, EntityFilter, MergeOutcome, Repository, SqliteRepository};
pub use settings_repository::{SettingsRepository, SqliteSettingsRepository};
