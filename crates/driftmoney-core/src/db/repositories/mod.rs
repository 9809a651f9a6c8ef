//! Per-kind repositories
//!
//! Each module declares its kind's storage schema and listing filter and adds
//! the queries only that kind needs on top of [`super::Repository`].

mod account;
mod bill;
mod budget;
mod category;
mod debt;
mod import_batch;
mod transaction;

pub use account::{AccountFilter, AccountRepository, SqliteAccountRepository};
pub use bill::{BillFilter, BillRepository, SqliteBillRepository};
pub use budget::{BudgetFilter, BudgetRepository, SqliteBudgetRepository};
pub use category::{CategoryFilter, CategoryRepository, SqliteCategoryRepository};
pub use debt::{DebtFilter, SqliteDebtRepository};
pub use import_batch::{ImportBatchFilter, ImportBatchRepository, SqliteImportBatchRepository};
pub use transaction::{
    CategoryTotal, SqliteTransactionRepository, TransactionFilter, TransactionRepository,
};
