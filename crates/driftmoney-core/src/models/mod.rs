//! Data models for DriftMoney

mod account;
mod bill;
mod budget;
mod category;
mod debt;
mod import_batch;
mod settings;
mod sync_status;
mod transaction;

pub use account::{Account, AccountPatch, AccountType, NewAccount};
pub use bill::{Bill, BillPatch, NewBill};
pub use budget::{Budget, BudgetPatch, BudgetPeriod, NewBudget};
pub use category::{Category, CategoryKind, CategoryPatch, NewCategory};
pub use debt::{Debt, DebtPatch, NewDebt};
pub use import_batch::{DocumentType, ImportBatch, ImportBatchPatch, ImportStatus, NewImportBatch};
pub use settings::Settings;
pub use sync_status::SyncStatus;
pub use transaction::{NewTransaction, Transaction, TransactionPatch, TransactionType};
