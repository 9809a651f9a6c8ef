use std::path::Path;

use driftmoney_core::db::{Entity, ImportBatchRepository, Repository, SqliteRepository};
use driftmoney_core::models::{Account, Bill, Budget, Category, Debt, ImportBatch, Transaction};
use rusqlite::Connection;

use crate::cli::EntityKind;
use crate::commands::common::open_database;
use crate::error::CliError;

pub fn run_mark_synced(
    kind: EntityKind,
    ids: &[String],
    transaction_ids: &[String],
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let updated = mark_synced(db.connection(), kind, ids, transaction_ids)?;
    println!("Marked {updated} record(s) synced");
    Ok(())
}

/// Mark `ids` of `kind` synced. `transaction_ids` only apply to import batches.
pub fn mark_synced(
    conn: &Connection,
    kind: EntityKind,
    ids: &[String],
    transaction_ids: &[String],
) -> Result<usize, CliError> {
    if !transaction_ids.is_empty() && kind != EntityKind::ImportBatches {
        return Err(CliError::InvalidArgument(
            "--transaction is only accepted with import-batches".to_string(),
        ));
    }

    match kind {
        EntityKind::Categories => mark::<Category>(conn, ids),
        EntityKind::Accounts => mark::<Account>(conn, ids),
        EntityKind::Debts => mark::<Debt>(conn, ids),
        EntityKind::ImportBatches => Ok(SqliteRepository::<ImportBatch>::new(conn)
            .mark_synced_with_transactions(ids, transaction_ids)?),
        EntityKind::Transactions => mark::<Transaction>(conn, ids),
        EntityKind::Budgets => mark::<Budget>(conn, ids),
        EntityKind::Bills => mark::<Bill>(conn, ids),
    }
}

fn mark<T: Entity>(conn: &Connection, ids: &[String]) -> Result<usize, CliError> {
    Ok(SqliteRepository::<T>::new(conn).mark_synced(ids)?)
}
