//! Sync payloads exchanged with the remote side.
//!
//! The shape is one camelCase array per kind. Kinds missing from a payload
//! are treated as empty.

use driftmoney_core::db::{Entity, Repository, SqliteRepository};
use driftmoney_core::models::{Account, Bill, Budget, Category, Debt, ImportBatch, Transaction};
use driftmoney_core::MergeOutcome;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::commands::common::find_dirty;
use crate::error::CliError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncPayload {
    pub categories: Vec<Category>,
    pub accounts: Vec<Account>,
    pub debts: Vec<Debt>,
    pub import_batches: Vec<ImportBatch>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub bills: Vec<Bill>,
}

impl SyncPayload {
    pub fn len(&self) -> usize {
        self.categories.len()
            + self.accounts.len()
            + self.debts.len()
            + self.import_batches.len()
            + self.transactions.len()
            + self.budgets.len()
            + self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Merge results for one kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeCounts {
    pub inserted: usize,
    pub overwritten: usize,
    pub kept_local: usize,
}

impl MergeCounts {
    fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Inserted => self.inserted += 1,
            MergeOutcome::Overwritten => self.overwritten += 1,
            MergeOutcome::KeptLocal => self.kept_local += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplySummary {
    pub categories: MergeCounts,
    pub accounts: MergeCounts,
    pub debts: MergeCounts,
    pub import_batches: MergeCounts,
    pub transactions: MergeCounts,
    pub budgets: MergeCounts,
    pub bills: MergeCounts,
}

impl ApplySummary {
    pub fn rows(&self) -> [(&'static str, MergeCounts); 7] {
        [
            ("categories", self.categories),
            ("accounts", self.accounts),
            ("debts", self.debts),
            ("importBatches", self.import_batches),
            ("transactions", self.transactions),
            ("budgets", self.budgets),
            ("bills", self.bills),
        ]
    }
}

/// Gather every pending record into one upload payload.
pub fn collect_dirty(conn: &Connection) -> Result<SyncPayload, CliError> {
    Ok(SyncPayload {
        categories: find_dirty(conn)?,
        accounts: find_dirty(conn)?,
        debts: find_dirty(conn)?,
        import_batches: find_dirty(conn)?,
        transactions: find_dirty(conn)?,
        budgets: find_dirty(conn)?,
        bills: find_dirty(conn)?,
    })
}

/// Merge a downloaded payload. All records land or none do.
pub fn apply_payload(conn: &Connection, payload: &SyncPayload) -> Result<ApplySummary, CliError> {
    let tx = conn.unchecked_transaction()?;
    let summary = ApplySummary {
        categories: merge_all(conn, &payload.categories)?,
        accounts: merge_all(conn, &payload.accounts)?,
        debts: merge_all(conn, &payload.debts)?,
        import_batches: merge_all(conn, &payload.import_batches)?,
        transactions: merge_all(conn, &payload.transactions)?,
        budgets: merge_all(conn, &payload.budgets)?,
        bills: merge_all(conn, &payload.bills)?,
    };
    tx.commit()?;
    Ok(summary)
}

fn merge_all<T: Entity>(conn: &Connection, records: &[T]) -> Result<MergeCounts, CliError> {
    let repo = SqliteRepository::<T>::new(conn);
    let mut counts = MergeCounts::default();
    for record in records {
        counts.record(repo.upsert_from_cloud(record)?);
    }
    if !records.is_empty() {
        tracing::info!(
            table = T::SCHEMA.table,
            inserted = counts.inserted,
            overwritten = counts.overwritten,
            kept_local = counts.kept_local,
            "Applied remote records"
        );
    }
    Ok(counts)
}
