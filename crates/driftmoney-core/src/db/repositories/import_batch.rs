//! Import batch repository
//!
//! Batches own the transactions extracted from one document, so discarding
//! a batch also tombstones the transactions that reference it. Syncing does
//! not cascade: only uploaded ids are ever marked synced.

use crate::db::codec::{EntitySchema, FieldDef};
use crate::db::query::{soft_delete, soft_delete_where, with_transaction, WhereClause};
use crate::db::repository::{sync_accessors, Entity, EntityFilter, Repository, SqliteRepository};
use crate::error::Result;
use crate::models::{ImportBatch, ImportBatchPatch, ImportStatus, NewImportBatch, Transaction};

#[derive(Debug, Clone, Default)]
pub struct ImportBatchFilter {
    pub status: Option<ImportStatus>,
}

impl EntityFilter for ImportBatchFilter {
    fn apply(&self, clause: &mut WhereClause) {
        clause.push_eq("status", self.status.map(ImportStatus::as_str));
    }
}

impl Entity for ImportBatch {
    const SCHEMA: &'static EntitySchema = &EntitySchema {
        table: "import_batches",
        fields: &[
            FieldDef::text("documentType"),
            FieldDef::text("fileName"),
            FieldDef::text("status"),
            FieldDef::integer("transactionCount"),
            FieldDef::text("rawText"),
        ],
        order_by: "created_at DESC, id",
    };

    type Draft = NewImportBatch;
    type Patch = ImportBatchPatch;
    type Filter = ImportBatchFilter;

    sync_accessors!();
}

/// Batch-level operations
pub trait ImportBatchRepository: Repository<ImportBatch> {
    /// Throw away a batch and every transaction extracted from it.
    ///
    /// Returns `false` when no live batch has that id.
    fn discard(&self, batch_id: &str) -> Result<bool>;

    /// Mark uploaded batches and uploaded transactions synced in one go.
    ///
    /// Transactions are matched by their own ids, never through the batch
    /// they reference, so a line added after the upload stays dirty.
    fn mark_synced_with_transactions<B, T>(
        &self,
        batch_ids: &[B],
        transaction_ids: &[T],
    ) -> Result<usize>
    where
        B: AsRef<str>,
        T: AsRef<str>;
}

impl ImportBatchRepository for SqliteRepository<'_, ImportBatch> {
    fn discard(&self, batch_id: &str) -> Result<bool> {
        let conn = self.connection();
        with_transaction(conn, || {
            if self.find_by_id(batch_id)?.is_none() {
                return Ok(false);
            }

            let transactions =
                soft_delete_where(conn, Transaction::SCHEMA.table, "import_batch_id", batch_id)?;
            self.update(
                batch_id,
                ImportBatchPatch {
                    status: Some(ImportStatus::Discarded),
                    ..Default::default()
                },
            )?;
            soft_delete(conn, ImportBatch::SCHEMA.table, batch_id)?;

            tracing::debug!(batch_id, transactions, "Discarded import batch");
            Ok(true)
        })
    }

    fn mark_synced_with_transactions<B, T>(
        &self,
        batch_ids: &[B],
        transaction_ids: &[T],
    ) -> Result<usize>
    where
        B: AsRef<str>,
        T: AsRef<str>,
    {
        if batch_ids.is_empty() && transaction_ids.is_empty() {
            return Ok(0);
        }

        let conn = self.connection();
        with_transaction(conn, || {
            let batches = self.mark_synced(batch_ids)?;
            let transactions =
                SqliteRepository::<Transaction>::new(conn).mark_synced(transaction_ids)?;
            Ok(batches + transactions)
        })
    }
}

pub type SqliteImportBatchRepository<'a> = SqliteRepository<'a, ImportBatch>;
