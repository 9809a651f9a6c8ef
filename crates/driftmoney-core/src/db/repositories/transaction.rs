//! Transaction repository

use chrono::NaiveDate;
use rusqlite::params;
use rusqlite::types::Value as SqlValue;
use serde::{Deserialize, Serialize};

use crate::db::codec::{EntitySchema, FieldDef};
use crate::db::query::WhereClause;
use crate::db::repository::{sync_accessors, Entity, EntityFilter, Repository, SqliteRepository};
use crate::error::Result;
use crate::models::{NewTransaction, Transaction, TransactionPatch, TransactionType};

/// Listing filter for transactions. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub account_id: Option<String>,
    pub category_id: Option<String>,
    pub import_batch_id: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl EntityFilter for TransactionFilter {
    fn apply(&self, clause: &mut WhereClause) {
        clause.push_eq("account_id", self.account_id.as_deref());
        clause.push_eq("category_id", self.category_id.as_deref());
        clause.push_eq("import_batch_id", self.import_batch_id.as_deref());
        clause.push_eq(
            "transaction_type",
            self.transaction_type.map(TransactionType::as_str),
        );
        if let Some(start) = self.start_date {
            clause.push("date >= ?", [SqlValue::Text(start.to_string())]);
        }
        if let Some(end) = self.end_date {
            clause.push("date <= ?", [SqlValue::Text(end.to_string())]);
        }
    }
}

impl Entity for Transaction {
    const SCHEMA: &'static EntitySchema = &EntitySchema {
        table: "transactions",
        fields: &[
            FieldDef::text("accountId"),
            FieldDef::text("categoryId"),
            FieldDef::text("importBatchId"),
            FieldDef::text("description"),
            FieldDef::real("amount"),
            FieldDef::text("transactionType"),
            FieldDef::text("date"),
            FieldDef::text("notes"),
        ],
        order_by: "date DESC, created_at DESC, id",
    };

    type Draft = NewTransaction;
    type Patch = TransactionPatch;
    type Filter = TransactionFilter;

    sync_accessors!();
}

/// Outflow total for one category over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    /// `None` groups uncategorized spending and deleted or unknown categories
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub total: f64,
    pub transaction_count: i64,
}

/// Transaction-specific queries
pub trait TransactionRepository: Repository<Transaction> {
    /// Outflows between `start` and `end` (inclusive), grouped by category,
    /// largest first.
    fn spending_by_category(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CategoryTotal>>;
}

impl TransactionRepository for SqliteRepository<'_, Transaction> {
    fn spending_by_category(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CategoryTotal>> {
        let mut stmt = self.connection().prepare(
            "SELECT c.id, c.name, SUM(t.amount), COUNT(*)
             FROM transactions t
             LEFT JOIN categories c ON c.id = t.category_id AND c.is_deleted = 0
             WHERE t.is_deleted = 0
               AND t.transaction_type IN ('expense', 'bill_paid')
               AND t.date >= ?1 AND t.date <= ?2
             GROUP BY c.id
             ORDER BY SUM(t.amount) DESC, c.name",
        )?;

        let totals = stmt
            .query_map(params![start.to_string(), end.to_string()], |row| {
                Ok(CategoryTotal {
                    category_id: row.get(0)?,
                    category_name: row.get(1)?,
                    total: row.get(2)?,
                    transaction_count: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(totals)
    }
}

pub type SqliteTransactionRepository<'a> = SqliteRepository<'a, Transaction>;
