//! Transaction model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// Direction and nature of a money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
    Credit,
    /// Payment of a tracked bill
    BillPaid,
}

impl TransactionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Credit => "credit",
            Self::BillPaid => "bill_paid",
        }
    }

    /// Whether the transaction counts as spending
    pub const fn is_outflow(self) -> bool {
        matches!(self, Self::Expense | Self::BillPaid)
    }
}

/// A single money movement, entered by hand or produced by a document import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: Option<String>,
    /// May point at a deleted category; treat that as "unknown"
    pub category_id: Option<String>,
    pub import_batch_id: Option<String>,
    pub description: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub sync_status: SyncStatus,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub account_id: Option<String>,
    pub category_id: Option<String>,
    pub import_batch_id: Option<String>,
    pub description: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        transaction_type: TransactionType,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            account_id: None,
            category_id: None,
            import_batch_id: None,
            description: description.into(),
            amount,
            transaction_type,
            date,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    #[must_use]
    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    #[must_use]
    pub fn with_import_batch(mut self, import_batch_id: impl Into<String>) -> Self {
        self.import_batch_id = Some(import_batch_id.into());
        self
    }
}

/// Partial update of a transaction; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_batch_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}
