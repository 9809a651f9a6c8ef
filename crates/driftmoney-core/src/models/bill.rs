//! Bill model

use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// A recurring bill instance for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub name: String,
    pub amount: f64,
    /// Day of month the bill is due (1-31)
    pub due_day: i64,
    pub is_paid: bool,
    /// Month the bill belongs to (`YYYY-MM`)
    pub bill_month: String,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
    pub sync_status: SyncStatus,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating a bill
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub amount: f64,
    pub due_day: i64,
    #[serde(default)]
    pub is_paid: bool,
    pub bill_month: String,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
}

impl NewBill {
    /// Unpaid bill without category or account.
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        due_day: i64,
        bill_month: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            amount,
            due_day,
            is_paid: false,
            bill_month: bill_month.into(),
            category_id: None,
            account_id: None,
        }
    }
}

/// Partial update of a bill; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Option<String>>,
}
