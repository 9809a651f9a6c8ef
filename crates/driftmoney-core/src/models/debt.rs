//! Debt model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// An outstanding balance owed to a company (loan, card, payable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: String,
    pub company: String,
    pub balance: f64,
    /// Date the balance was last confirmed
    pub last_updated: NaiveDate,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub payment_due_day: Option<i64>,
    /// e.g. `monthly`, `biweekly`
    pub payment_frequency: Option<String>,
    pub minimum_payment: Option<f64>,
    pub sync_status: SyncStatus,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating a debt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDebt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub company: String,
    pub balance: f64,
    pub last_updated: NaiveDate,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub payment_due_day: Option<i64>,
    pub payment_frequency: Option<String>,
    pub minimum_payment: Option<f64>,
}

impl NewDebt {
    /// Recurring monthly debt with no due day or minimum payment yet.
    pub fn new(company: impl Into<String>, balance: f64, last_updated: NaiveDate) -> Self {
        Self {
            id: None,
            company: company.into(),
            balance,
            last_updated,
            notes: None,
            is_recurring: true,
            payment_due_day: None,
            payment_frequency: Some("monthly".to_string()),
            minimum_payment: None,
        }
    }
}

/// Partial update of a debt; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_due_day: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_frequency: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_payment: Option<Option<f64>>,
}
