//! Account model

use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// Kind of money container an account represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
    Credit,
    Cash,
    Loan,
}

impl AccountType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Credit => "credit",
            Self::Cash => "cash",
            Self::Loan => "loan",
        }
    }
}

/// A bank, card, cash or loan account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    pub balance: f64,
    /// ISO 4217 code
    pub currency: String,
    pub is_active: bool,
    /// Debt this account pays down, if any. May point at a deleted debt.
    pub linked_debt_id: Option<String>,
    pub sync_status: SyncStatus,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating an account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub account_type: AccountType,
    pub balance: f64,
    pub currency: String,
    pub is_active: bool,
    pub linked_debt_id: Option<String>,
}

impl NewAccount {
    /// Active account with the given name, type and currency and a zero balance.
    pub fn new(
        name: impl Into<String>,
        account_type: AccountType,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            account_type,
            balance: 0.0,
            currency: currency.into(),
            is_active: true,
            linked_debt_id: None,
        }
    }
}

/// Partial update of an account; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_debt_id: Option<Option<String>>,
}
