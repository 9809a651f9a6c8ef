//! Import batch model
//!
//! An import batch groups the records extracted from one scanned document
//! (statement, card bill, loan letter) so they can be reviewed, committed or
//! thrown away together.

use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// Kind of document the batch was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    BankStatement,
    CreditCard,
    Bill,
    Loan,
}

impl DocumentType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BankStatement => "bank_statement",
            Self::CreditCard => "credit_card",
            Self::Bill => "bill",
            Self::Loan => "loan",
        }
    }
}

/// Review state of an import batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    #[default]
    Pending,
    Reviewed,
    Committed,
    Discarded,
}

impl ImportStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Committed => "committed",
            Self::Discarded => "discarded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatch {
    pub id: String,
    pub document_type: DocumentType,
    pub file_name: Option<String>,
    pub status: ImportStatus,
    pub transaction_count: i64,
    /// OCR text kept for re-parsing
    pub raw_text: Option<String>,
    pub sync_status: SyncStatus,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating an import batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewImportBatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub document_type: DocumentType,
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: ImportStatus,
    #[serde(default)]
    pub transaction_count: i64,
    pub raw_text: Option<String>,
}

/// Partial update of an import batch; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatchPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ImportStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<Option<String>>,
}
