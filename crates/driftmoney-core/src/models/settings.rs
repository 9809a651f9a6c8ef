//! Local settings model

use serde::{Deserialize, Serialize};

/// Device-local settings kept in the settings table.
///
/// These are never sync-tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Override for the remote sync endpoint
    pub sync_endpoint: Option<String>,
    /// Currency used for new accounts (ISO 4217)
    pub default_currency: String,
    /// Completion time of the last successful sync round
    pub last_synced_at: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sync_endpoint: None,
            default_currency: "USD".to_string(),
            last_synced_at: None,
        }
    }
}
