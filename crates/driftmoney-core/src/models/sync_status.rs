//! Sync status of a persisted record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Reconciliation state of a record against the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Matches the remote copy
    Synced,
    /// Has local changes not yet acknowledged by the remote store
    #[default]
    Dirty,
    /// Tombstoned locally, deletion not yet acknowledged
    Deleted,
}

impl SyncStatus {
    /// Storage representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Synced => "synced",
            Self::Dirty => "dirty",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "synced" => Ok(Self::Synced),
            "dirty" => Ok(Self::Dirty),
            "deleted" => Ok(Self::Deleted),
            other => Err(Error::InvalidInput(format!("unknown sync status: {other}"))),
        }
    }
}
