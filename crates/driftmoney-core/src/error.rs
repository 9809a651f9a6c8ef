//! Error types for driftmoney-core

use thiserror::Error;

/// Result type alias using driftmoney-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in driftmoney-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// `SQLite` error, including constraint violations
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while converting entities
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A schema migration failed; the version marker was not advanced past it
    #[error("Migration {version} failed: {source}")]
    Migration {
        /// Version of the migration that failed
        version: u32,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Stored schema version marker is unreadable
    #[error("Invalid schema version marker: {0}")]
    InvalidVersion(String),

    /// A value cannot be represented in storage or entity form
    #[error("Codec error: {0}")]
    Codec(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Wrap a failure raised inside migration `version`.
    pub fn migration(version: u32, source: Self) -> Self {
        Self::Migration {
            version,
            source: Box::new(source),
        }
    }
}
