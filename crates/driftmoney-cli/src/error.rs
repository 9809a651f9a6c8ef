use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] driftmoney_core::Error),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to read payload {path}: {source}")]
    PayloadRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid setting value: {0}")]
    InvalidSetting(String),
    #[error("Could not determine a data directory; pass --db-path or set DRIFTMONEY_DB_PATH")]
    NoDataDir,
}
