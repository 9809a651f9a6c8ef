use std::env;
use std::path::{Path, PathBuf};

use driftmoney_core::db::{Entity, Repository, SqliteRepository};
use driftmoney_core::Database;
use rusqlite::Connection;
use serde::Serialize;

use crate::error::CliError;

pub const DB_PATH_ENV: &str = "DRIFTMONEY_DB_PATH";

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    resolve_db_path_from(cli_db_path, env::var_os(DB_PATH_ENV).map(PathBuf::from))
}

/// `--db-path` wins over the environment, which wins over the data directory.
pub fn resolve_db_path_from(
    cli_db_path: Option<PathBuf>,
    env_db_path: Option<PathBuf>,
) -> Result<PathBuf, CliError> {
    match cli_db_path.or(env_db_path) {
        Some(path) => Ok(path),
        None => default_db_path(),
    }
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    dirs::data_dir()
        .map(|dir| dir.join("driftmoney").join("driftmoney.db"))
        .ok_or(CliError::NoDataDir)
}

pub fn open_database(path: &Path) -> Result<Database, CliError> {
    let db = Database::open(path)?;
    tracing::debug!("Using database at {}", path.display());
    Ok(db)
}

/// Row counts of one entity table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub table: &'static str,
    pub live: i64,
    pub pending: i64,
    pub tombstones: i64,
}

pub fn table_stats(conn: &Connection, table: &'static str) -> Result<TableStats, CliError> {
    let (live, pending, tombstones) = conn.query_row(
        &format!(
            "SELECT
                COALESCE(SUM(is_deleted = 0), 0),
                COALESCE(SUM(sync_status IN ('dirty', 'deleted')), 0),
                COALESCE(SUM(is_deleted = 1), 0)
             FROM \"{table}\""
        ),
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    Ok(TableStats {
        table,
        live,
        pending,
        tombstones,
    })
}

pub fn find_dirty<T: Entity>(conn: &Connection) -> Result<Vec<T>, CliError> {
    Ok(SqliteRepository::<T>::new(conn).find_dirty()?)
}
