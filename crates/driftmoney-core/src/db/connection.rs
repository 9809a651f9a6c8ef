//! Database connection management

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

use super::migrations::{self, MigrationReport};
use crate::error::Result;

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Owner of the single on-device `SQLite` connection.
///
/// Repositories borrow the connection through [`Database::connection`]; there
/// is no pooling because `SQLite` serializes access internally.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let database = Self::open_unmigrated(path)?;
        database.migrate()?;
        Ok(database)
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let database = Self::open_in_memory_unmigrated()?;
        database.migrate()?;
        Ok(database)
    }

    /// Open a database with only the settings table bootstrapped.
    ///
    /// Lets callers drive the migration engine themselves.
    pub fn open_unmigrated(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        let database = Self {
            conn,
            path: Some(path),
        };
        database.configure()?;
        database.bootstrap()?;
        tracing::debug!("Opened database at {}", database.describe());
        Ok(database)
    }

    /// In-memory counterpart of [`Database::open_unmigrated`].
    pub fn open_in_memory_unmigrated() -> Result<Self> {
        let database = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        database.configure()?;
        database.bootstrap()?;
        Ok(database)
    }

    /// Configure `SQLite` for on-device use
    fn configure(&self) -> Result<()> {
        self.conn.busy_timeout(BUSY_TIMEOUT)?;
        if self.path.is_some() {
            // Reports the resulting mode as a row
            let mode: String =
                self.conn
                    .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            tracing::debug!("Journal mode: {mode}");
            self.conn.pragma_update(None, "synchronous", "NORMAL")?;
        }
        // References between entities may dangle by design
        self.conn.pragma_update(None, "foreign_keys", false)?;
        Ok(())
    }

    /// Make sure the settings table exists before any migration logic runs
    fn bootstrap(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )?;
        Ok(())
    }

    /// Run all pending built-in migrations
    pub fn migrate(&self) -> Result<MigrationReport> {
        migrations::run(&self.conn)
    }

    /// Current schema version
    pub fn schema_version(&self) -> Result<u32> {
        migrations::current_version(&self.conn)
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Path of the database file, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the connection, surfacing any error `SQLite` reports.
    pub fn close(self) -> Result<()> {
        let description = self.describe();
        self.conn.close().map_err(|(_, error)| error)?;
        tracing::debug!("Closed database at {description}");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| ":memory:".to_string(), |path| path.display().to_string())
    }
}
