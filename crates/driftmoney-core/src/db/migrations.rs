//! Database migrations
//!
//! Forward-only, versioned schema changes. The applied version is kept in the
//! settings table under `db_version`. Each migration runs in its own
//! transaction together with the version bump, so a failure leaves the
//! database at the last fully applied version and a retry resumes from there.

use std::collections::HashSet;

use rusqlite::{params, Connection, Transaction};

use super::query::{get_setting, set_setting};
use crate::error::{Error, Result};

/// Settings key holding the applied schema version
pub const VERSION_KEY: &str = "db_version";

/// Current schema version
pub const CURRENT_VERSION: u32 = 5;

/// One schema-change procedure
#[derive(Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub up: fn(&Transaction<'_>) -> Result<()>,
}

impl std::fmt::Debug for Migration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Outcome of a migration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
    pub applied: Vec<u32>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Built-in migrations, in ascending order
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        up: migrate_v1,
    },
    Migration {
        version: 2,
        name: "budgets_and_debts",
        up: migrate_v2,
    },
    Migration {
        version: 3,
        name: "import_batches",
        up: migrate_v3,
    },
    Migration {
        version: 4,
        name: "rebuild_transactions_type_check",
        up: migrate_v4,
    },
    Migration {
        version: 5,
        name: "transactions_import_batch_index",
        up: migrate_v5,
    },
];

/// Run all pending built-in migrations
pub fn run(conn: &Connection) -> Result<MigrationReport> {
    run_migrations(conn, MIGRATIONS)
}

/// Run every migration in `migrations` newer than the current version.
///
/// Migrations are applied in ascending version order. The version marker is
/// written in the same transaction as each migration body.
pub fn run_migrations(conn: &Connection, migrations: &[Migration]) -> Result<MigrationReport> {
    validate(migrations)?;

    let from_version = current_version(conn)?;
    let mut pending: Vec<&Migration> = migrations
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    pending.sort_by_key(|migration| migration.version);

    let mut report = MigrationReport {
        from_version,
        to_version: from_version,
        applied: Vec::with_capacity(pending.len()),
    };

    for migration in pending {
        apply(conn, migration)?;
        report.to_version = migration.version;
        report.applied.push(migration.version);
        tracing::info!(
            "Migrated database to version {} ({})",
            migration.version,
            migration.name
        );
    }

    Ok(report)
}

/// Get the current schema version
///
/// A missing settings table or a missing key both mean version 0.
pub fn current_version(conn: &Connection) -> Result<u32> {
    if !table_exists(conn, "settings")? {
        return Ok(0);
    }

    match get_setting(conn, VERSION_KEY)? {
        None => Ok(0),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::InvalidVersion(raw.clone())),
    }
}

/// Whether a table exists
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        params![table],
        |row| row.get(0),
    )?)
}

/// Whether `table` currently has `column`
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2)",
        params![table, column],
        |row| row.get(0),
    )?)
}

fn validate(migrations: &[Migration]) -> Result<()> {
    let mut seen = HashSet::with_capacity(migrations.len());
    for migration in migrations {
        if migration.version == 0 || !seen.insert(migration.version) {
            tracing::warn!(
                "Rejecting migration list: bad or duplicate version {}",
                migration.version
            );
            return Err(Error::InvalidInput(format!(
                "migration versions must be unique and >= 1 (got {} for {})",
                migration.version, migration.name
            )));
        }
    }
    Ok(())
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|error| Error::migration(migration.version, error.into()))?;

    (migration.up)(&tx).map_err(|error| Error::migration(migration.version, error))?;
    set_setting(&tx, VERSION_KEY, &migration.version.to_string())
        .map_err(|error| Error::migration(migration.version, error))?;

    tx.commit()
        .map_err(|error| Error::migration(migration.version, error.into()))
}

/// Migration to version 1: Initial schema
fn migrate_v1(tx: &Transaction<'_>) -> Result<()> {
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            color TEXT,
            is_archived INTEGER NOT NULL DEFAULT 0,
            sync_status TEXT NOT NULL DEFAULT 'dirty'
                CHECK (sync_status IN ('synced', 'dirty', 'deleted')),
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_categories_sync ON categories(sync_status);

        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            account_type TEXT NOT NULL
                CHECK (account_type IN ('checking', 'savings', 'credit', 'cash', 'loan')),
            balance REAL NOT NULL DEFAULT 0,
            currency TEXT NOT NULL DEFAULT 'USD',
            is_active INTEGER NOT NULL DEFAULT 1,
            linked_debt_id TEXT,
            sync_status TEXT NOT NULL DEFAULT 'dirty'
                CHECK (sync_status IN ('synced', 'dirty', 'deleted')),
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_accounts_sync ON accounts(sync_status);

        CREATE TABLE IF NOT EXISTS transactions (
            id TEXT PRIMARY KEY,
            account_id TEXT,
            category_id TEXT,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            transaction_type TEXT NOT NULL
                CHECK (transaction_type IN ('income', 'expense', 'credit')),
            date TEXT NOT NULL,
            notes TEXT,
            sync_status TEXT NOT NULL DEFAULT 'dirty'
                CHECK (sync_status IN ('synced', 'dirty', 'deleted')),
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date DESC);
        CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);
        CREATE INDEX IF NOT EXISTS idx_transactions_sync ON transactions(sync_status);

        CREATE TABLE IF NOT EXISTS bills (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            due_day INTEGER NOT NULL CHECK (due_day BETWEEN 1 AND 31),
            is_paid INTEGER NOT NULL DEFAULT 0,
            bill_month TEXT NOT NULL,
            category_id TEXT,
            account_id TEXT,
            sync_status TEXT NOT NULL DEFAULT 'dirty'
                CHECK (sync_status IN ('synced', 'dirty', 'deleted')),
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_bills_month ON bills(bill_month);
        CREATE INDEX IF NOT EXISTS idx_bills_sync ON bills(sync_status);",
    )?;
    Ok(())
}

/// Migration to version 2: Budgets and debts
fn migrate_v2(tx: &Transaction<'_>) -> Result<()> {
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS budgets (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            category_id TEXT,
            amount REAL NOT NULL,
            period TEXT NOT NULL CHECK (period IN ('weekly', 'monthly', 'yearly')),
            start_date TEXT NOT NULL,
            end_date TEXT,
            sync_status TEXT NOT NULL DEFAULT 'dirty'
                CHECK (sync_status IN ('synced', 'dirty', 'deleted')),
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_budgets_dates ON budgets(start_date, end_date);
        CREATE INDEX IF NOT EXISTS idx_budgets_sync ON budgets(sync_status);

        CREATE TABLE IF NOT EXISTS debts (
            id TEXT PRIMARY KEY,
            company TEXT NOT NULL,
            balance REAL NOT NULL,
            last_updated TEXT NOT NULL,
            notes TEXT,
            is_recurring INTEGER NOT NULL DEFAULT 1,
            payment_due_day INTEGER CHECK (payment_due_day BETWEEN 1 AND 31),
            payment_frequency TEXT,
            minimum_payment REAL,
            sync_status TEXT NOT NULL DEFAULT 'dirty'
                CHECK (sync_status IN ('synced', 'dirty', 'deleted')),
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_debts_sync ON debts(sync_status);",
    )?;
    Ok(())
}

/// Migration to version 3: Import batches for scanned documents
fn migrate_v3(tx: &Transaction<'_>) -> Result<()> {
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS import_batches (
            id TEXT PRIMARY KEY,
            document_type TEXT NOT NULL
                CHECK (document_type IN ('bank_statement', 'credit_card', 'bill', 'loan')),
            file_name TEXT,
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'reviewed', 'committed', 'discarded')),
            transaction_count INTEGER NOT NULL DEFAULT 0,
            raw_text TEXT,
            sync_status TEXT NOT NULL DEFAULT 'dirty'
                CHECK (sync_status IN ('synced', 'dirty', 'deleted')),
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_import_batches_status ON import_batches(status);
        CREATE INDEX IF NOT EXISTS idx_import_batches_sync ON import_batches(sync_status);",
    )?;

    if !column_exists(tx, "transactions", "import_batch_id")? {
        tx.execute_batch("ALTER TABLE transactions ADD COLUMN import_batch_id TEXT")?;
    }
    Ok(())
}

/// Migration to version 4: Admit `bill_paid` transactions
///
/// `SQLite` cannot alter a CHECK constraint in place, so the table is rebuilt.
fn migrate_v4(tx: &Transaction<'_>) -> Result<()> {
    tx.execute_batch(
        "DROP TABLE IF EXISTS transactions_new;
        CREATE TABLE transactions_new (
            id TEXT PRIMARY KEY,
            account_id TEXT,
            category_id TEXT,
            import_batch_id TEXT,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            transaction_type TEXT NOT NULL
                CHECK (transaction_type IN ('income', 'expense', 'credit', 'bill_paid')),
            date TEXT NOT NULL,
            notes TEXT,
            sync_status TEXT NOT NULL DEFAULT 'dirty'
                CHECK (sync_status IN ('synced', 'dirty', 'deleted')),
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        INSERT INTO transactions_new (
            id, account_id, category_id, import_batch_id, description, amount,
            transaction_type, date, notes, sync_status, is_deleted, created_at, updated_at
        )
        SELECT
            id, account_id, category_id, import_batch_id, description, amount,
            transaction_type, date, notes, sync_status, is_deleted, created_at, updated_at
        FROM transactions;

        DROP TABLE transactions;
        ALTER TABLE transactions_new RENAME TO transactions;

        CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date DESC);
        CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);
        CREATE INDEX IF NOT EXISTS idx_transactions_sync ON transactions(sync_status);",
    )?;
    Ok(())
}

/// Migration to version 5: Index transactions by import batch
///
/// A shipped build of migration 4 rebuilt `transactions` without
/// `import_batch_id`, so the column is re-checked before indexing it.
fn migrate_v5(tx: &Transaction<'_>) -> Result<()> {
    if !column_exists(tx, "transactions", "import_batch_id")? {
        tracing::warn!("transactions.import_batch_id missing after rebuild; restoring it");
        tx.execute_batch("ALTER TABLE transactions ADD COLUMN import_batch_id TEXT")?;
    }
    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_transactions_import_batch
            ON transactions(import_batch_id)",
    )?;
    Ok(())
}
