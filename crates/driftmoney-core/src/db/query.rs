//! Query primitives shared by every repository
//!
//! Values are always bound as parameters, never spliced into SQL text.
//! Identifiers (table and column names) come from declared schemas and are
//! double-quoted.

use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::codec::{row_to_entity, EntityMap, EntitySchema, StorageRow};
use crate::error::{Error, Result};
use crate::models::SyncStatus;
use crate::util::now_timestamp;

/// Upper bound on bound parameters per `IN (...)` statement.
const MAX_BATCH_PARAMS: usize = 500;

/// A statement plus its bound values, built from a `StorageRow`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Conjunction of SQL conditions with their bound values.
#[derive(Debug, Clone, Default)]
pub struct WhereClause {
    conditions: Vec<String>,
    values: Vec<SqlValue>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition using `?` placeholders, one per value, in order.
    pub fn push(&mut self, condition: impl Into<String>, values: impl IntoIterator<Item = SqlValue>) {
        self.conditions.push(condition.into());
        self.values.extend(values);
    }

    /// Add a condition that binds nothing.
    pub fn push_sql(&mut self, condition: impl Into<String>) {
        self.conditions.push(condition.into());
    }

    /// Add `column = ?` when `value` is present.
    pub fn push_eq(&mut self, column: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.push(
                format!("{} = ?", quote_ident(column)),
                [SqlValue::Text(value.into())],
            );
        }
    }

    /// Render as ` WHERE ...`, or an empty string with no conditions.
    pub fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }
}

/// Double-quote an identifier.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Run a parameterized read and decode every row through the codec.
pub fn query_all(
    conn: &Connection,
    schema: &EntitySchema,
    sql: &str,
    values: &[SqlValue],
) -> Result<Vec<EntityMap>> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    let mut rows = stmt.query(params_from_iter(values.iter()))?;

    let mut entities = Vec::new();
    while let Some(row) = rows.next()? {
        entities.push(row_to_entity(schema, &columns, row)?);
    }
    Ok(entities)
}

/// Run a parameterized read expected to yield at most one row.
pub fn query_one(
    conn: &Connection,
    schema: &EntitySchema,
    sql: &str,
    values: &[SqlValue],
) -> Result<Option<EntityMap>> {
    Ok(query_all(conn, schema, sql, values)?.into_iter().next())
}

/// Run a parameterized write; returns the number of affected rows.
pub fn execute(conn: &Connection, sql: &str, values: &[SqlValue]) -> Result<usize> {
    Ok(conn.execute(sql, params_from_iter(values.iter()))?)
}

/// Run a built statement.
pub fn execute_statement(conn: &Connection, statement: &SqlStatement) -> Result<usize> {
    execute(conn, &statement.sql, &statement.values)
}

/// `INSERT INTO table (cols...) VALUES (?, ...)`
pub fn build_insert(table: &str, row: &StorageRow) -> Result<SqlStatement> {
    if row.is_empty() {
        return Err(Error::InvalidInput(format!(
            "cannot build an INSERT into {table} without columns"
        )));
    }

    let columns: Vec<String> = row.iter().map(|(column, _)| quote_ident(column)).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    Ok(SqlStatement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            quote_ident(table),
            columns.join(", ")
        ),
        values: row.iter().map(|(_, value)| value.clone()).collect(),
    })
}

/// `UPDATE table SET col = ?, ... WHERE id = ?`
pub fn build_update(table: &str, row: &StorageRow, id: &str) -> Result<SqlStatement> {
    if row.is_empty() {
        return Err(Error::InvalidInput(format!(
            "cannot build an UPDATE of {table} without columns"
        )));
    }

    let assignments: Vec<String> = row
        .iter()
        .map(|(column, _)| format!("{} = ?", quote_ident(column)))
        .collect();
    let mut values: Vec<SqlValue> = row.iter().map(|(_, value)| value.clone()).collect();
    values.push(SqlValue::Text(id.to_string()));

    Ok(SqlStatement {
        sql: format!(
            "UPDATE {} SET {} WHERE \"id\" = ?",
            quote_ident(table),
            assignments.join(", ")
        ),
        values,
    })
}

/// Tombstone a live row and refresh its `updated_at`.
///
/// Returns `false` when no live row has that id.
pub fn soft_delete(conn: &Connection, table: &str, id: &str) -> Result<bool> {
    let rows = conn.execute(
        &format!(
            "UPDATE {} SET sync_status = 'deleted', is_deleted = 1,
                 updated_at = MAX(updated_at, ?1)
             WHERE id = ?2 AND is_deleted = 0",
            quote_ident(table)
        ),
        params![now_timestamp(), id],
    )?;
    Ok(rows > 0)
}

/// Tombstone every live row whose `column` equals `value`.
pub fn soft_delete_where(conn: &Connection, table: &str, column: &str, value: &str) -> Result<usize> {
    let rows = conn.execute(
        &format!(
            "UPDATE {} SET sync_status = 'deleted', is_deleted = 1,
                 updated_at = MAX(updated_at, ?1)
             WHERE {} = ?2 AND is_deleted = 0",
            quote_ident(table),
            quote_ident(column)
        ),
        params![now_timestamp(), value],
    )?;
    Ok(rows)
}

/// Physically remove a row. Only for retention/purge callers.
pub fn hard_delete(conn: &Connection, table: &str, id: &str) -> Result<bool> {
    let rows = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", quote_ident(table)),
        params![id],
    )?;
    Ok(rows > 0)
}

/// Every row (tombstones included) whose status is one of `statuses`.
pub fn find_by_sync_status(
    conn: &Connection,
    schema: &EntitySchema,
    statuses: &[SyncStatus],
) -> Result<Vec<EntityMap>> {
    if statuses.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; statuses.len()].join(", ");
    let values: Vec<SqlValue> = statuses
        .iter()
        .map(|status| SqlValue::Text(status.as_str().to_string()))
        .collect();
    query_all(
        conn,
        schema,
        &format!(
            "SELECT * FROM {} WHERE sync_status IN ({placeholders}) ORDER BY updated_at, id",
            quote_ident(schema.table)
        ),
        &values,
    )
}

/// Flip `sync_status` to `synced` for the given ids. Touches nothing else.
///
/// An empty list executes no statement.
pub fn mark_synced(conn: &Connection, table: &str, ids: &[impl AsRef<str>]) -> Result<usize> {
    mark_synced_where(conn, table, "id", ids)
}

/// Flip `sync_status` to `synced` for rows whose `column` is in `keys`.
///
/// An empty list executes no statement.
pub fn mark_synced_where(
    conn: &Connection,
    table: &str,
    column: &str,
    keys: &[impl AsRef<str>],
) -> Result<usize> {
    let mut updated = 0;
    for chunk in keys.chunks(MAX_BATCH_PARAMS) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            "UPDATE {} SET sync_status = 'synced'
             WHERE {} IN ({placeholders}) AND sync_status != 'synced'",
            quote_ident(table),
            quote_ident(column)
        );
        let bound: Vec<&str> = chunk.iter().map(AsRef::as_ref).collect();
        updated += conn.execute(&sql, params_from_iter(bound))?;
    }
    if updated > 0 {
        tracing::debug!(table, column, updated, "Marked rows synced");
    }
    Ok(updated)
}

/// Read a settings value.
pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?)
}

/// Write a settings value, replacing any previous one.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

/// Remove a settings value.
pub fn delete_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key = ?1", params![key])?;
    Ok(())
}

/// Run `f` inside a transaction, or inside the caller's if one is open.
pub fn with_transaction<T>(conn: &Connection, f: impl FnOnce() -> Result<T>) -> Result<T> {
    if !conn.is_autocommit() {
        return f();
    }

    let tx = conn.unchecked_transaction()?;
    let out = f()?;
    tx.commit()?;
    Ok(out)
}
