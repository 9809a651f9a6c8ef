//! Generic entity repository
//!
//! Every entity kind shares one storage contract: soft deletes, dirty
//! tracking and last-write-wins merging of remote records. The contract is
//! written once here against [`Entity`] and reused by every kind.

use std::marker::PhantomData;

use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::codec::{entity_to_row, from_entity_map, to_entity_map, EntityMap, EntitySchema};
use super::query::{
    build_insert, build_update, execute_statement, find_by_sync_status, hard_delete, query_all,
    query_one, quote_ident, soft_delete, with_transaction, WhereClause,
};
use crate::error::Result;
use crate::models::SyncStatus;
use crate::util::{is_newer, new_id, next_timestamp, now_timestamp};

/// Fields a local update may never touch
const IMMUTABLE_FIELDS: &[&str] = &["id", "createdAt", "isDeleted"];

/// A sync-tracked record kind stored in its own table
pub trait Entity: Serialize + DeserializeOwned {
    /// Declared storage shape
    const SCHEMA: &'static EntitySchema;

    /// Caller-supplied fields for `create`
    type Draft: Serialize;
    /// Partial update; absent fields are left untouched
    type Patch: Serialize;
    /// Listing filter for `find_all`
    type Filter: EntityFilter + Default;

    fn id(&self) -> &str;
    fn updated_at(&self) -> &str;
    fn sync_status(&self) -> SyncStatus;
    fn is_deleted(&self) -> bool;

    /// Whether this record represents a deletion
    fn is_tombstone(&self) -> bool {
        self.is_deleted() || self.sync_status() == SyncStatus::Deleted
    }
}

/// Narrows a `find_all` listing
pub trait EntityFilter {
    fn apply(&self, clause: &mut WhereClause);
}

/// Implements the sync accessors of [`Entity`] for a struct with the usual
/// `id`, `updated_at`, `sync_status` and `is_deleted` fields.
macro_rules! sync_accessors {
    () => {
        fn id(&self) -> &str {
            &self.id
        }

        fn updated_at(&self) -> &str {
            &self.updated_at
        }

        fn sync_status(&self) -> $crate::models::SyncStatus {
            self.sync_status
        }

        fn is_deleted(&self) -> bool {
            self.is_deleted
        }
    };
}

pub(crate) use sync_accessors;

/// What `upsert_from_cloud` did with a remote record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOutcome {
    /// No local row existed
    Inserted,
    /// The remote record was newer and replaced the local row
    Overwritten,
    /// The local row was as new or newer and was left alone
    KeptLocal,
}

/// Storage operations shared by every entity kind
pub trait Repository<T: Entity> {
    /// Get a live record by ID
    fn find_by_id(&self, id: &str) -> Result<Option<T>>;

    /// List live records matching `filter` in the kind's stable order
    fn find_all(&self, filter: &T::Filter) -> Result<Vec<T>>;

    /// Create a record; it starts out dirty
    fn create(&self, draft: T::Draft) -> Result<T>;

    /// Apply a partial update. `None` when the record is missing or deleted.
    fn update(&self, id: &str, patch: T::Patch) -> Result<Option<T>>;

    /// Soft delete a record
    fn delete(&self, id: &str) -> Result<bool>;

    /// Records awaiting upload, tombstones included
    fn find_dirty(&self) -> Result<Vec<T>>;

    /// Flag records as uploaded. Only `sync_status` changes.
    fn mark_synced<S: AsRef<str>>(&self, ids: &[S]) -> Result<usize>;

    /// Merge a remote record, last write wins
    fn upsert_from_cloud(&self, remote: &T) -> Result<MergeOutcome>;

    /// Physically remove a record
    fn purge(&self, id: &str) -> Result<bool>;
}

/// `SQLite` implementation of `Repository`
pub struct SqliteRepository<'a, T> {
    conn: &'a Connection,
    _kind: PhantomData<fn() -> T>,
}

impl<'a, T: Entity> SqliteRepository<'a, T> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            _kind: PhantomData,
        }
    }

    /// Connection this repository reads and writes through
    pub const fn connection(&self) -> &'a Connection {
        self.conn
    }

    fn table(&self) -> String {
        quote_ident(T::SCHEMA.table)
    }

    fn decode_all(maps: Vec<EntityMap>) -> Result<Vec<T>> {
        maps.into_iter().map(from_entity_map).collect()
    }

    /// Raw row lookup that also sees tombstones
    fn find_any(&self, id: &str) -> Result<Option<EntityMap>> {
        query_one(
            self.conn,
            T::SCHEMA,
            &format!("SELECT * FROM {} WHERE id = ?", self.table()),
            &[SqlValue::Text(id.to_string())],
        )
    }
}

impl<T: Entity> Repository<T> for SqliteRepository<'_, T> {
    fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        query_one(
            self.conn,
            T::SCHEMA,
            &format!("SELECT * FROM {} WHERE id = ? AND is_deleted = 0", self.table()),
            &[SqlValue::Text(id.to_string())],
        )?
        .map(from_entity_map)
        .transpose()
    }

    fn find_all(&self, filter: &T::Filter) -> Result<Vec<T>> {
        let mut clause = WhereClause::new();
        clause.push_sql("is_deleted = 0");
        filter.apply(&mut clause);

        let sql = format!(
            "SELECT * FROM {}{} ORDER BY {}",
            self.table(),
            clause.to_sql(),
            T::SCHEMA.order_by
        );
        Self::decode_all(query_all(self.conn, T::SCHEMA, &sql, clause.values())?)
    }

    fn create(&self, draft: T::Draft) -> Result<T> {
        let mut fields = to_entity_map(&draft)?;
        let id = match fields.get("id") {
            Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
            _ => new_id(),
        };
        let now = now_timestamp();
        fields.insert("id".into(), Value::String(id));
        fields.insert("createdAt".into(), Value::String(now.clone()));
        fields.insert("updatedAt".into(), Value::String(now));
        fields.insert(
            "syncStatus".into(),
            Value::String(SyncStatus::Dirty.as_str().into()),
        );
        fields.insert("isDeleted".into(), Value::Bool(false));

        // Round trip through the typed entity so malformed drafts fail here
        let entity: T = from_entity_map(fields)?;
        let row = entity_to_row(T::SCHEMA, &to_entity_map(&entity)?, &[])?;
        execute_statement(self.conn, &build_insert(T::SCHEMA.table, &row)?)?;
        tracing::debug!(table = T::SCHEMA.table, id = entity.id(), "Created record");
        Ok(entity)
    }

    fn update(&self, id: &str, patch: T::Patch) -> Result<Option<T>> {
        let Some(existing) = self.find_by_id(id)? else {
            return Ok(None);
        };

        let mut changes = to_entity_map(&patch)?;
        changes.insert(
            "updatedAt".into(),
            Value::String(next_timestamp(existing.updated_at())),
        );
        changes.insert(
            "syncStatus".into(),
            Value::String(SyncStatus::Dirty.as_str().into()),
        );
        for field in IMMUTABLE_FIELDS {
            changes.remove(*field);
        }

        // Reject patches that would not decode back into an entity
        let mut merged = to_entity_map(&existing)?;
        merged.extend(changes.clone());
        from_entity_map::<T>(merged)?;

        let row = entity_to_row(T::SCHEMA, &changes, IMMUTABLE_FIELDS)?;
        execute_statement(self.conn, &build_update(T::SCHEMA.table, &row, id)?)?;
        self.find_by_id(id)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        soft_delete(self.conn, T::SCHEMA.table, id)
    }

    fn find_dirty(&self) -> Result<Vec<T>> {
        Self::decode_all(find_by_sync_status(
            self.conn,
            T::SCHEMA,
            &[SyncStatus::Dirty, SyncStatus::Deleted],
        )?)
    }

    fn mark_synced<S: AsRef<str>>(&self, ids: &[S]) -> Result<usize> {
        super::query::mark_synced(self.conn, T::SCHEMA.table, ids)
    }

    fn upsert_from_cloud(&self, remote: &T) -> Result<MergeOutcome> {
        with_transaction(self.conn, || {
            let mut incoming = to_entity_map(remote)?;
            incoming.insert(
                "syncStatus".into(),
                Value::String(SyncStatus::Synced.as_str().into()),
            );
            incoming.insert("isDeleted".into(), Value::Bool(remote.is_tombstone()));

            let Some(local) = self.find_any(remote.id())? else {
                let row = entity_to_row(T::SCHEMA, &incoming, &[])?;
                execute_statement(self.conn, &build_insert(T::SCHEMA.table, &row)?)?;
                tracing::debug!(table = T::SCHEMA.table, id = remote.id(), "Inserted remote record");
                return Ok(MergeOutcome::Inserted);
            };

            let local_updated_at = local
                .get("updatedAt")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if !is_newer(remote.updated_at(), local_updated_at) {
                tracing::debug!(
                    table = T::SCHEMA.table,
                    id = remote.id(),
                    local = local_updated_at,
                    remote = remote.updated_at(),
                    "Kept local record"
                );
                return Ok(MergeOutcome::KeptLocal);
            }

            let row = entity_to_row(T::SCHEMA, &incoming, &["id"])?;
            execute_statement(
                self.conn,
                &build_update(T::SCHEMA.table, &row, remote.id())?,
            )?;
            tracing::debug!(
                table = T::SCHEMA.table,
                id = remote.id(),
                tombstone = remote.is_tombstone(),
                "Overwrote local record"
            );
            Ok(MergeOutcome::Overwritten)
        })
    }

    fn purge(&self, id: &str) -> Result<bool> {
        hard_delete(self.conn, T::SCHEMA.table, id)
    }
}
