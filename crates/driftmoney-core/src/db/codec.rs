//! Row codec: storage rows ⇄ entity maps
//!
//! Storage uses `snake_case` column names and stores booleans as `0/1`
//! integers. Entities use `camelCase` field names and real booleans. The
//! conversion is driven by a declared field table per entity (`EntitySchema`),
//! so a boolean is a boolean because the schema says so, not because of its
//! name.

use std::sync::LazyLock;

use regex::Regex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};

/// Entity-shaped record: `camelCase` field names to JSON values.
pub type EntityMap = Map<String, Value>;

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("Invalid regex"));

/// Storage type of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Real,
    /// Stored as `INTEGER` 0/1, surfaced as `true`/`false`
    Boolean,
}

/// One entity field, named in entity (`camelCase`) convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
        }
    }

    pub const fn real(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Real,
        }
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Boolean,
        }
    }

    /// Column name in storage convention
    pub fn column(&self) -> String {
        to_snake_case(self.name)
    }
}

/// Sync bookkeeping fields every entity table carries.
pub const SYNC_FIELDS: &[FieldDef] = &[
    FieldDef::text("id"),
    FieldDef::text("syncStatus"),
    FieldDef::boolean("isDeleted"),
    FieldDef::text("createdAt"),
    FieldDef::text("updatedAt"),
];

/// Declared storage shape of one entity kind
#[derive(Debug)]
pub struct EntitySchema {
    /// Table name
    pub table: &'static str,
    /// Business fields; the sync fields are implied
    pub fields: &'static [FieldDef],
    /// `ORDER BY` clause giving a stable order for listings
    pub order_by: &'static str,
}

impl EntitySchema {
    /// Look up a field by entity name, sync fields included.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        SYNC_FIELDS
            .iter()
            .chain(self.fields.iter())
            .find(|field| field.name == name)
    }

    /// All declared fields, sync fields first.
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldDef> {
        SYNC_FIELDS.iter().chain(self.fields.iter())
    }
}

/// An ordered list of `(column, value)` pairs ready to be bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorageRow {
    columns: Vec<(String, SqlValue)>,
}

impl StorageRow {
    pub fn push(&mut self, column: impl Into<String>, value: SqlValue) {
        self.columns.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns
            .iter()
            .map(|(column, value)| (column.as_str(), value))
    }
}

/// `isActive` → `is_active`
pub fn to_snake_case(name: &str) -> String {
    CAMEL_BOUNDARY
        .replace_all(name, "${1}_${2}")
        .to_lowercase()
}

/// `is_active` → `isActive`
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Decode one result row into an entity map.
///
/// `columns` are the statement's column names, in order.
pub fn row_to_entity(
    schema: &EntitySchema,
    columns: &[String],
    row: &rusqlite::Row<'_>,
) -> Result<EntityMap> {
    let mut entity = EntityMap::new();
    for (index, column) in columns.iter().enumerate() {
        let name = to_camel_case(column);
        let kind = schema.field(&name).map(|field| field.kind);
        let value = decode_value(row.get_ref(index)?, kind, column)?;
        entity.insert(name, value);
    }
    Ok(entity)
}

/// Encode an entity map into a storage row.
///
/// Fields named in `exclude` are left out, which is how callers protect
/// immutable columns. Fields the schema does not declare are dropped.
pub fn entity_to_row(
    schema: &EntitySchema,
    entity: &EntityMap,
    exclude: &[&str],
) -> Result<StorageRow> {
    let mut row = StorageRow::default();
    for (name, value) in entity {
        if exclude.contains(&name.as_str()) {
            continue;
        }
        let Some(field) = schema.field(name) else {
            tracing::debug!(table = schema.table, field = %name, "Skipping undeclared field");
            continue;
        };
        row.push(field.column(), encode_value(value, field.kind)?);
    }
    Ok(row)
}

/// Serialize any entity-shaped value into an `EntityMap`.
pub fn to_entity_map<S: Serialize>(value: &S) -> Result<EntityMap> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Codec(format!(
            "expected an object-shaped entity, got {other}"
        ))),
    }
}

/// Deserialize an `EntityMap` into a typed entity.
pub fn from_entity_map<T: DeserializeOwned>(map: EntityMap) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(map))?)
}

fn decode_value(value: ValueRef<'_>, kind: Option<FieldKind>, column: &str) -> Result<Value> {
    Ok(match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(int) if kind == Some(FieldKind::Boolean) => Value::Bool(int != 0),
        ValueRef::Integer(int) => Value::from(int),
        ValueRef::Real(real) => Number::from_f64(real)
            .map(Value::Number)
            .ok_or_else(|| Error::Codec(format!("non-finite value in column {column}")))?,
        ValueRef::Text(bytes) => Value::String(
            std::str::from_utf8(bytes)
                .map_err(|_| Error::Codec(format!("invalid UTF-8 in column {column}")))?
                .to_string(),
        ),
        ValueRef::Blob(bytes) => Value::Array(bytes.iter().map(|byte| Value::from(*byte)).collect()),
    })
}

fn encode_value(value: &Value, kind: FieldKind) -> Result<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(flag) => SqlValue::Integer(i64::from(*flag)),
        Value::Number(number) => match (kind, number.as_i64()) {
            (FieldKind::Real, _) | (_, None) => number
                .as_f64()
                .map(SqlValue::Real)
                .ok_or_else(|| Error::Codec(format!("unrepresentable number {number}")))?,
            (_, Some(int)) => SqlValue::Integer(int),
        },
        Value::String(text) => SqlValue::Text(text.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(serde_json::to_string(value)?),
    })
}
