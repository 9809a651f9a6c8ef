//! Budget repository

use chrono::NaiveDate;
use rusqlite::types::Value as SqlValue;

use crate::db::codec::{EntitySchema, FieldDef};
use crate::db::query::WhereClause;
use crate::db::repository::{sync_accessors, Entity, EntityFilter, Repository, SqliteRepository};
use crate::error::Result;
use crate::models::{Budget, BudgetPatch, NewBudget};

#[derive(Debug, Clone, Default)]
pub struct BudgetFilter {
    pub category_id: Option<String>,
    /// Only budgets covering this day
    pub active_on: Option<NaiveDate>,
}

impl EntityFilter for BudgetFilter {
    fn apply(&self, clause: &mut WhereClause) {
        clause.push_eq("category_id", self.category_id.as_deref());
        if let Some(day) = self.active_on {
            let day = day.to_string();
            clause.push(
                "start_date <= ? AND (end_date IS NULL OR end_date >= ?)",
                [SqlValue::Text(day.clone()), SqlValue::Text(day)],
            );
        }
    }
}

impl Entity for Budget {
    const SCHEMA: &'static EntitySchema = &EntitySchema {
        table: "budgets",
        fields: &[
            FieldDef::text("name"),
            FieldDef::text("categoryId"),
            FieldDef::real("amount"),
            FieldDef::text("period"),
            FieldDef::text("startDate"),
            FieldDef::text("endDate"),
        ],
        order_by: "start_date, name, id",
    };

    type Draft = NewBudget;
    type Patch = BudgetPatch;
    type Filter = BudgetFilter;

    sync_accessors!();
}

/// Budget-specific queries
pub trait BudgetRepository: Repository<Budget> {
    /// Budgets in effect on `on`
    fn find_active(&self, on: NaiveDate) -> Result<Vec<Budget>>;
}

impl BudgetRepository for SqliteRepository<'_, Budget> {
    fn find_active(&self, on: NaiveDate) -> Result<Vec<Budget>> {
        self.find_all(&BudgetFilter {
            active_on: Some(on),
            ..Default::default()
        })
    }
}

pub type SqliteBudgetRepository<'a> = SqliteRepository<'a, Budget>;
