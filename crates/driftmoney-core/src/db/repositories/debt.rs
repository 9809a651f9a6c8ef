//! Debt repository

use crate::db::codec::{EntitySchema, FieldDef};
use crate::db::query::WhereClause;
use crate::db::repository::{sync_accessors, Entity, EntityFilter, SqliteRepository};
use crate::models::{Debt, DebtPatch, NewDebt};

#[derive(Debug, Clone, Default)]
pub struct DebtFilter {
    pub recurring_only: bool,
}

impl EntityFilter for DebtFilter {
    fn apply(&self, clause: &mut WhereClause) {
        if self.recurring_only {
            clause.push_sql("is_recurring = 1");
        }
    }
}

impl Entity for Debt {
    const SCHEMA: &'static EntitySchema = &EntitySchema {
        table: "debts",
        fields: &[
            FieldDef::text("company"),
            FieldDef::real("balance"),
            FieldDef::text("lastUpdated"),
            FieldDef::text("notes"),
            FieldDef::boolean("isRecurring"),
            FieldDef::integer("paymentDueDay"),
            FieldDef::text("paymentFrequency"),
            FieldDef::real("minimumPayment"),
        ],
        order_by: "company, id",
    };

    type Draft = NewDebt;
    type Patch = DebtPatch;
    type Filter = DebtFilter;

    sync_accessors!();
}

pub type SqliteDebtRepository<'a> = SqliteRepository<'a, Debt>;
