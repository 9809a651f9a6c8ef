//! Account repository

use crate::db::codec::{EntitySchema, FieldDef};
use crate::db::query::WhereClause;
use crate::db::repository::{sync_accessors, Entity, EntityFilter, Repository, SqliteRepository};
use crate::error::Result;
use crate::models::{Account, AccountPatch, AccountType, Debt, NewAccount};

#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub active_only: bool,
    pub account_type: Option<AccountType>,
}

impl EntityFilter for AccountFilter {
    fn apply(&self, clause: &mut WhereClause) {
        if self.active_only {
            clause.push_sql("is_active = 1");
        }
        clause.push_eq("account_type", self.account_type.map(AccountType::as_str));
    }
}

impl Entity for Account {
    const SCHEMA: &'static EntitySchema = &EntitySchema {
        table: "accounts",
        fields: &[
            FieldDef::text("name"),
            FieldDef::text("accountType"),
            FieldDef::real("balance"),
            FieldDef::text("currency"),
            FieldDef::boolean("isActive"),
            FieldDef::text("linkedDebtId"),
        ],
        order_by: "name, id",
    };

    type Draft = NewAccount;
    type Patch = AccountPatch;
    type Filter = AccountFilter;

    sync_accessors!();
}

/// Account-specific queries
pub trait AccountRepository: Repository<Account> {
    /// The payable this account is linked to, if it still exists.
    fn linked_debt(&self, account: &Account) -> Result<Option<Debt>>;
}

impl AccountRepository for SqliteRepository<'_, Account> {
    fn linked_debt(&self, account: &Account) -> Result<Option<Debt>> {
        match account.linked_debt_id.as_deref() {
            Some(debt_id) => SqliteRepository::<Debt>::new(self.connection()).find_by_id(debt_id),
            None => Ok(None),
        }
    }
}

pub type SqliteAccountRepository<'a> = SqliteRepository<'a, Account>;
