//! Bill repository

use crate::db::codec::{EntitySchema, FieldDef};
use crate::db::query::WhereClause;
use crate::db::repository::{sync_accessors, Entity, EntityFilter, Repository, SqliteRepository};
use crate::error::Result;
use crate::models::{Bill, BillPatch, NewBill};

#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    /// `YYYY-MM`
    pub bill_month: Option<String>,
    pub unpaid_only: bool,
}

impl EntityFilter for BillFilter {
    fn apply(&self, clause: &mut WhereClause) {
        clause.push_eq("bill_month", self.bill_month.as_deref());
        if self.unpaid_only {
            clause.push_sql("is_paid = 0");
        }
    }
}

impl Entity for Bill {
    const SCHEMA: &'static EntitySchema = &EntitySchema {
        table: "bills",
        fields: &[
            FieldDef::text("name"),
            FieldDef::real("amount"),
            FieldDef::integer("dueDay"),
            FieldDef::boolean("isPaid"),
            FieldDef::text("billMonth"),
            FieldDef::text("categoryId"),
            FieldDef::text("accountId"),
        ],
        order_by: "due_day, name, id",
    };

    type Draft = NewBill;
    type Patch = BillPatch;
    type Filter = BillFilter;

    sync_accessors!();
}

/// Bill-specific operations
pub trait BillRepository: Repository<Bill> {
    /// Mark a bill paid or unpaid
    fn set_paid(&self, id: &str, paid: bool) -> Result<Option<Bill>>;
}

impl BillRepository for SqliteRepository<'_, Bill> {
    fn set_paid(&self, id: &str, paid: bool) -> Result<Option<Bill>> {
        self.update(
            id,
            BillPatch {
                is_paid: Some(paid),
                ..Default::default()
            },
        )
    }
}

pub type SqliteBillRepository<'a> = SqliteRepository<'a, Bill>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::SyncStatus;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_month_listing_ordered_by_due_day() {
        let db = setup();
        let repo = SqliteBillRepository::new(db.connection());
        repo.create(NewBill::new("Internet", 60.0, 20, "2024-01")).unwrap();
        repo.create(NewBill::new("Rent", 1200.0, 1, "2024-01")).unwrap();
        repo.create(NewBill::new("Rent", 1200.0, 1, "2024-02")).unwrap();

        let january: Vec<(String, i64)> = repo
            .find_all(&BillFilter {
                bill_month: Some("2024-01".to_string()),
                ..Default::default()
            })
            .unwrap()
            .into_iter()
            .map(|bill| (bill.name, bill.due_day))
            .collect();
        assert_eq!(
            january,
            vec![("Rent".to_string(), 1), ("Internet".to_string(), 20)]
        );
    }

    #[test]
    fn test_set_paid_marks_dirty_and_filters() {
        let db = setup();
        let repo = SqliteBillRepository::new(db.connection());
        let rent = repo.create(NewBill::new("Rent", 1200.0, 1, "2024-01")).unwrap();
        repo.create(NewBill::new("Power", 90.0, 15, "2024-01")).unwrap();
        repo.mark_synced(&[rent.id.as_str()]).unwrap();

        let paid = repo.set_paid(&rent.id, true).unwrap().unwrap();
        assert!(paid.is_paid);
        assert_eq!(paid.sync_status, SyncStatus::Dirty);

        let unpaid = repo
            .find_all(&BillFilter {
                unpaid_only: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(unpaid.len(), 1);
        assert_eq!(unpaid[0].name, "Power");

        assert!(repo.set_paid("missing", true).unwrap().is_none());
    }

    #[test]
    fn test_due_day_out_of_range_is_rejected() {
        let db = setup();
        let repo = SqliteBillRepository::new(db.connection());
        assert!(repo.create(NewBill::new("Odd", 10.0, 32, "2024-01")).is_err());
    }
}
