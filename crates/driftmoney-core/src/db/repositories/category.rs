//! Category repository

use crate::db::codec::{EntitySchema, FieldDef};
use crate::db::query::WhereClause;
use crate::db::repository::{sync_accessors, Entity, EntityFilter, Repository, SqliteRepository};
use crate::error::Result;
use crate::models::{Category, CategoryKind, CategoryPatch, NewCategory};

/// Listing filter for categories. Archived categories are hidden by default.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    pub kind: Option<CategoryKind>,
    pub include_archived: bool,
}

impl EntityFilter for CategoryFilter {
    fn apply(&self, clause: &mut WhereClause) {
        clause.push_eq("kind", self.kind.map(CategoryKind::as_str));
        if !self.include_archived {
            clause.push_sql("is_archived = 0");
        }
    }
}

impl Entity for Category {
    const SCHEMA: &'static EntitySchema = &EntitySchema {
        table: "categories",
        fields: &[
            FieldDef::text("name"),
            FieldDef::text("kind"),
            FieldDef::text("color"),
            FieldDef::boolean("isArchived"),
        ],
        order_by: "name, id",
    };

    type Draft = NewCategory;
    type Patch = CategoryPatch;
    type Filter = CategoryFilter;

    sync_accessors!();
}

/// Category-specific queries
pub trait CategoryRepository: Repository<Category> {
    /// Look up a category reference. Missing or deleted categories are unknown.
    fn resolve(&self, id: Option<&str>) -> Result<Option<Category>>;
}

impl CategoryRepository for SqliteRepository<'_, Category> {
    fn resolve(&self, id: Option<&str>) -> Result<Option<Category>> {
        match id {
            Some(id) => self.find_by_id(id),
            None => Ok(None),
        }
    }
}

pub type SqliteCategoryRepository<'a> = SqliteRepository<'a, Category>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::SyncStatus;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn new_category(name: &str, kind: CategoryKind) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            kind,
            ..Default::default()
        }
    }

    #[test]
    fn test_find_all_orders_by_name_and_filters() {
        let db = setup();
        let repo = SqliteCategoryRepository::new(db.connection());
        repo.create(new_category("Salary", CategoryKind::Income)).unwrap();
        repo.create(new_category("Rent", CategoryKind::Expense)).unwrap();
        repo.create(NewCategory {
            is_archived: true,
            ..new_category("Old hobby", CategoryKind::Expense)
        })
        .unwrap();
        repo.create(new_category("Food", CategoryKind::Expense)).unwrap();

        let names: Vec<String> = repo
            .find_all(&CategoryFilter::default())
            .unwrap()
            .into_iter()
            .map(|category| category.name)
            .collect();
        assert_eq!(names, vec!["Food", "Rent", "Salary"]);

        let expenses = repo
            .find_all(&CategoryFilter {
                kind: Some(CategoryKind::Expense),
                include_archived: true,
            })
            .unwrap();
        assert_eq!(expenses.len(), 3);
        assert!(expenses.iter().any(|category| category.is_archived));
    }

    #[test]
    fn test_resolve_treats_dangling_reference_as_unknown() {
        let db = setup();
        let repo = SqliteCategoryRepository::new(db.connection());
        let food = repo.create(new_category("Food", CategoryKind::Expense)).unwrap();

        assert_eq!(
            repo.resolve(Some(&food.id)).unwrap().map(|category| category.name),
            Some("Food".to_string())
        );
        assert!(repo.resolve(None).unwrap().is_none());
        assert!(repo.resolve(Some("missing")).unwrap().is_none());

        repo.delete(&food.id).unwrap();
        assert!(repo.resolve(Some(&food.id)).unwrap().is_none());
    }

    #[test]
    fn test_archived_flag_round_trips_as_bool() {
        let db = setup();
        let repo = SqliteCategoryRepository::new(db.connection());
        let archived = repo
            .create(NewCategory {
                is_archived: true,
                ..new_category("Old", CategoryKind::Expense)
            })
            .unwrap();

        let raw: i64 = db
            .connection()
            .query_row(
                "SELECT is_archived FROM categories WHERE id = ?1",
                [&archived.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(raw, 1);

        let found = repo.find_by_id(&archived.id).unwrap().unwrap();
        assert!(found.is_archived);
        assert_eq!(found.sync_status, SyncStatus::Dirty);
    }
}
