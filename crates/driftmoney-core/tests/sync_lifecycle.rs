//! End-to-end behavior of the local store as a sync coordinator drives it.

use chrono::NaiveDate;
use driftmoney_core::db::{
    BudgetRepository, ImportBatchRepository, SqliteAccountRepository, SqliteBillRepository,
    SqliteBudgetRepository, SqliteCategoryRepository, SqliteDebtRepository,
    SqliteImportBatchRepository, SqliteTransactionRepository,
};
use driftmoney_core::models::{
    AccountType, Budget, BudgetPatch, BudgetPeriod, CategoryKind, DocumentType, NewAccount,
    NewBill, NewBudget, NewCategory, NewDebt, NewImportBatch, NewTransaction, TransactionType,
};
use driftmoney_core::{Database, MergeOutcome, Repository, SyncStatus};
use pretty_assertions::assert_eq;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn remote_budget(id: &str, amount: f64, updated_at: &str) -> Budget {
    Budget {
        id: id.to_string(),
        name: "Groceries".to_string(),
        category_id: None,
        amount,
        period: BudgetPeriod::Monthly,
        start_date: day(2024, 1, 1),
        end_date: None,
        sync_status: SyncStatus::Synced,
        is_deleted: false,
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: updated_at.to_string(),
    }
}

#[test]
fn every_kind_round_trips_through_create_and_find() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();

    let categories = SqliteCategoryRepository::new(conn);
    let category = categories
        .create(NewCategory {
            name: "Food".to_string(),
            kind: CategoryKind::Expense,
            color: Some("#33aa33".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(categories.find_by_id(&category.id).unwrap(), Some(category.clone()));

    let debts = SqliteDebtRepository::new(conn);
    let debt = debts
        .create(NewDebt::new("Card Co", 1_250.75, day(2024, 1, 1)))
        .unwrap();
    assert_eq!(debts.find_by_id(&debt.id).unwrap(), Some(debt.clone()));

    let accounts = SqliteAccountRepository::new(conn);
    let account = accounts
        .create(NewAccount {
            linked_debt_id: Some(debt.id.clone()),
            ..NewAccount::new("Visa", AccountType::Credit, "USD")
        })
        .unwrap();
    assert_eq!(accounts.find_by_id(&account.id).unwrap(), Some(account.clone()));

    let batches = SqliteImportBatchRepository::new(conn);
    let batch = batches
        .create(NewImportBatch {
            document_type: DocumentType::BankStatement,
            raw_text: Some("OPENING BALANCE 10.00".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(batches.find_by_id(&batch.id).unwrap(), Some(batch.clone()));

    let transactions = SqliteTransactionRepository::new(conn);
    let transaction = transactions
        .create(
            NewTransaction::new("Market", 42.1, TransactionType::Expense, day(2024, 1, 9))
                .with_category(&category.id)
                .with_account(&account.id)
                .with_import_batch(&batch.id),
        )
        .unwrap();
    assert_eq!(
        transactions.find_by_id(&transaction.id).unwrap(),
        Some(transaction.clone())
    );

    let budgets = SqliteBudgetRepository::new(conn);
    let budget = budgets
        .create(NewBudget {
            category_id: Some(category.id.clone()),
            ..NewBudget::new("Food", 300.0, BudgetPeriod::Monthly, day(2024, 1, 1))
        })
        .unwrap();
    assert_eq!(budgets.find_by_id(&budget.id).unwrap(), Some(budget.clone()));

    let bills = SqliteBillRepository::new(conn);
    let bill = bills
        .create(NewBill {
            account_id: Some(account.id.clone()),
            ..NewBill::new("Card payment", 35.0, 28, "2024-01")
        })
        .unwrap();
    assert_eq!(bills.find_by_id(&bill.id).unwrap(), Some(bill.clone()));

    for status in [
        category.sync_status,
        debt.sync_status,
        account.sync_status,
        batch.sync_status,
        transaction.sync_status,
        budget.sync_status,
        bill.sync_status,
    ] {
        assert_eq!(status, SyncStatus::Dirty);
    }
}

#[test]
fn deleted_records_are_hidden_but_uploaded() {
    let db = Database::open_in_memory().unwrap();
    let budgets = SqliteBudgetRepository::new(db.connection());
    let budget = budgets
        .create(NewBudget::new("Fun", 50.0, BudgetPeriod::Weekly, day(2024, 1, 1)))
        .unwrap();

    assert!(budgets.delete(&budget.id).unwrap());
    assert!(budgets.find_by_id(&budget.id).unwrap().is_none());
    assert!(budgets.find_all(&Default::default()).unwrap().is_empty());
    assert!(budgets.find_active(day(2024, 1, 2)).unwrap().is_empty());

    let dirty = budgets.find_dirty().unwrap();
    assert_eq!(dirty.len(), 1);
    assert_eq!(dirty[0].id, budget.id);
    assert_eq!(dirty[0].sync_status, SyncStatus::Deleted);
    assert!(dirty[0].updated_at >= budget.updated_at);
}

#[test]
fn remote_merge_is_last_write_wins() {
    let db = Database::open_in_memory().unwrap();
    let budgets = SqliteBudgetRepository::new(db.connection());
    let local = budgets
        .create(NewBudget {
            id: Some("b1".to_string()),
            ..NewBudget::new("Groceries", 400.0, BudgetPeriod::Monthly, day(2024, 1, 1))
        })
        .unwrap();

    // Remote edit older than the local one loses
    let stale = remote_budget("b1", 10.0, "2020-01-01T00:00:00.000Z");
    assert_eq!(budgets.upsert_from_cloud(&stale).unwrap(), MergeOutcome::KeptLocal);
    let kept = budgets.find_by_id("b1").unwrap().unwrap();
    assert_eq!(kept, local);
    assert_eq!(kept.sync_status, SyncStatus::Dirty);

    // Remote edit newer than the local one wins and lands synced
    let fresh = remote_budget("b1", 450.0, "2999-01-01T00:00:00.000Z");
    assert_eq!(budgets.upsert_from_cloud(&fresh).unwrap(), MergeOutcome::Overwritten);
    let merged = budgets.find_by_id("b1").unwrap().unwrap();
    assert_eq!(merged.amount, 450.0);
    assert_eq!(merged.sync_status, SyncStatus::Synced);
    assert_eq!(merged.updated_at, "2999-01-01T00:00:00.000Z");
    assert!(budgets.find_dirty().unwrap().is_empty());

    // Unknown ids are inserted
    let new_remote = remote_budget("b2", 75.0, "2024-01-01T00:00:00Z");
    assert_eq!(
        budgets.upsert_from_cloud(&new_remote).unwrap(),
        MergeOutcome::Inserted
    );
    assert_eq!(budgets.find_all(&Default::default()).unwrap().len(), 2);
}

#[test]
fn remote_deletion_is_not_resurrected() {
    let db = Database::open_in_memory().unwrap();
    let budgets = SqliteBudgetRepository::new(db.connection());
    budgets
        .upsert_from_cloud(&remote_budget("b1", 100.0, "2024-01-01T00:00:00Z"))
        .unwrap();

    let tombstone = Budget {
        is_deleted: true,
        ..remote_budget("b1", 100.0, "2024-02-01T00:00:00Z")
    };
    assert_eq!(
        budgets.upsert_from_cloud(&tombstone).unwrap(),
        MergeOutcome::Overwritten
    );
    assert!(budgets.find_by_id("b1").unwrap().is_none());

    let late_edit = remote_budget("b1", 120.0, "2024-01-15T00:00:00Z");
    assert_eq!(
        budgets.upsert_from_cloud(&late_edit).unwrap(),
        MergeOutcome::KeptLocal
    );
    assert!(budgets.find_by_id("b1").unwrap().is_none());
}

#[test]
fn mark_synced_changes_only_the_status() {
    let db = Database::open_in_memory().unwrap();
    let budgets = SqliteBudgetRepository::new(db.connection());
    budgets
        .upsert_from_cloud(&remote_budget("b1", 100.0, "2024-01-01T00:00:00Z"))
        .unwrap();
    db.connection()
        .execute("UPDATE budgets SET sync_status = 'dirty' WHERE id = 'b1'", [])
        .unwrap();
    assert_eq!(budgets.find_dirty().unwrap().len(), 1);

    assert_eq!(budgets.mark_synced(&["b1"]).unwrap(), 1);

    let stored = budgets.find_by_id("b1").unwrap().unwrap();
    assert_eq!(stored.sync_status, SyncStatus::Synced);
    assert_eq!(stored.amount, 100.0);
    assert_eq!(stored.updated_at, "2024-01-01T00:00:00Z");
    assert!(budgets.find_dirty().unwrap().is_empty());

    // Already synced rows and unknown ids are not counted
    assert_eq!(budgets.mark_synced(&["b1", "nope"]).unwrap(), 0);
}

#[test]
fn empty_id_lists_are_harmless() {
    let db = Database::open_in_memory().unwrap();
    let budgets = SqliteBudgetRepository::new(db.connection());
    let batches = SqliteImportBatchRepository::new(db.connection());
    budgets
        .create(NewBudget::new("Fun", 50.0, BudgetPeriod::Weekly, day(2024, 1, 1)))
        .unwrap();

    let none: Vec<String> = Vec::new();
    assert_eq!(budgets.mark_synced(&none).unwrap(), 0);
    assert_eq!(
        batches.mark_synced_with_transactions(&none, &none).unwrap(),
        0
    );
    assert_eq!(budgets.find_dirty().unwrap().len(), 1);
}

#[test]
fn groceries_budget_is_active_within_its_range() {
    let db = Database::open_in_memory().unwrap();
    let budgets = SqliteBudgetRepository::new(db.connection());
    let groceries = budgets
        .create(NewBudget::new(
            "Groceries",
            400.0,
            BudgetPeriod::Monthly,
            day(2024, 1, 1),
        ))
        .unwrap();

    let active = budgets.find_active(day(2024, 1, 15)).unwrap();
    assert_eq!(active, vec![groceries.clone()]);
    assert!(budgets.find_active(day(2023, 12, 1)).unwrap().is_empty());

    budgets
        .update(
            &groceries.id,
            BudgetPatch {
                end_date: Some(Some(day(2024, 1, 10))),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(budgets.find_active(day(2024, 1, 15)).unwrap().is_empty());
}
