use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use driftmoney_core::db::{
    Repository, SettingsRepository, SqliteBudgetRepository, SqliteImportBatchRepository,
    SqliteSettingsRepository, SqliteTransactionRepository,
};
use driftmoney_core::models::{
    Budget, BudgetPeriod, DocumentType, NewBudget, NewImportBatch, NewTransaction, Settings,
    TransactionType,
};
use driftmoney_core::{Database, SyncStatus};
use pretty_assertions::assert_eq;

use crate::cli::{Cli, Commands, EntityKind, SettingKey, SettingsAction};
use crate::commands::apply::{format_summary_lines, run_apply};
use crate::commands::common::{resolve_db_path_from, table_stats};
use crate::commands::dirty::format_dirty_lines;
use crate::commands::mark_synced::mark_synced;
use crate::commands::payload::{apply_payload, collect_dirty, MergeCounts, SyncPayload};
use crate::commands::settings::{apply_setting, run_settings};
use crate::commands::status::format_table_lines;
use crate::error::CliError;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn cli_db_path_beats_environment() {
    let resolved = resolve_db_path_from(
        Some(PathBuf::from("/tmp/flag.db")),
        Some(PathBuf::from("/tmp/env.db")),
    )
    .unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/flag.db"));

    let resolved = resolve_db_path_from(None, Some(PathBuf::from("/tmp/env.db"))).unwrap();
    assert_eq!(resolved, PathBuf::from("/tmp/env.db"));
}

#[test]
fn default_db_path_lives_under_driftmoney_dir() {
    if let Ok(path) = resolve_db_path_from(None, None) {
        assert!(path.ends_with("driftmoney/driftmoney.db"));
    }
}

#[test]
fn parses_mark_synced_arguments() {
    let cli = Cli::try_parse_from([
        "driftmoney",
        "--db-path",
        "/tmp/x.db",
        "mark-synced",
        "import-batches",
        "ib1",
        "ib2",
        "--transaction",
        "t1",
    ])
    .unwrap();

    assert_eq!(cli.db_path, Some(PathBuf::from("/tmp/x.db")));
    match cli.command {
        Commands::MarkSynced {
            kind,
            ids,
            transactions,
        } => {
            assert_eq!(kind, EntityKind::ImportBatches);
            assert_eq!(ids, vec!["ib1".to_string(), "ib2".to_string()]);
            assert_eq!(transactions, vec!["t1".to_string()]);
        }
        _ => panic!("expected mark-synced"),
    }
}

#[test]
fn mark_synced_requires_ids() {
    assert!(Cli::try_parse_from(["driftmoney", "mark-synced", "budgets"]).is_err());
}

#[test]
fn parses_settings_set() {
    let cli =
        Cli::try_parse_from(["driftmoney", "settings", "set", "default-currency", "eur"]).unwrap();
    match cli.command {
        Commands::Settings {
            action: SettingsAction::Set { key, value },
        } => {
            assert_eq!(key, SettingKey::DefaultCurrency);
            assert_eq!(value, "eur");
        }
        _ => panic!("expected settings set"),
    }
}

#[test]
fn entity_kinds_map_to_tables() {
    let tables: Vec<&str> = EntityKind::ALL.iter().map(|kind| kind.table()).collect();
    assert_eq!(
        tables,
        vec![
            "categories",
            "accounts",
            "debts",
            "import_batches",
            "transactions",
            "budgets",
            "bills"
        ]
    );
}

#[test]
fn apply_setting_validates_currency_and_clears_endpoint() {
    let settings = Settings {
        sync_endpoint: Some("https://sync.example.com".to_string()),
        ..Settings::default()
    };

    let updated = apply_setting(settings, SettingKey::DefaultCurrency, " gbp ").unwrap();
    assert_eq!(updated.default_currency, "GBP");

    let cleared = apply_setting(updated, SettingKey::SyncEndpoint, "").unwrap();
    assert!(cleared.sync_endpoint.is_none());

    assert!(matches!(
        apply_setting(cleared, SettingKey::DefaultCurrency, "euro"),
        Err(CliError::InvalidSetting(_))
    ));
}

#[test]
fn dirty_payload_round_trips_through_json() {
    let db = Database::open_in_memory().unwrap();
    let budgets = SqliteBudgetRepository::new(db.connection());
    let budget = budgets
        .create(NewBudget::new("Groceries", 400.0, BudgetPeriod::Monthly, day(2024, 1, 1)))
        .unwrap();

    let payload = collect_dirty(db.connection()).unwrap();
    assert_eq!(payload.len(), 1);
    assert_eq!(payload.budgets, vec![budget]);

    let json = serde_json::to_value(&payload).unwrap();
    assert!(json["importBatches"].as_array().unwrap().is_empty());
    assert_eq!(json["budgets"][0]["startDate"], "2024-01-01");

    let parsed: SyncPayload = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, payload);
}

#[test]
fn partial_payload_defaults_missing_kinds() {
    let payload: SyncPayload = serde_json::from_str(r#"{"budgets": []}"#).unwrap();
    assert!(payload.is_empty());
}

#[test]
fn apply_payload_merges_and_summarizes() {
    let db = Database::open_in_memory().unwrap();
    let budgets = SqliteBudgetRepository::new(db.connection());
    let local = budgets
        .create(NewBudget::new("Local", 10.0, BudgetPeriod::Weekly, day(2024, 1, 1)))
        .unwrap();

    let remote = |id: &str, updated_at: &str| Budget {
        id: id.to_string(),
        name: "Remote".to_string(),
        category_id: None,
        amount: 99.0,
        period: BudgetPeriod::Monthly,
        start_date: day(2024, 1, 1),
        end_date: None,
        sync_status: SyncStatus::Synced,
        is_deleted: false,
        created_at: "2024-01-01T00:00:00.000Z".to_string(),
        updated_at: updated_at.to_string(),
    };
    let payload = SyncPayload {
        budgets: vec![
            remote("fresh", "2024-01-01T00:00:00.000Z"),
            remote(&local.id, "2000-01-01T00:00:00.000Z"),
        ],
        ..SyncPayload::default()
    };

    let summary = apply_payload(db.connection(), &payload).unwrap();
    assert_eq!(
        summary.budgets,
        MergeCounts {
            inserted: 1,
            overwritten: 0,
            kept_local: 1,
        }
    );
    assert_eq!(
        format_summary_lines(&summary),
        vec!["budgets: 1 inserted, 0 overwritten, 1 kept local".to_string()]
    );
    assert_eq!(budgets.find_by_id(&local.id).unwrap().unwrap().name, "Local");
    assert_eq!(budgets.find_by_id("fresh").unwrap().unwrap().name, "Remote");
}

#[test]
fn mark_synced_import_batches_only_touches_listed_transactions() {
    let db = Database::open_in_memory().unwrap();
    let batch = SqliteImportBatchRepository::new(db.connection())
        .create(NewImportBatch {
            document_type: DocumentType::BankStatement,
            ..Default::default()
        })
        .unwrap();
    let transactions = SqliteTransactionRepository::new(db.connection());
    let line = |description: &str| {
        transactions
            .create(
                NewTransaction::new(description, 5.0, TransactionType::Expense, day(2024, 1, 2))
                    .with_import_batch(&batch.id),
            )
            .unwrap()
    };
    let uploaded = line("Uploaded");
    let pending = line("Pending");

    let updated = mark_synced(
        db.connection(),
        EntityKind::ImportBatches,
        &[batch.id.clone()],
        &[uploaded.id],
    )
    .unwrap();
    assert_eq!(updated, 2);

    let left = collect_dirty(db.connection()).unwrap();
    assert!(left.import_batches.is_empty());
    assert_eq!(
        left.transactions.into_iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![pending.id]
    );
}

#[test]
fn transaction_flag_requires_import_batches() {
    let db = Database::open_in_memory().unwrap();
    let result = mark_synced(
        db.connection(),
        EntityKind::Budgets,
        &["b1".to_string()],
        &["t1".to_string()],
    );
    assert!(matches!(result, Err(CliError::InvalidArgument(_))));
}

#[test]
fn status_and_dirty_lines_reflect_tombstones() {
    let db = Database::open_in_memory().unwrap();
    let budgets = SqliteBudgetRepository::new(db.connection());
    let kept = budgets
        .create(NewBudget::new("Kept", 1.0, BudgetPeriod::Weekly, day(2024, 1, 1)))
        .unwrap();
    let gone = budgets
        .create(NewBudget::new("Gone", 1.0, BudgetPeriod::Weekly, day(2024, 1, 1)))
        .unwrap();
    budgets.delete(&gone.id).unwrap();

    let stats = table_stats(db.connection(), EntityKind::Budgets.table()).unwrap();
    assert_eq!((stats.live, stats.pending, stats.tombstones), (1, 2, 1));
    assert_eq!(
        format_table_lines(&[stats]),
        vec!["budgets  1 live, 2 pending, 1 deleted".to_string()]
    );

    let lines = format_dirty_lines(&collect_dirty(db.connection()).unwrap());
    assert_eq!(lines[0], "budgets: 2 pending (1 deleted)");
    assert!(lines.contains(&format!("  {}", kept.id)));
    assert!(lines.contains(&format!("  {} [deleted]", gone.id)));
}

#[test]
fn settings_and_apply_commands_work_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("driftmoney.db");

    run_settings(
        SettingsAction::Set {
            key: SettingKey::DefaultCurrency,
            value: "eur".to_string(),
        },
        &db_path,
    )
    .unwrap();

    let db = Database::open(&db_path).unwrap();
    let settings = SqliteSettingsRepository::new(db.connection()).load().unwrap();
    assert_eq!(settings.default_currency, "EUR");
    db.close().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        run_apply(&missing, false, &db_path),
        Err(CliError::PayloadRead { .. })
    ));
}
