use std::path::Path;

use driftmoney_core::db::Entity;

use crate::commands::common::open_database;
use crate::commands::payload::{collect_dirty, SyncPayload};
use crate::error::CliError;

pub fn run_dirty(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let payload = collect_dirty(db.connection())?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if payload.is_empty() {
        println!("Nothing to upload");
    } else {
        for line in format_dirty_lines(&payload) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn format_dirty_lines(payload: &SyncPayload) -> Vec<String> {
    let mut lines = Vec::new();
    push_kind(&mut lines, "categories", &payload.categories);
    push_kind(&mut lines, "accounts", &payload.accounts);
    push_kind(&mut lines, "debts", &payload.debts);
    push_kind(&mut lines, "importBatches", &payload.import_batches);
    push_kind(&mut lines, "transactions", &payload.transactions);
    push_kind(&mut lines, "budgets", &payload.budgets);
    push_kind(&mut lines, "bills", &payload.bills);
    lines
}

fn push_kind<T: Entity>(lines: &mut Vec<String>, kind: &str, records: &[T]) {
    if records.is_empty() {
        return;
    }

    let deleted = records.iter().filter(|record| record.is_tombstone()).count();
    lines.push(format!("{kind}: {} pending ({deleted} deleted)", records.len()));
    for record in records {
        let marker = if record.is_tombstone() { " [deleted]" } else { "" };
        lines.push(format!("  {}{marker}", record.id()));
    }
}
