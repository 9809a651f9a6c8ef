use std::path::Path;

use serde::Serialize;

use crate::cli::EntityKind;
use crate::commands::common::{open_database, table_stats, TableStats};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct StatusReport {
    path: String,
    schema_version: u32,
    tables: Vec<TableStats>,
}

pub fn run_status(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let tables = EntityKind::ALL
        .iter()
        .map(|kind| table_stats(db.connection(), kind.table()))
        .collect::<Result<Vec<_>, _>>()?;
    let report = StatusReport {
        path: db_path.display().to_string(),
        schema_version: db.schema_version()?,
        tables,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Database: {}", report.path);
    println!("Schema version: {}", report.schema_version);
    for line in format_table_lines(&report.tables) {
        println!("{line}");
    }
    Ok(())
}

pub fn format_table_lines(tables: &[TableStats]) -> Vec<String> {
    let width = tables
        .iter()
        .map(|stats| stats.table.len())
        .max()
        .unwrap_or_default();
    tables
        .iter()
        .map(|stats| {
            format!(
                "{:<width$}  {} live, {} pending, {} deleted",
                stats.table, stats.live, stats.pending, stats.tombstones
            )
        })
        .collect()
}
