use std::path::Path;

use crate::commands::common::open_database;
use crate::commands::payload::{apply_payload, ApplySummary, SyncPayload};
use crate::error::CliError;

pub fn run_apply(file: &Path, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(file).map_err(|source| CliError::PayloadRead {
        path: file.to_path_buf(),
        source,
    })?;
    let payload: SyncPayload = serde_json::from_str(&raw)?;

    let db = open_database(db_path)?;
    let summary = apply_payload(db.connection(), &payload)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for line in format_summary_lines(&summary) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn format_summary_lines(summary: &ApplySummary) -> Vec<String> {
    let lines: Vec<String> = summary
        .rows()
        .into_iter()
        .filter(|(_, counts)| counts.inserted + counts.overwritten + counts.kept_local > 0)
        .map(|(kind, counts)| {
            format!(
                "{kind}: {} inserted, {} overwritten, {} kept local",
                counts.inserted, counts.overwritten, counts.kept_local
            )
        })
        .collect();

    if lines.is_empty() {
        vec!["Payload was empty".to_string()]
    } else {
        lines
    }
}
