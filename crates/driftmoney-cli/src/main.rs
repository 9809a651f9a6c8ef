//! DriftMoney CLI - inspect and drive the local-first store
//!
//! Operator and sync-debugging tool: runs migrations, shows what is waiting
//! to be uploaded, merges downloaded payloads and edits device settings.

mod cli;
mod commands;
mod error;

#[cfg(test)]
mod tests;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::apply::run_apply;
use crate::commands::common::resolve_db_path;
use crate::commands::dirty::run_dirty;
use crate::commands::mark_synced::run_mark_synced;
use crate::commands::migrate::run_migrate;
use crate::commands::settings::run_settings;
use crate::commands::status::run_status;
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "driftmoney=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path)?;

    match cli.command {
        Commands::Migrate => run_migrate(&db_path)?,
        Commands::Status { json } => run_status(json, &db_path)?,
        Commands::Dirty { json } => run_dirty(json, &db_path)?,
        Commands::Apply { file, json } => run_apply(&file, json, &db_path)?,
        Commands::MarkSynced {
            kind,
            ids,
            transactions,
        } => run_mark_synced(kind, &ids, &transactions, &db_path)?,
        Commands::Settings { action } => run_settings(action, &db_path)?,
    }

    Ok(())
}
