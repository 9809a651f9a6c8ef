use std::path::Path;

use driftmoney_core::Database;

use crate::error::CliError;

pub fn run_migrate(db_path: &Path) -> Result<(), CliError> {
    let db = Database::open_unmigrated(db_path)?;
    let report = db.migrate()?;

    if report.is_noop() {
        println!("Database is up to date (version {})", report.to_version);
    } else {
        println!(
            "Migrated {} from version {} to {}",
            db_path.display(),
            report.from_version,
            report.to_version
        );
    }
    db.close()?;
    Ok(())
}
