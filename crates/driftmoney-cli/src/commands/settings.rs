use std::path::Path;

use driftmoney_core::db::{SettingsRepository, SqliteSettingsRepository};
use driftmoney_core::models::Settings;
use driftmoney_core::util::normalize_currency_code;

use crate::cli::{SettingKey, SettingsAction};
use crate::commands::common::open_database;
use crate::error::CliError;

pub fn run_settings(action: SettingsAction, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let repo = SqliteSettingsRepository::new(db.connection());

    match action {
        SettingsAction::Get { key: Some(key) } => {
            println!("{}", setting_value(&repo.load()?, key).unwrap_or_default());
        }
        SettingsAction::Get { key: None } => {
            let settings = repo.load()?;
            for key in [SettingKey::SyncEndpoint, SettingKey::DefaultCurrency] {
                println!(
                    "{} = {}",
                    setting_name(key),
                    setting_value(&settings, key).unwrap_or_default()
                );
            }
            if let Some(last_synced_at) = settings.last_synced_at.as_deref() {
                println!("last-synced-at = {last_synced_at}");
            }
        }
        SettingsAction::Set { key, value } => {
            let settings = apply_setting(repo.load()?, key, &value)?;
            repo.save(&settings)?;
            println!("Updated {}", setting_name(key));
        }
    }
    Ok(())
}

pub const fn setting_name(key: SettingKey) -> &'static str {
    match key {
        SettingKey::SyncEndpoint => "sync-endpoint",
        SettingKey::DefaultCurrency => "default-currency",
    }
}

pub fn setting_value(settings: &Settings, key: SettingKey) -> Option<String> {
    match key {
        SettingKey::SyncEndpoint => settings.sync_endpoint.clone(),
        SettingKey::DefaultCurrency => Some(settings.default_currency.clone()),
    }
}

/// Return `settings` with `key` changed to `value`.
pub fn apply_setting(
    mut settings: Settings,
    key: SettingKey,
    value: &str,
) -> Result<Settings, CliError> {
    let value = value.trim();
    match key {
        SettingKey::SyncEndpoint => {
            settings.sync_endpoint = (!value.is_empty()).then(|| value.to_string());
        }
        SettingKey::DefaultCurrency => {
            settings.default_currency = normalize_currency_code(value).ok_or_else(|| {
                CliError::InvalidSetting(format!(
                    "default currency must be a three-letter code, got {value:?}"
                ))
            })?;
        }
    }
    Ok(settings)
}
