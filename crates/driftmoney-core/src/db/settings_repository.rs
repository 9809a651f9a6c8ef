//! Settings repository implementation

use rusqlite::Connection;

use super::query::{delete_setting, get_setting, set_setting, with_transaction};
use crate::error::{Error, Result};
use crate::models::Settings;
use crate::util::{is_http_url, normalize_currency_code, normalize_text_option};

const SYNC_ENDPOINT_KEY: &str = "sync_endpoint";
const DEFAULT_CURRENCY_KEY: &str = "default_currency";
const LAST_SYNCED_AT_KEY: &str = "last_synced_at";

/// Trait for settings storage operations
pub trait SettingsRepository {
    /// Load settings from the database
    fn load(&self) -> Result<Settings>;

    /// Save settings to the database
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// `SQLite` implementation of `SettingsRepository`
pub struct SqliteSettingsRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSettingsRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn load(&self) -> Result<Settings> {
        let defaults = Settings::default();

        Ok(Settings {
            sync_endpoint: normalize_text_option(get_setting(self.conn, SYNC_ENDPOINT_KEY)?),
            default_currency: normalize_text_option(get_setting(self.conn, DEFAULT_CURRENCY_KEY)?)
                .unwrap_or(defaults.default_currency),
            last_synced_at: normalize_text_option(get_setting(self.conn, LAST_SYNCED_AT_KEY)?),
        })
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let sync_endpoint = normalize_text_option(settings.sync_endpoint.clone());
        if let Some(endpoint) = sync_endpoint.as_deref() {
            if !is_http_url(endpoint) {
                return Err(Error::InvalidInput(format!(
                    "sync endpoint must be an http(s) URL: {endpoint}"
                )));
            }
        }

        let currency = normalize_currency_code(&settings.default_currency).ok_or_else(|| {
            Error::InvalidInput(format!(
                "default currency must be a three-letter code: {:?}",
                settings.default_currency
            ))
        })?;

        with_transaction(self.conn, || {
            self.set_optional(SYNC_ENDPOINT_KEY, sync_endpoint.as_deref())?;
            set_setting(self.conn, DEFAULT_CURRENCY_KEY, &currency)?;
            self.set_optional(LAST_SYNCED_AT_KEY, settings.last_synced_at.as_deref())
        })
    }
}

impl SqliteSettingsRepository<'_> {
    fn set_optional(&self, key: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => set_setting(self.conn, key, value),
            None => delete_setting(self.conn, key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_load_default_settings() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        let settings = repo.load().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_settings() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        let settings = Settings {
            sync_endpoint: Some("https://sync.example.com/api".to_string()),
            default_currency: "eur".to_string(),
            last_synced_at: Some("2024-03-01T12:00:00.000Z".to_string()),
        };
        repo.save(&settings).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(
            loaded,
            Settings {
                default_currency: "EUR".to_string(),
                ..settings
            }
        );
    }

    #[test]
    fn test_clearing_optional_settings_removes_keys() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());
        repo.save(&Settings {
            sync_endpoint: Some("https://sync.example.com".to_string()),
            ..Settings::default()
        })
        .unwrap();

        repo.save(&Settings::default()).unwrap();
        assert!(get_setting(db.connection(), SYNC_ENDPOINT_KEY)
            .unwrap()
            .is_none());
        assert!(repo.load().unwrap().sync_endpoint.is_none());
    }

    #[test]
    fn test_save_rejects_non_http_endpoint() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        let result = repo.save(&Settings {
            sync_endpoint: Some("ftp://example.com".to_string()),
            ..Settings::default()
        });
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(repo.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_rejects_malformed_currency() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());

        for currency in ["", "dollars", "E1R"] {
            let result = repo.save(&Settings {
                default_currency: currency.to_string(),
                ..Settings::default()
            });
            assert!(matches!(result, Err(Error::InvalidInput(_))), "{currency:?}");
        }
        assert!(get_setting(db.connection(), DEFAULT_CURRENCY_KEY)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_settings_do_not_disturb_schema_version() {
        let db = setup();
        let repo = SqliteSettingsRepository::new(db.connection());
        let version = db.schema_version().unwrap();

        repo.save(&Settings::default()).unwrap();
        assert_eq!(db.schema_version().unwrap(), version);
    }
}
