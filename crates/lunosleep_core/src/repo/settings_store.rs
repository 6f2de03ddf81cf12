//! Settings persistence in `kv_store`.

use super::kv::KvStore;
use super::{RepoError, RepoResult};
use crate::model::settings::AppSettings;
use log::info;
use rusqlite::Connection;

/// Storage key of the settings document.
pub const SETTINGS_KEY: &str = "lunosleep-settings";

pub struct SqliteSettingsStore<'conn> {
    kv: KvStore<'conn>,
}

impl<'conn> SqliteSettingsStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            kv: KvStore::new(conn),
        }
    }

    /// Loads settings, falling back to defaults when none were saved.
    ///
    /// # Errors
    /// - `InvalidData` when the stored document cannot be parsed.
    pub fn load(&self) -> RepoResult<AppSettings> {
        match self.kv.get(SETTINGS_KEY)? {
            Some(document) => serde_json::from_str(&document).map_err(|err| {
                RepoError::InvalidData(format!("`{SETTINGS_KEY}` is not readable: {err}"))
            }),
            None => Ok(AppSettings::default()),
        }
    }

    pub fn save(&self, settings: &AppSettings) -> RepoResult<()> {
        let document = serde_json::to_string(settings)
            .map_err(|err| RepoError::InvalidData(format!("failed to encode settings: {err}")))?;
        self.kv.put(SETTINGS_KEY, &document)?;
        info!("event=settings_save module=repo status=ok");
        Ok(())
    }

    pub fn clear(&self) -> RepoResult<()> {
        self.kv.delete(SETTINGS_KEY)?;
        Ok(())
    }
}
