//! Runtime configuration for hosts embedding the core.
//!
//! # Responsibility
//! - Resolve where the database and logs live and which log level to use.
//!
//! # Invariants
//! - `data_dir` is always absolute; relative input is resolved against the
//!   current working directory.
//! - The log level is one of `trace|debug|info|warn|error`.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LUNOSLEEP_DATA_DIR";
/// Environment variable overriding the log level.
pub const LOG_LEVEL_ENV: &str = "LUNOSLEEP_LOG_LEVEL";

const DB_FILE_NAME: &str = "lunosleep.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    /// Neither an explicit nor a default data directory was available.
    MissingDataDir,
    InvalidLogLevel(String),
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDataDir => write!(
                f,
                "no data directory available; pass one explicitly or set {DATA_DIR_ENV}"
            ),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::CurrentDir(err) => write!(f, "failed to read current directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            _ => None,
        }
    }
}

/// Resolved storage and logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub log_level: &'static str,
}

impl CoreConfig {
    /// Resolves configuration from explicit values and a platform default.
    ///
    /// `data_dir` wins over `default_data_dir`; a missing `log_level` falls
    /// back to `default_log_level()`.
    ///
    /// # Errors
    /// - `MissingDataDir` when both directories are `None`.
    /// - `InvalidLogLevel` for an unsupported level name.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        log_level: Option<&str>,
        default_data_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let data_dir = data_dir
            .or(default_data_dir)
            .ok_or(ConfigError::MissingDataDir)?;
        let data_dir = absolutize(&data_dir)?;

        let log_level = match log_level {
            Some(level) => normalize_level(level).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        Ok(Self {
            data_dir,
            log_level,
        })
    }

    /// SQLite file holding the key-value store.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// Directory for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(cwd.join(path))
}
