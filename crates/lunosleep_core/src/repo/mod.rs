//! Persistence adapters over the local key-value table.
//!
//! # Responsibility
//! - Define the record store contract the application persists through.
//! - Isolate SQLite and JSON blob details from services and the engine.
//!
//! # Invariants
//! - Write paths validate every record before anything is persisted.
//! - Read paths reject corrupted or invalid blobs with `InvalidData` instead
//!   of masking them; degrading to an empty view is the caller's decision.

use crate::db::DbError;
use crate::model::record::RecordValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv;
pub mod record_store;
pub mod settings_store;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for store reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
