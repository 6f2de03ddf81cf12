//! Record store contract and its SQLite / in-memory implementations.
//!
//! # Responsibility
//! - Load and replace the full record sequence as one serialized blob.
//!
//! # Invariants
//! - `save_all` validates every record before writing anything.
//! - `load_all` preserves stored order; the engine's first-match lookups
//!   depend on it.
//! - A missing blob loads as an empty sequence; a corrupted one is an error.

use super::kv::KvStore;
use super::{RepoError, RepoResult};
use crate::model::record::SleepRecord;
use log::{error, info};
use rusqlite::Connection;
use std::cell::RefCell;
use std::time::Instant;

/// Storage key of the record blob.
pub const RECORDS_KEY: &str = "lunosleep-entries";

/// Persistence contract for the record sequence.
pub trait RecordStore {
    fn load_all(&self) -> RepoResult<Vec<SleepRecord>>;
    fn save_all(&self, records: &[SleepRecord]) -> RepoResult<()>;
    fn clear(&self) -> RepoResult<()>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn load_all(&self) -> RepoResult<Vec<SleepRecord>> {
        (**self).load_all()
    }

    fn save_all(&self, records: &[SleepRecord]) -> RepoResult<()> {
        (**self).save_all(records)
    }

    fn clear(&self) -> RepoResult<()> {
        (**self).clear()
    }
}

/// Record store persisting a JSON array in `kv_store`.
pub struct SqliteRecordStore<'conn> {
    kv: KvStore<'conn>,
}

impl<'conn> SqliteRecordStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            kv: KvStore::new(conn),
        }
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn load_all(&self) -> RepoResult<Vec<SleepRecord>> {
        let started_at = Instant::now();
        let Some(blob) = self.kv.get(RECORDS_KEY)? else {
            info!("event=records_load module=repo status=ok count=0 source=empty");
            return Ok(Vec::new());
        };

        let records = match decode_records(&blob) {
            Ok(records) => records,
            Err(err) => {
                error!(
                    "event=records_load module=repo status=error error_code=invalid_blob bytes={}",
                    blob.len()
                );
                return Err(err);
            }
        };

        info!(
            "event=records_load module=repo status=ok count={} duration_ms={}",
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(records)
    }

    fn save_all(&self, records: &[SleepRecord]) -> RepoResult<()> {
        let blob = encode_records(records)?;
        self.kv.put(RECORDS_KEY, &blob)?;
        info!(
            "event=records_save module=repo status=ok count={}",
            records.len()
        );
        Ok(())
    }

    fn clear(&self) -> RepoResult<()> {
        let existed = self.kv.delete(RECORDS_KEY)?;
        info!("event=records_clear module=repo status=ok existed={existed}");
        Ok(())
    }
}

/// Record store kept in process memory.
///
/// Stores the encoded blob so it goes through the same validation and
/// encoding as the SQLite store.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    blob: RefCell<Option<String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `blob` verbatim, without validation.
    pub fn from_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: RefCell::new(Some(blob.into())),
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn load_all(&self) -> RepoResult<Vec<SleepRecord>> {
        match self.blob.borrow().as_deref() {
            Some(blob) => decode_records(blob),
            None => Ok(Vec::new()),
        }
    }

    fn save_all(&self, records: &[SleepRecord]) -> RepoResult<()> {
        let blob = encode_records(records)?;
        self.blob.replace(Some(blob));
        Ok(())
    }

    fn clear(&self) -> RepoResult<()> {
        self.blob.replace(None);
        Ok(())
    }
}

fn encode_records(records: &[SleepRecord]) -> RepoResult<String> {
    for record in records {
        record.validate()?;
    }
    serde_json::to_string(records)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode records: {err}")))
}

fn decode_records(blob: &str) -> RepoResult<Vec<SleepRecord>> {
    let records: Vec<SleepRecord> = serde_json::from_str(blob)
        .map_err(|err| RepoError::InvalidData(format!("`{RECORDS_KEY}` is not readable: {err}")))?;

    for record in &records {
        record.validate().map_err(|err| {
            RepoError::InvalidData(format!("record `{}` in `{RECORDS_KEY}`: {err}", record.id))
        })?;
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::{MemoryRecordStore, RecordStore};
    use crate::repo::RepoError;

    #[test]
    fn memory_store_starts_empty_and_reports_corruption() {
        assert!(MemoryRecordStore::new().load_all().unwrap().is_empty());

        let corrupted = MemoryRecordStore::from_blob("[{\"id\":");
        assert!(matches!(
            corrupted.load_all(),
            Err(RepoError::InvalidData(_))
        ));
    }
}
