//! Record writer use-case service.
//!
//! # Responsibility
//! - Create and update sleep records: ids, timestamps, derived duration.
//! - Provide the "one entry per day" upsert used by daily logging.
//! - Hand read-only record sequences to the statistics engine.
//!
//! # Invariants
//! - Duration is always derived through `engine::duration`; callers cannot
//!   set it directly.
//! - `created_at` never changes after creation; every write refreshes
//!   `updated_at` from the injected `now`.
//! - A corrupted store is never overwritten by a write.

use crate::engine::day::find_by_date;
use crate::model::clock::ClockTime;
use crate::model::record::{QualityLabel, RecordId, SleepRecord};
use crate::model::settings::AppSettings;
use crate::repo::record_store::RecordStore;
use crate::repo::RepoError;
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Format version written into backup documents.
pub const BACKUP_VERSION: &str = "1.0";

pub type RecordServiceResult<T> = Result<T, RecordServiceError>;

/// Service error for record use-cases.
#[derive(Debug)]
pub enum RecordServiceError {
    /// Target record does not exist.
    RecordNotFound(RecordId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for RecordServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecordNotFound(id) => write!(f, "sleep record not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent record state: {details}"),
        }
    }
}

impl Error for RecordServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RecordServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Everything the user fills in when logging a night.
///
/// Applied with full replacement semantics: an absent value clears the
/// stored one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryInput {
    pub bedtime: Option<ClockTime>,
    pub wake_time: Option<ClockTime>,
    pub quality: Option<QualityLabel>,
    pub notes: Option<String>,
    pub sleep_latency_minutes: Option<u32>,
    pub night_wakeups: Option<u32>,
}

/// Partial update. `None` leaves a field untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub date: Option<NaiveDate>,
    pub bedtime: Option<Option<ClockTime>>,
    pub wake_time: Option<Option<ClockTime>>,
    pub quality: Option<Option<QualityLabel>>,
    pub notes: Option<Option<String>>,
}

/// Export document bundling records and settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub entries: Vec<SleepRecord>,
    pub settings: AppSettings,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl BackupDocument {
    /// Suggested file name, e.g. `lunosleep-backup-2024-01-05.json`.
    pub fn file_name(&self) -> String {
        format!(
            "lunosleep-backup-{}.json",
            self.export_date.date_naive().format("%Y-%m-%d")
        )
    }
}

/// Record service facade over store implementations.
pub struct RecordService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> RecordService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the full record sequence in stored order.
    ///
    /// # Errors
    /// - `Repo(InvalidData)` when the stored blob is corrupted.
    pub fn records(&self) -> RecordServiceResult<Vec<SleepRecord>> {
        Ok(self.store.load_all()?)
    }

    /// Loads records for read-only views.
    ///
    /// Any store failure degrades to an empty sequence and is logged.
    pub fn records_or_empty(&self) -> Vec<SleepRecord> {
        match self.store.load_all() {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    "event=records_load module=service status=degraded fallback=empty error={}",
                    err
                );
                Vec::new()
            }
        }
    }

    /// Returns the first stored record dated on `date`.
    pub fn record_for_date(&self, date: NaiveDate) -> RecordServiceResult<Option<SleepRecord>> {
        let records = self.store.load_all()?;
        Ok(find_by_date(&records, date).cloned())
    }

    /// Creates a new record for `date`.
    ///
    /// Does not check for an existing record on the same day; use
    /// `log_for_date` for the one-entry-per-day flow.
    pub fn create_record(
        &self,
        date: NaiveDate,
        input: &EntryInput,
        now: DateTime<Utc>,
    ) -> RecordServiceResult<SleepRecord> {
        let mut records = self.store.load_all()?;
        let mut record = SleepRecord::new(date, now);
        apply_entry(&mut record, input);

        records.push(record.clone());
        self.store.save_all(&records)?;
        info!(
            "event=record_create module=service status=ok has_duration={}",
            record.sleep_duration_minutes.is_some()
        );
        Ok(record)
    }

    /// Applies `patch` to the record with `id`.
    ///
    /// Duration is re-derived from the resulting clock times.
    pub fn update_record(
        &self,
        id: &str,
        patch: &RecordPatch,
        now: DateTime<Utc>,
    ) -> RecordServiceResult<SleepRecord> {
        let mut records = self.store.load_all()?;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| RecordServiceError::RecordNotFound(id.to_string()))?;

        apply_patch(record, patch);
        record.updated_at = now;
        let updated = record.clone();

        self.store.save_all(&records)?;
        info!("event=record_update module=service status=ok");
        Ok(updated)
    }

    /// Saves `input` as the entry for `date`.
    ///
    /// Updates the day's existing record (first match in stored order) or
    /// creates one when the day has none.
    pub fn log_for_date(
        &self,
        date: NaiveDate,
        input: &EntryInput,
        now: DateTime<Utc>,
    ) -> RecordServiceResult<SleepRecord> {
        let mut records = self.store.load_all()?;
        let existing_index = records.iter().position(|record| record.date == date);

        let saved = match existing_index {
            Some(index) => {
                let record = &mut records[index];
                apply_entry(record, input);
                record.updated_at = now;
                record.clone()
            }
            None => {
                let mut record = SleepRecord::new(date, now);
                apply_entry(&mut record, input);
                records.push(record.clone());
                record
            }
        };

        self.store.save_all(&records)?;
        info!(
            "event=record_log module=service status=ok mode={}",
            if existing_index.is_some() { "update" } else { "create" }
        );

        self.store
            .load_all()?
            .into_iter()
            .find(|record| record.id == saved.id)
            .ok_or(RecordServiceError::InconsistentState(
                "logged record not found in read-back",
            ))
    }

    /// Removes every stored record.
    pub fn clear_all(&self) -> RecordServiceResult<()> {
        self.store.clear()?;
        info!("event=records_clear module=service status=ok");
        Ok(())
    }

    /// Builds a backup of all records plus `settings`.
    pub fn export_backup(
        &self,
        settings: &AppSettings,
        now: DateTime<Utc>,
    ) -> RecordServiceResult<BackupDocument> {
        let entries = self.store.load_all()?;
        info!(
            "event=backup_export module=service status=ok count={}",
            entries.len()
        );
        Ok(BackupDocument {
            entries,
            settings: settings.clone(),
            export_date: now,
            version: BACKUP_VERSION.to_string(),
        })
    }
}

fn apply_entry(record: &mut SleepRecord, input: &EntryInput) {
    record.set_times(input.bedtime, input.wake_time);
    record.quality = input.quality;
    record.notes = input.notes.clone().filter(|notes| !notes.trim().is_empty());
    record.sleep_latency_minutes = input.sleep_latency_minutes;
    record.night_wakeups = input.night_wakeups;
}

fn apply_patch(record: &mut SleepRecord, patch: &RecordPatch) {
    if let Some(date) = patch.date {
        record.date = date;
    }
    let bedtime = patch.bedtime.unwrap_or(record.bedtime);
    let wake_time = patch.wake_time.unwrap_or(record.wake_time);
    record.set_times(bedtime, wake_time);
    if let Some(quality) = patch.quality {
        record.quality = quality;
    }
    if let Some(notes) = &patch.notes {
        record.notes = notes.clone();
    }
}
