//! Core domain logic for Lunosleep.
//! This crate is the single source of truth for sleep-record invariants and
//! the statistics derived from them.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use engine::day::{find_by_date, week_cells, DayCell, DayRelation};
pub use engine::duration::{compute_duration, derive_duration};
pub use engine::insights::{assess_duration, reflections, DurationAssessment, Reflection};
pub use engine::stats::{aggregate, AggregateStats, QualityDistribution};
pub use engine::weekly::{
    best_week, bucket_weeks, compare_trend, week_start, TrendComparison, TrendDirection,
    WeekBucket,
};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::clock::ClockTime;
pub use model::record::{QualityLabel, RecordId, RecordValidationError, SleepRecord};
pub use model::settings::{AppSettings, NotificationSettings, Theme};
pub use repo::record_store::{MemoryRecordStore, RecordStore, SqliteRecordStore};
pub use repo::settings_store::SqliteSettingsStore;
pub use repo::{RepoError, RepoResult};
pub use service::record_service::{
    BackupDocument, EntryInput, RecordPatch, RecordService, RecordServiceError,
    RecordServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
