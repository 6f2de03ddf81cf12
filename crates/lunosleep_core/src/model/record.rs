//! Sleep record domain model.
//!
//! # Responsibility
//! - Define the canonical daily sleep record and its wire shape.
//! - Keep derived duration consistent with the stored clock times.
//!
//! # Invariants
//! - `id` is non-empty and never reassigned.
//! - When both `bedtime` and `wake_time` are present,
//!   `sleep_duration_minutes` equals `compute_duration(bedtime, wake_time)`.
//! - A positive duration is never stored without both clock times.
//!
//! # See also
//! - `engine::duration` for the single duration formula.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

use super::clock::{deserialize_optional_clock_time, ClockTime};
use crate::engine::duration::derive_duration;

/// Opaque record identifier.
///
/// New records get UUID v4 text; stored blobs may carry any non-empty string.
pub type RecordId = String;

/// Subjective rating given after waking up.
///
/// Declaration order is the tie-break order used by weekly summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLabel {
    Fresh,
    Normal,
    Tired,
}

impl QualityLabel {
    /// All labels in enumeration order.
    pub const ALL: [Self; 3] = [Self::Fresh, Self::Normal, Self::Tired];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Normal => "normal",
            Self::Tired => "tired",
        }
    }
}

impl Display for QualityLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityLabel {
    type Err = RecordValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fresh" => Ok(Self::Fresh),
            "normal" => Ok(Self::Normal),
            "tired" => Ok(Self::Tired),
            other => Err(RecordValidationError::InvalidQuality(other.to_string())),
        }
    }
}

/// Bedroom temperature as perceived by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperature {
    Cold,
    Cool,
    Comfortable,
    Warm,
    Hot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseLevel {
    Silent,
    Quiet,
    Moderate,
    Noisy,
    VeryNoisy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightLevel {
    Dark,
    Dim,
    Moderate,
    Bright,
    VeryBright,
}

/// Sleeping environment snapshot. All parts are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEnvironment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Temperature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise: Option<NoiseLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<LightLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodBeforeSleep {
    Stressed,
    Anxious,
    Neutral,
    Calm,
    Relaxed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodAfterWakeup {
    Groggy,
    Tired,
    Neutral,
    Refreshed,
    Energetic,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepMood {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_sleep: Option<MoodBeforeSleep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_wakeup: Option<MoodAfterWakeup>,
}

/// Evening activities that may influence sleep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreSleepActivities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caffeine: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alcohol: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_time: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meditation: Option<bool>,
}

/// Validation failures for records and their parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyId,
    InvalidClockTime(String),
    ClockTimeOutOfRange { hour: u32, minute: u32 },
    InvalidQuality(String),
    DurationMismatch { stored: u32, expected: u32 },
    DurationWithoutTimes(u32),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "record id cannot be empty"),
            Self::InvalidClockTime(value) => {
                write!(f, "invalid clock time `{value}`; expected HH:MM")
            }
            Self::ClockTimeOutOfRange { hour, minute } => write!(
                f,
                "clock time {hour}:{minute:02} is out of range; expected 00:00..23:59"
            ),
            Self::InvalidQuality(value) => {
                write!(f, "invalid quality `{value}`; expected fresh|normal|tired")
            }
            Self::DurationMismatch { stored, expected } => write!(
                f,
                "stored sleep duration {stored} does not match derived duration {expected}"
            ),
            Self::DurationWithoutTimes(minutes) => write!(
                f,
                "sleep duration {minutes} is set but bedtime or wake time is missing"
            ),
        }
    }
}

impl Error for RecordValidationError {}

/// One day of sleep data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecord {
    pub id: RecordId,
    /// Calendar day this record describes.
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_clock_time"
    )]
    pub bedtime: Option<ClockTime>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_clock_time"
    )]
    pub wake_time: Option<ClockTime>,
    /// Derived from the clock times; never edited on its own.
    #[serde(rename = "sleepDuration", default, skip_serializing_if = "Option::is_none")]
    pub sleep_duration_minutes: Option<u32>,
    #[serde(
        rename = "sleepQuality",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_quality"
    )]
    pub quality: Option<QualityLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Minutes it took to fall asleep.
    #[serde(rename = "sleepLatency", default, skip_serializing_if = "Option::is_none")]
    pub sleep_latency_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night_wakeups: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<SleepEnvironment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<SleepMood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<PreSleepActivities>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SleepRecord {
    /// Creates an empty record for `date` with a generated id.
    ///
    /// `created_at` and `updated_at` both start at `now`.
    pub fn new(date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            bedtime: None,
            wake_time: None,
            sleep_duration_minutes: None,
            quality: None,
            notes: None,
            sleep_latency_minutes: None,
            night_wakeups: None,
            environment: None,
            mood: None,
            activities: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates an empty record with a caller-provided id.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is blank.
    pub fn with_id(
        id: impl Into<RecordId>,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RecordValidationError::EmptyId);
        }
        let mut record = Self::new(date, now);
        record.id = id;
        Ok(record)
    }

    /// Sets both clock times and re-derives the duration from them.
    pub fn set_times(&mut self, bedtime: Option<ClockTime>, wake_time: Option<ClockTime>) {
        self.bedtime = bedtime;
        self.wake_time = wake_time;
        self.sleep_duration_minutes = derive_duration(bedtime, wake_time);
    }

    /// Duration the stored clock times imply, if both are present.
    pub fn expected_duration(&self) -> Option<u32> {
        derive_duration(self.bedtime, self.wake_time)
    }

    /// Returns whether this record counts toward duration statistics.
    pub fn has_valid_duration(&self) -> bool {
        self.sleep_duration_minutes.is_some_and(|minutes| minutes > 0)
    }

    /// Checks record invariants.
    ///
    /// # Errors
    /// - `EmptyId` for a blank identifier.
    /// - `DurationMismatch` when the stored duration disagrees with the times.
    /// - `DurationWithoutTimes` for a positive duration with a missing time.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id.trim().is_empty() {
            return Err(RecordValidationError::EmptyId);
        }

        match (self.sleep_duration_minutes, self.expected_duration()) {
            (Some(stored), Some(expected)) if stored != expected => {
                Err(RecordValidationError::DurationMismatch { stored, expected })
            }
            (Some(stored), None) if stored > 0 => {
                Err(RecordValidationError::DurationWithoutTimes(stored))
            }
            _ => Ok(()),
        }
    }
}

fn deserialize_optional_quality<'de, D>(deserializer: D) -> Result<Option<QualityLabel>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// `YYYY-MM-DD` serialization that also reads full timestamps.
///
/// A timestamp keeps the calendar date as written; the time of day and the
/// offset are dropped.
mod calendar_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const DATE_FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(text.trim())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid record date `{text}`")))
    }

    pub(super) fn parse(text: &str) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
            return Some(date);
        }
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
            return Some(timestamp.date_naive());
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|timestamp| timestamp.date())
    }
}

#[cfg(test)]
mod tests {
    use super::{calendar_date, QualityLabel, RecordValidationError, SleepRecord};
    use crate::model::clock::ClockTime;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn calendar_date_accepts_plain_dates_and_timestamps() {
        assert_eq!(calendar_date::parse("2024-01-05"), Some(date(2024, 1, 5)));
        assert_eq!(
            calendar_date::parse("2024-01-05T00:00:00Z"),
            Some(date(2024, 1, 5))
        );
        assert_eq!(
            calendar_date::parse("2024-01-05T23:10:00.123+07:00"),
            Some(date(2024, 1, 5))
        );
        assert_eq!(calendar_date::parse("05/01/2024"), None);
    }

    #[test]
    fn set_times_derives_duration_and_clears_it_for_partial_times() {
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap();
        let mut record = SleepRecord::new(date(2024, 1, 5), now);

        record.set_times(
            Some(ClockTime::new(23, 0).unwrap()),
            Some(ClockTime::new(7, 0).unwrap()),
        );
        assert_eq!(record.sleep_duration_minutes, Some(480));
        assert!(record.validate().is_ok());

        record.set_times(Some(ClockTime::new(23, 0).unwrap()), None);
        assert_eq!(record.sleep_duration_minutes, None);
        assert!(!record.has_valid_duration());
    }

    #[test]
    fn validate_reports_mismatched_duration() {
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap();
        let mut record = SleepRecord::new(date(2024, 1, 5), now);
        record.set_times(
            Some(ClockTime::new(22, 0).unwrap()),
            Some(ClockTime::new(6, 0).unwrap()),
        );
        record.sleep_duration_minutes = Some(400);

        assert_eq!(
            record.validate().unwrap_err(),
            RecordValidationError::DurationMismatch {
                stored: 400,
                expected: 480
            }
        );
    }

    #[test]
    fn quality_parses_case_insensitively() {
        assert_eq!("Fresh".parse::<QualityLabel>().unwrap(), QualityLabel::Fresh);
        assert!("great".parse::<QualityLabel>().is_err());
    }
}
