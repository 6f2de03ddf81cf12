//! Clock-time value type.
//!
//! # Responsibility
//! - Represent a time-of-day (`hour`, `minute`) without any date component.
//! - Parse and format the `HH:MM` wire text used by stored records.
//!
//! # Invariants
//! - Values produced by `ClockTime::new` and `FromStr` are range-checked
//!   (`hour` in 0..=23, `minute` in 0..=59).
//! - Fields stay public; arithmetic helpers never reject out-of-range values
//!   built directly, they only compute with them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::record::RecordValidationError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

static CLOCK_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,2}):([0-9]{2})$").expect("valid clock time regex"));

/// Time-of-day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    /// Creates a range-checked clock time.
    ///
    /// # Errors
    /// - `ClockTimeOutOfRange` when `hour > 23` or `minute > 59`.
    pub fn new(hour: u8, minute: u8) -> Result<Self, RecordValidationError> {
        if hour > 23 || minute > 59 {
            return Err(RecordValidationError::ClockTimeOutOfRange {
                hour: u32::from(hour),
                minute: u32::from(minute),
            });
        }
        Ok(Self { hour, minute })
    }

    /// Minutes elapsed since 00:00 (`hour * 60 + minute`).
    pub fn minutes_since_midnight(self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = RecordValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let captures = CLOCK_TIME_RE
            .captures(trimmed)
            .ok_or_else(|| RecordValidationError::InvalidClockTime(trimmed.to_string()))?;

        let hour = captures[1]
            .parse::<u8>()
            .map_err(|_| RecordValidationError::InvalidClockTime(trimmed.to_string()))?;
        let minute = captures[2]
            .parse::<u8>()
            .map_err(|_| RecordValidationError::InvalidClockTime(trimmed.to_string()))?;

        Self::new(hour, minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Deserializes an optional `HH:MM` value where an empty string means absent.
///
/// Older blobs store unset times as `""` instead of omitting the field.
pub(crate) fn deserialize_optional_clock_time<'de, D>(
    deserializer: D,
) -> Result<Option<ClockTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
