//! Persisted user settings.
//!
//! # Responsibility
//! - Define reminder, theme and retention preferences with their defaults.
//!
//! # Invariants
//! - A missing field in a stored document falls back to its default, so
//!   older settings blobs keep loading.
//! - Reminder times are written as `bedtimeAt`/`wakeupAt` strings. Documents
//!   using split `bedtimeHour`/`bedtimeMinute` (and `wakeup*`) numbers are
//!   still read; the string form wins when both are present.

use serde::{Deserialize, Serialize};

use super::clock::ClockTime;
use super::record::RecordValidationError;

const DEFAULT_BEDTIME_REMINDER: ClockTime = ClockTime {
    hour: 21,
    minute: 0,
};
const DEFAULT_WAKEUP_REMINDER: ClockTime = ClockTime { hour: 7, minute: 0 };
const DEFAULT_DATA_RETENTION_DAYS: u32 = 365;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

/// Reminder preferences. Delivery is up to the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "NotificationDocument")]
pub struct NotificationSettings {
    pub enabled: bool,
    pub bedtime_reminder: bool,
    pub bedtime_at: ClockTime,
    pub wakeup_reminder: bool,
    pub wakeup_at: ClockTime,
    pub sound: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            bedtime_reminder: true,
            bedtime_at: DEFAULT_BEDTIME_REMINDER,
            wakeup_reminder: false,
            wakeup_at: DEFAULT_WAKEUP_REMINDER,
            sound: true,
        }
    }
}

/// Stored shape of `NotificationSettings`, every field optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationDocument {
    enabled: Option<bool>,
    bedtime_reminder: Option<bool>,
    bedtime_at: Option<ClockTime>,
    bedtime_hour: Option<u8>,
    bedtime_minute: Option<u8>,
    wakeup_reminder: Option<bool>,
    wakeup_at: Option<ClockTime>,
    wakeup_hour: Option<u8>,
    wakeup_minute: Option<u8>,
    sound: Option<bool>,
}

impl TryFrom<NotificationDocument> for NotificationSettings {
    type Error = RecordValidationError;

    fn try_from(document: NotificationDocument) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        Ok(Self {
            enabled: document.enabled.unwrap_or(defaults.enabled),
            bedtime_reminder: document
                .bedtime_reminder
                .unwrap_or(defaults.bedtime_reminder),
            bedtime_at: reminder_time(
                document.bedtime_at,
                document.bedtime_hour,
                document.bedtime_minute,
                defaults.bedtime_at,
            )?,
            wakeup_reminder: document.wakeup_reminder.unwrap_or(defaults.wakeup_reminder),
            wakeup_at: reminder_time(
                document.wakeup_at,
                document.wakeup_hour,
                document.wakeup_minute,
                defaults.wakeup_at,
            )?,
            sound: document.sound.unwrap_or(defaults.sound),
        })
    }
}

fn reminder_time(
    at: Option<ClockTime>,
    hour: Option<u8>,
    minute: Option<u8>,
    default: ClockTime,
) -> Result<ClockTime, RecordValidationError> {
    match (at, hour, minute) {
        (Some(at), _, _) => Ok(at),
        (None, None, None) => Ok(default),
        (None, hour, minute) => {
            ClockTime::new(hour.unwrap_or(default.hour), minute.unwrap_or(default.minute))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub notifications: NotificationSettings,
    pub theme: Theme,
    /// Days of history the user wants kept.
    pub data_retention: u32,
    pub auto_backup: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            notifications: NotificationSettings::default(),
            theme: Theme::default(),
            data_retention: DEFAULT_DATA_RETENTION_DAYS,
            auto_backup: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppSettings, Theme};
    use crate::model::clock::ClockTime;

    #[test]
    fn partial_document_falls_back_to_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"theme":"dark","notifications":{"enabled":true}}"#).unwrap();

        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.notifications.enabled);
        assert!(settings.notifications.bedtime_reminder);
        assert_eq!(settings.notifications.bedtime_at.to_string(), "21:00");
        assert_eq!(settings.data_retention, 365);
    }

    #[test]
    fn split_hour_minute_reminders_are_read() {
        let settings: AppSettings = serde_json::from_str(
            r#"{"notifications":{"enabled":true,"bedtimeHour":22,"bedtimeMinute":30,
                "wakeupReminder":true,"wakeupHour":6,"wakeupMinute":15,"sound":false},
                "dataRetention":90}"#,
        )
        .unwrap();

        let notifications = &settings.notifications;
        assert_eq!(notifications.bedtime_at, ClockTime::new(22, 30).unwrap());
        assert_eq!(notifications.wakeup_at, ClockTime::new(6, 15).unwrap());
        assert!(notifications.wakeup_reminder);
        assert!(!notifications.sound);
        assert_eq!(settings.data_retention, 90);
    }

    #[test]
    fn string_reminder_time_wins_over_split_fields() {
        let settings: AppSettings = serde_json::from_str(
            r#"{"notifications":{"bedtimeAt":"23:00","bedtimeHour":20,"bedtimeMinute":0}}"#,
        )
        .unwrap();

        assert_eq!(
            settings.notifications.bedtime_at,
            ClockTime::new(23, 0).unwrap()
        );
    }

    #[test]
    fn out_of_range_split_reminder_is_rejected() {
        let result = serde_json::from_str::<AppSettings>(
            r#"{"notifications":{"bedtimeHour":25,"bedtimeMinute":0}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn written_document_reads_back() {
        let mut settings = AppSettings::default();
        settings.notifications.bedtime_at = ClockTime::new(22, 45).unwrap();

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"bedtimeAt\":\"22:45\""));
        assert_eq!(serde_json::from_str::<AppSettings>(&json).unwrap(), settings);
    }
}
