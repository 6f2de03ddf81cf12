//! Command handlers.
//!
//! # Responsibility
//! - Map parsed commands onto core services and render their results.
//!
//! # Invariants
//! - Handlers never read the clock; `today` and `now` come from `Context`.
//! - Read-only commands tolerate a corrupted record blob; writes do not.

use crate::cli::{Command, LogArgs, ReminderArgs, SettingsCommand};
use crate::error::CliError;
use crate::render;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use lunosleep_core::{
    aggregate, best_week, bucket_weeks, compare_trend, find_by_date, reflections, week_cells,
    EntryInput, RecordService, SqliteRecordStore, SqliteSettingsStore,
};
use rusqlite::Connection;
use std::fmt::Write;
use std::path::PathBuf;

/// Everything a handler needs besides its arguments.
pub struct Context<'conn> {
    pub conn: &'conn Connection,
    /// Local calendar day used as the reference date.
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
    /// Directory for exports without an explicit `--output`.
    pub working_dir: PathBuf,
}

impl<'conn> Context<'conn> {
    fn records(&self) -> RecordService<SqliteRecordStore<'conn>> {
        RecordService::new(SqliteRecordStore::new(self.conn))
    }

    fn settings(&self) -> SqliteSettingsStore<'conn> {
        SqliteSettingsStore::new(self.conn)
    }
}

/// Runs `command` and returns the text to print.
pub fn execute(command: &Command, ctx: &Context<'_>) -> Result<String, CliError> {
    match command {
        Command::Log(args) => log_entry(args, ctx),
        Command::Show { date } => Ok(show(date.unwrap_or(ctx.today), ctx)),
        Command::Stats => Ok(stats(ctx)),
        Command::Weekly { weeks } => Ok(weekly(*weeks, ctx)),
        Command::Week { date } => Ok(week(date.unwrap_or(ctx.today), ctx)),
        Command::Export { output } => export(output.clone(), ctx),
        Command::Clear { yes } => clear(*yes, ctx),
        Command::Settings { action } => match action {
            SettingsCommand::Show => Ok(render::settings_summary(&ctx.settings().load()?)),
            SettingsCommand::Reminder(args) => update_reminders(args, ctx),
        },
    }
}

fn log_entry(args: &LogArgs, ctx: &Context<'_>) -> Result<String, CliError> {
    let input = EntryInput {
        bedtime: args.bedtime,
        wake_time: args.wake_time,
        quality: args.quality,
        notes: args.notes.clone(),
        sleep_latency_minutes: args.latency,
        night_wakeups: args.wakeups,
    };
    let date = args.date.unwrap_or(ctx.today);
    let record = ctx.records().log_for_date(date, &input, ctx.now)?;

    Ok(format!("Saved.\n{}", render::record_details(&record)))
}

fn show(date: NaiveDate, ctx: &Context<'_>) -> String {
    let records = ctx.records().records_or_empty();
    match find_by_date(&records, date) {
        Some(record) => render::record_details(record),
        None => format!("No entry for {}.\n", date.format("%Y-%m-%d")),
    }
}

fn stats(ctx: &Context<'_>) -> String {
    let records = ctx.records().records_or_empty();
    if records.is_empty() {
        return "No entries yet. Log a night with `lunosleep log`.\n".to_string();
    }
    let stats = aggregate(&records);
    render::stats_summary(&stats, &reflections(&stats))
}

fn weekly(weeks: usize, ctx: &Context<'_>) -> String {
    let records = ctx.records().records_or_empty();
    let buckets = bucket_weeks(&records, weeks, ctx.today);

    let mut out = String::new();
    for bucket in &buckets {
        let _ = writeln!(out, "{}", render::week_line(bucket));
    }
    let _ = writeln!(out, "{}", render::trend_summary(compare_trend(&buckets).as_ref()));
    if let Some(best) = best_week(&buckets).filter(|bucket| bucket.days_logged > 0) {
        let _ = writeln!(
            out,
            "Most consistent week: {}",
            best.week_start.format("%Y-%m-%d")
        );
    }
    out
}

fn week(date: NaiveDate, ctx: &Context<'_>) -> String {
    let records = ctx.records().records_or_empty();
    render::week_grid(&week_cells(&records, date))
}

fn export(output: Option<PathBuf>, ctx: &Context<'_>) -> Result<String, CliError> {
    let settings = ctx.settings().load()?;
    let backup = ctx.records().export_backup(&settings, ctx.now)?;
    let path = output.unwrap_or_else(|| ctx.working_dir.join(backup.file_name()));

    let json = serde_json::to_string_pretty(&backup)?;
    std::fs::write(&path, json)?;
    info!(
        "event=backup_write module=cli status=ok count={}",
        backup.entries.len()
    );
    Ok(format!(
        "Exported {} entries to {}\n",
        backup.entries.len(),
        path.display()
    ))
}

fn clear(confirmed: bool, ctx: &Context<'_>) -> Result<String, CliError> {
    if !confirmed {
        return Err(CliError::ConfirmationRequired("clear"));
    }
    ctx.records().clear_all()?;
    ctx.settings().clear()?;
    Ok("All entries and settings were deleted.\n".to_string())
}

fn update_reminders(args: &ReminderArgs, ctx: &Context<'_>) -> Result<String, CliError> {
    let store = ctx.settings();
    let mut settings = store.load()?;
    let notifications = &mut settings.notifications;

    if let Some(enabled) = args.enabled {
        notifications.enabled = enabled;
    }
    if let Some(at) = args.bedtime {
        notifications.bedtime_at = at;
    }
    if let Some(at) = args.wakeup {
        notifications.wakeup_at = at;
    }
    if let Some(on) = args.bedtime_reminder {
        notifications.bedtime_reminder = on;
    }
    if let Some(on) = args.wakeup_reminder {
        notifications.wakeup_reminder = on;
    }
    if let Some(on) = args.sound {
        notifications.sound = on;
    }

    store.save(&settings)?;
    Ok(render::settings_summary(&settings))
}

#[cfg(test)]
mod tests {
    use super::{execute, Context};
    use crate::cli::{Command, LogArgs, ReminderArgs, SettingsCommand};
    use crate::error::CliError;
    use chrono::{NaiveDate, TimeZone, Utc};
    use lunosleep_core::db::open_db_in_memory;
    use lunosleep_core::{ClockTime, QualityLabel};
    use rusqlite::Connection;

    fn context(conn: &Connection, working_dir: std::path::PathBuf) -> Context<'_> {
        Context {
            conn,
            today: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            now: Utc.with_ymd_and_hms(2024, 1, 10, 7, 0, 0).unwrap(),
            working_dir,
        }
    }

    fn log_args(bed: (u8, u8), wake: (u8, u8), quality: QualityLabel) -> LogArgs {
        LogArgs {
            date: None,
            bedtime: Some(ClockTime::new(bed.0, bed.1).unwrap()),
            wake_time: Some(ClockTime::new(wake.0, wake.1).unwrap()),
            quality: Some(quality),
            notes: None,
            latency: None,
            wakeups: None,
        }
    }

    #[test]
    fn log_then_show_and_stats() {
        let conn = open_db_in_memory().unwrap();
        let ctx = context(&conn, std::env::temp_dir());

        let saved = execute(
            &Command::Log(log_args((23, 0), (7, 30), QualityLabel::Fresh)),
            &ctx,
        )
        .unwrap();
        assert!(saved.contains("8h 30m"));

        let shown = execute(&Command::Show { date: None }, &ctx).unwrap();
        assert!(shown.contains("Bedtime:   23:00"));

        let stats = execute(&Command::Stats, &ctx).unwrap();
        assert!(stats.contains("Entries:          1 (1 with duration)"));
        assert!(stats.contains("Consistency:      100/100"));
    }

    #[test]
    fn weekly_reports_missing_trend_for_single_week() {
        let conn = open_db_in_memory().unwrap();
        let ctx = context(&conn, std::env::temp_dir());

        let out = execute(&Command::Weekly { weeks: 1 }, &ctx).unwrap();
        assert!(out.contains("need at least two weeks"));
        assert!(!out.contains("Most consistent week"));
    }

    #[test]
    fn clear_requires_confirmation() {
        let conn = open_db_in_memory().unwrap();
        let ctx = context(&conn, std::env::temp_dir());

        let err = execute(&Command::Clear { yes: false }, &ctx).unwrap_err();
        assert!(matches!(err, CliError::ConfirmationRequired("clear")));
        assert!(execute(&Command::Clear { yes: true }, &ctx).is_ok());
    }

    #[test]
    fn export_writes_backup_named_by_date() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_db_in_memory().unwrap();
        let ctx = context(&conn, dir.path().to_path_buf());
        execute(
            &Command::Log(log_args((22, 0), (6, 0), QualityLabel::Normal)),
            &ctx,
        )
        .unwrap();

        execute(&Command::Export { output: None }, &ctx).unwrap();

        let written =
            std::fs::read_to_string(dir.path().join("lunosleep-backup-2024-01-10.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["entries"][0]["sleepDuration"], 480);
    }

    #[test]
    fn reminder_update_persists() {
        let conn = open_db_in_memory().unwrap();
        let ctx = context(&conn, std::env::temp_dir());
        let args = ReminderArgs {
            enabled: Some(true),
            bedtime: Some(ClockTime::new(22, 15).unwrap()),
            wakeup: None,
            bedtime_reminder: None,
            wakeup_reminder: Some(true),
            sound: None,
        };

        execute(
            &Command::Settings {
                action: SettingsCommand::Reminder(args),
            },
            &ctx,
        )
        .unwrap();

        let shown = execute(
            &Command::Settings {
                action: SettingsCommand::Show,
            },
            &ctx,
        )
        .unwrap();
        assert!(shown.contains("Reminders:        on"));
        assert!(shown.contains("Bedtime:        on at 22:15"));
        assert!(shown.contains("Wake-up:        on at 07:00"));
    }
}
