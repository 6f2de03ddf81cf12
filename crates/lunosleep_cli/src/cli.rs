//! Command-line surface.

use chrono::NaiveDate;
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use lunosleep_core::config::{DATA_DIR_ENV, LOG_LEVEL_ENV};
use lunosleep_core::{ClockTime, QualityLabel};
use std::path::PathBuf;

/// Ten years of weeks.
const MAX_WEEKLY_WINDOW: u64 = 520;

#[derive(Debug, Parser)]
#[command(
    name = "lunosleep",
    version,
    about = "Local sleep journal with weekly statistics",
    long_about = "Log bedtime, wake time and how rested you felt, then review averages, \
                  consistency and week-over-week trends. Data stays on this machine."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the database and logs
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true, env = LOG_LEVEL_ENV)]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save the entry for a night, replacing that day's existing entry
    Log(LogArgs),

    /// Show the entry for one day
    Show {
        /// Day to show (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Averages, quality mix and consistency over all entries
    Stats,

    /// Per-week summaries and the latest week-over-week trend
    Weekly {
        /// Number of weeks ending with the current one (1-520)
        #[arg(
            long,
            default_value_t = 4,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_WEEKLY_WINDOW)
        )]
        weeks: usize,
    },

    /// Monday-to-Sunday grid of the current week
    Week {
        /// Any day inside the week to show (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Write all entries and settings to a JSON backup
    Export {
        /// Target file (defaults to lunosleep-backup-YYYY-MM-DD.json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Delete every entry and reset settings
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Reminder and display preferences
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Day the entry belongs to (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Bedtime as HH:MM
    #[arg(long)]
    pub bedtime: Option<ClockTime>,

    /// Wake time as HH:MM
    #[arg(long = "wake", alias = "wake-time")]
    pub wake_time: Option<ClockTime>,

    /// fresh, normal or tired
    #[arg(long)]
    pub quality: Option<QualityLabel>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Minutes it took to fall asleep
    #[arg(long)]
    pub latency: Option<u32>,

    /// Times woken during the night
    #[arg(long)]
    pub wakeups: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print current settings
    Show,

    /// Change reminder preferences
    Reminder(ReminderArgs),
}

#[derive(Debug, Args)]
pub struct ReminderArgs {
    /// Turn reminders on or off
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Bedtime reminder time as HH:MM
    #[arg(long)]
    pub bedtime: Option<ClockTime>,

    /// Wake-up reminder time as HH:MM
    #[arg(long)]
    pub wakeup: Option<ClockTime>,

    /// Enable or disable the bedtime reminder
    #[arg(long)]
    pub bedtime_reminder: Option<bool>,

    /// Enable or disable the wake-up reminder
    #[arg(long)]
    pub wakeup_reminder: Option<bool>,

    /// Play a sound with reminders
    #[arg(long)]
    pub sound: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, SettingsCommand};
    use clap::{CommandFactory, Parser};
    use lunosleep_core::{ClockTime, QualityLabel};

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_parses_typed_values() {
        let cli = Cli::try_parse_from([
            "lunosleep",
            "log",
            "--date",
            "2024-01-05",
            "--bedtime",
            "23:15",
            "--wake",
            "06:45",
            "--quality",
            "Fresh",
        ])
        .unwrap();

        let Command::Log(args) = cli.command else {
            panic!("expected log command");
        };
        assert_eq!(args.bedtime, Some(ClockTime::new(23, 15).unwrap()));
        assert_eq!(args.wake_time, Some(ClockTime::new(6, 45).unwrap()));
        assert_eq!(args.quality, Some(QualityLabel::Fresh));
    }

    #[test]
    fn log_rejects_malformed_time() {
        assert!(Cli::try_parse_from(["lunosleep", "log", "--bedtime", "7pm"]).is_err());
    }

    #[test]
    fn settings_reminder_accepts_flags() {
        let cli = Cli::try_parse_from([
            "lunosleep",
            "settings",
            "reminder",
            "--enabled",
            "true",
            "--bedtime",
            "22:30",
        ])
        .unwrap();

        let Command::Settings {
            action: SettingsCommand::Reminder(args),
        } = cli.command
        else {
            panic!("expected settings reminder");
        };
        assert_eq!(args.enabled, Some(true));
        assert_eq!(args.bedtime, Some(ClockTime::new(22, 30).unwrap()));
        assert_eq!(args.wakeup, None);
    }

    #[test]
    fn weekly_defaults_to_four_weeks() {
        let cli = Cli::try_parse_from(["lunosleep", "weekly"]).unwrap();
        assert!(matches!(cli.command, Command::Weekly { weeks: 4 }));
    }

    #[test]
    fn weekly_rejects_window_outside_range() {
        assert!(Cli::try_parse_from(["lunosleep", "weekly", "--weeks", "0"]).is_err());
        assert!(Cli::try_parse_from(["lunosleep", "weekly", "--weeks", "521"]).is_err());
        assert!(
            Cli::try_parse_from(["lunosleep", "weekly", "--weeks", "18446744073709551615"])
                .is_err()
        );

        let cli = Cli::try_parse_from(["lunosleep", "weekly", "--weeks", "520"]).unwrap();
        assert!(matches!(cli.command, Command::Weekly { weeks: 520 }));
    }
}
