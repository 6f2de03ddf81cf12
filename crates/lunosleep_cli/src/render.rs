//! Plain-text rendering of records and statistics.
//!
//! # Responsibility
//! - Own every user-facing label; the core only exposes enums and numbers.
//! - Return strings so output stays testable without capturing stdout.

use lunosleep_core::{
    assess_duration, AggregateStats, AppSettings, DayCell, DayRelation, DurationAssessment,
    QualityLabel, Reflection, SleepRecord, Theme, TrendComparison, TrendDirection, WeekBucket,
};
use std::fmt::Write;

/// `Xh Ym` from whole or fractional minutes.
pub fn format_duration(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    format!("{}h {}m", total / 60, total % 60)
}

pub fn quality_label(quality: QualityLabel) -> &'static str {
    match quality {
        QualityLabel::Fresh => "Fresh",
        QualityLabel::Normal => "Normal",
        QualityLabel::Tired => "Tired",
    }
}

fn assessment_label(assessment: DurationAssessment) -> &'static str {
    match assessment {
        DurationAssessment::Ideal => "ideal range",
        DurationAssessment::Short => "short night",
        DurationAssessment::Adequate => "adequate",
    }
}

fn reflection_text(reflection: Reflection) -> &'static str {
    match reflection {
        Reflection::HealthyDuration => "Your average sleep falls within the healthy 7-9 hour range.",
        Reflection::ConsistentRhythm => "You keep a consistent sleep rhythm.",
        Reflection::MostlyFresh => "You wake up fresh more often than tired.",
    }
}

fn trend_label(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Improving => "up",
        TrendDirection::Declining => "down",
        TrendDirection::Unchanged => "unchanged",
    }
}

fn theme_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
        Theme::Auto => "auto",
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

pub fn record_details(record: &SleepRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Date:      {}", record.date.format("%Y-%m-%d (%a)"));
    let _ = writeln!(out, "Bedtime:   {}", or_dash(record.bedtime));
    let _ = writeln!(out, "Wake time: {}", or_dash(record.wake_time));
    match record.sleep_duration_minutes {
        Some(minutes) if minutes > 0 => {
            let _ = writeln!(
                out,
                "Duration:  {} ({})",
                format_duration(f64::from(minutes)),
                assessment_label(assess_duration(minutes))
            );
        }
        _ => {
            let _ = writeln!(out, "Duration:  -");
        }
    }
    let _ = writeln!(out, "Quality:   {}", or_dash(record.quality.map(quality_label)));
    if let Some(latency) = record.sleep_latency_minutes {
        let _ = writeln!(out, "Fell asleep after: {latency} min");
    }
    if let Some(wakeups) = record.night_wakeups {
        let _ = writeln!(out, "Night wakeups: {wakeups}");
    }
    if let Some(notes) = &record.notes {
        let _ = writeln!(out, "Notes:     {notes}");
    }
    out
}

pub fn stats_summary(stats: &AggregateStats, reflections: &[Reflection]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Entries:          {} ({} with duration)",
        stats.total_entries, stats.valid_entries
    );
    let _ = writeln!(out, "Average duration: {}", format_duration(stats.average_duration));
    let _ = writeln!(out, "Average bedtime:  {}", stats.average_bedtime);
    let _ = writeln!(out, "Average wake:     {}", stats.average_wake_time);
    let _ = writeln!(
        out,
        "Longest / short:  {} / {}",
        format_duration(f64::from(stats.longest_duration)),
        format_duration(f64::from(stats.shortest_duration))
    );
    let _ = writeln!(out, "Consistency:      {:.0}/100", stats.consistency);
    let _ = writeln!(out, "Quality:");
    for label in QualityLabel::ALL {
        let _ = writeln!(
            out,
            "  {:<7} {:>3} ({}%)",
            quality_label(label),
            stats.quality_distribution.count(label),
            stats.quality_percentage(label)
        );
    }
    if !reflections.is_empty() {
        let _ = writeln!(out, "Reflections:");
        for reflection in reflections {
            let _ = writeln!(out, "  - {}", reflection_text(*reflection));
        }
    }
    out
}

pub fn week_line(bucket: &WeekBucket<'_>) -> String {
    format!(
        "{} - {}  {} nights  avg {}  consistency {:.0}  mostly {}",
        bucket.week_start.format("%Y-%m-%d"),
        bucket.week_end().format("%Y-%m-%d"),
        bucket.days_logged,
        format_duration(bucket.average_duration()),
        bucket.consistency(),
        or_dash(bucket.most_common_quality.map(quality_label)),
    )
}

pub fn trend_summary(trend: Option<&TrendComparison>) -> String {
    let Some(trend) = trend else {
        return "Trend: need at least two weeks to compare".to_string();
    };
    let sign = if trend.duration_delta < 0.0 { "-" } else { "+" };
    format!(
        "Trend vs week of {}: duration {} ({}{}), consistency {} ({:+.0})",
        trend.previous_week_start.format("%Y-%m-%d"),
        trend_label(trend.duration_trend),
        sign,
        format_duration(trend.duration_delta.abs()),
        trend_label(trend.consistency_trend),
        trend.consistency_delta,
    )
}

pub fn week_grid(cells: &[DayCell<'_>]) -> String {
    let mut out = String::new();
    for cell in cells {
        let marker = match cell.relation {
            DayRelation::Today => ">",
            _ => " ",
        };
        let detail = match (cell.record, cell.relation) {
            (Some(record), _) => {
                let duration = record
                    .sleep_duration_minutes
                    .filter(|minutes| *minutes > 0)
                    .map(|minutes| format_duration(f64::from(minutes)));
                format!(
                    "{}  {}",
                    or_dash(duration),
                    or_dash(record.quality.map(quality_label))
                )
            }
            (None, DayRelation::Past) => "missed".to_string(),
            (None, DayRelation::Today) => "not logged yet".to_string(),
            (None, DayRelation::Future) => String::new(),
        };
        let line = format!("{marker} {}  {detail}", cell.date.format("%a %m-%d"));
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

pub fn settings_summary(settings: &AppSettings) -> String {
    let notifications = &settings.notifications;
    let mut out = String::new();
    let _ = writeln!(out, "Reminders:        {}", on_off(notifications.enabled));
    let _ = writeln!(
        out,
        "  Bedtime:        {} at {}",
        on_off(notifications.bedtime_reminder),
        notifications.bedtime_at
    );
    let _ = writeln!(
        out,
        "  Wake-up:        {} at {}",
        on_off(notifications.wakeup_reminder),
        notifications.wakeup_at
    );
    let _ = writeln!(out, "  Sound:          {}", on_off(notifications.sound));
    let _ = writeln!(out, "Theme:            {}", theme_label(settings.theme));
    let _ = writeln!(out, "Data retention:   {} days", settings.data_retention);
    let _ = writeln!(out, "Auto backup:      {}", on_off(settings.auto_backup));
    out
}

#[cfg(test)]
mod tests {
    use super::{format_duration, record_details, trend_summary, week_grid};
    use chrono::{NaiveDate, TimeZone, Utc};
    use lunosleep_core::{week_cells, ClockTime, QualityLabel, SleepRecord};

    #[test]
    fn durations_print_as_hours_and_minutes() {
        assert_eq!(format_duration(0.0), "0h 0m");
        assert_eq!(format_duration(450.0), "7h 30m");
        assert_eq!(format_duration(1440.0), "24h 0m");
        assert_eq!(format_duration(419.6), "7h 0m");
    }

    #[test]
    fn missing_trend_is_explicit() {
        assert!(trend_summary(None).contains("at least two weeks"));
    }

    #[test]
    fn record_details_include_assessment() {
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 7, 0, 0).unwrap();
        let mut record = SleepRecord::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), now);
        record.set_times(
            Some(ClockTime::new(23, 0).unwrap()),
            Some(ClockTime::new(7, 0).unwrap()),
        );
        record.quality = Some(QualityLabel::Fresh);

        let text = record_details(&record);
        assert!(text.contains("Duration:  8h 0m (ideal range)"));
        assert!(text.contains("Quality:   Fresh"));
    }

    #[test]
    fn week_grid_marks_today_and_missed_days() {
        let reference = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let records: Vec<SleepRecord> = Vec::new();

        let grid = week_grid(&week_cells(&records, reference));
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].ends_with("missed"));
        assert!(lines[2].starts_with('>'));
        assert!(lines[2].ends_with("not logged yet"));
        assert_eq!(lines[6].trim_end(), lines[6]);
    }
}
