//! Monday-aligned weekly buckets and week-over-week trends.
//!
//! # Responsibility
//! - Partition records into calendar weeks ending at a reference date.
//! - Summarize each week and compare the two most recent ones.
//!
//! # Invariants
//! - A week is the half-open interval `[monday, monday + 7 days)`.
//! - Buckets are ordered oldest first and are never persisted.
//! - "Now" is always the caller-provided `reference_date`.

use chrono::{Datelike, Days, NaiveDate};

use super::stats::{aggregate, AggregateStats};
use crate::model::record::{QualityLabel, SleepRecord};

const DAYS_PER_WEEK: u64 = 7;

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN)
}

/// One calendar week of records with its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket<'a> {
    /// Monday that opens the week.
    pub week_start: NaiveDate,
    /// Records dated inside the week, in input order.
    pub records: Vec<&'a SleepRecord>,
    pub stats: AggregateStats,
    /// `None` when no record in the week carries a quality label.
    pub most_common_quality: Option<QualityLabel>,
    /// Number of records in the week, duplicates included.
    pub days_logged: usize,
}

impl<'a> WeekBucket<'a> {
    fn collect(records: &'a [SleepRecord], week_start: NaiveDate) -> Self {
        let week_records: Vec<&'a SleepRecord> = records
            .iter()
            .filter(|record| week_contains(week_start, record.date))
            .collect();
        let stats = aggregate(week_records.iter().copied());

        Self {
            week_start,
            most_common_quality: stats.quality_distribution.most_common(),
            days_logged: week_records.len(),
            records: week_records,
            stats,
        }
    }

    /// Sunday that closes the week (inclusive).
    pub fn week_end(&self) -> NaiveDate {
        self.week_start
            .checked_add_days(Days::new(DAYS_PER_WEEK - 1))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        week_contains(self.week_start, date)
    }

    pub fn average_duration(&self) -> f64 {
        self.stats.average_duration
    }

    pub fn consistency(&self) -> f64 {
        self.stats.consistency
    }
}

fn week_contains(week_start: NaiveDate, date: NaiveDate) -> bool {
    match week_start.checked_add_days(Days::new(DAYS_PER_WEEK)) {
        Some(next_week) => week_start <= date && date < next_week,
        None => week_start <= date,
    }
}

/// Builds `window_weeks` consecutive buckets ending with the week that
/// contains `reference_date`, oldest first.
///
/// Weeks starting before `NaiveDate::MIN` are not representable; the window
/// stops at the oldest one that is.
pub fn bucket_weeks(
    records: &[SleepRecord],
    window_weeks: usize,
    reference_date: NaiveDate,
) -> Vec<WeekBucket<'_>> {
    let current_week = week_start(reference_date);

    let mut starts: Vec<NaiveDate> = (0..window_weeks)
        .map_while(|weeks_back| {
            let days = u64::try_from(weeks_back).ok()?.checked_mul(DAYS_PER_WEEK)?;
            current_week.checked_sub_days(Days::new(days))
        })
        .collect();
    starts.reverse();

    starts
        .into_iter()
        .map(|start| WeekBucket::collect(records, start))
        .collect()
}

/// Direction of a week-over-week change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Improving,
    Declining,
    Unchanged,
}

impl TrendDirection {
    /// Classifies a delta by sign; exactly zero is `Unchanged`.
    pub fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            Self::Improving
        } else if delta < 0.0 {
            Self::Declining
        } else {
            Self::Unchanged
        }
    }
}

/// Change between the previous and the current week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendComparison {
    pub previous_week_start: NaiveDate,
    pub current_week_start: NaiveDate,
    /// `current.average_duration - previous.average_duration`, in minutes.
    pub duration_delta: f64,
    /// `current.consistency - previous.consistency`, in score points.
    pub consistency_delta: f64,
    pub duration_trend: TrendDirection,
    pub consistency_trend: TrendDirection,
}

/// Compares the last two buckets.
///
/// Returns `None` when fewer than two buckets exist; callers must handle
/// the missing comparison instead of reading it as "no change".
pub fn compare_trend(buckets: &[WeekBucket<'_>]) -> Option<TrendComparison> {
    let [.., previous, current] = buckets else {
        return None;
    };

    let duration_delta = current.average_duration() - previous.average_duration();
    let consistency_delta = current.consistency() - previous.consistency();

    Some(TrendComparison {
        previous_week_start: previous.week_start,
        current_week_start: current.week_start,
        duration_delta,
        consistency_delta,
        duration_trend: TrendDirection::from_delta(duration_delta),
        consistency_trend: TrendDirection::from_delta(consistency_delta),
    })
}

/// Bucket with the highest consistency; the earliest wins ties.
pub fn best_week<'b, 'a>(buckets: &'b [WeekBucket<'a>]) -> Option<&'b WeekBucket<'a>> {
    buckets.iter().fold(None, |best, bucket| match best {
        Some(current_best) if bucket.consistency() <= current_best.consistency() => {
            Some(current_best)
        }
        _ => Some(bucket),
    })
}

#[cfg(test)]
mod tests {
    use super::{week_start, TrendDirection};
    use chrono::NaiveDate;

    #[test]
    fn week_start_is_monday() {
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(week_start(sunday), monday);
        assert_eq!(week_start(monday), monday);
        assert_eq!(
            week_start(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
        );
    }

    #[test]
    fn zero_delta_is_its_own_class() {
        assert_eq!(TrendDirection::from_delta(0.0), TrendDirection::Unchanged);
        assert_eq!(TrendDirection::from_delta(0.5), TrendDirection::Improving);
        assert_eq!(TrendDirection::from_delta(-3.0), TrendDirection::Declining);
    }
}
