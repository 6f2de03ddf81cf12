//! Aggregate statistics over any set of sleep records.
//!
//! # Responsibility
//! - Reduce a record sequence into averages, a quality distribution,
//!   duration range and a 0-100 consistency score.
//!
//! # Invariants
//! - Never fails: empty input and inputs without any valid duration produce
//!   the zero value for every duration-based field.
//! - Duration fields use valid entries only (duration present and > 0);
//!   clock-time averages and the quality distribution use every record.
//! - Clock times are averaged arithmetically, with no wraparound correction
//!   across midnight.

use crate::model::record::{QualityLabel, SleepRecord};

/// Consistency points lost per hour of standard deviation.
const CONSISTENCY_PENALTY_PER_HOUR: f64 = 10.0;
const MAX_CONSISTENCY: f64 = 100.0;

/// Count of records per quality label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualityDistribution {
    pub fresh: usize,
    pub normal: usize,
    pub tired: usize,
}

impl QualityDistribution {
    /// Counts the labels present in `records`.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a SleepRecord>,
    {
        let mut distribution = Self::default();
        for label in records.into_iter().filter_map(|record| record.quality) {
            match label {
                QualityLabel::Fresh => distribution.fresh += 1,
                QualityLabel::Normal => distribution.normal += 1,
                QualityLabel::Tired => distribution.tired += 1,
            }
        }
        distribution
    }

    pub fn count(&self, label: QualityLabel) -> usize {
        match label {
            QualityLabel::Fresh => self.fresh,
            QualityLabel::Normal => self.normal,
            QualityLabel::Tired => self.tired,
        }
    }

    /// Number of records that carry any label.
    pub fn rated(&self) -> usize {
        self.fresh + self.normal + self.tired
    }

    /// Label with the highest count.
    ///
    /// Ties go to the earlier label in `QualityLabel::ALL`. Returns `None`
    /// when no record is rated.
    pub fn most_common(&self) -> Option<QualityLabel> {
        let mut best: Option<(QualityLabel, usize)> = None;
        for label in QualityLabel::ALL {
            let count = self.count(label);
            if count == 0 {
                continue;
            }
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
    }
}

/// Statistics derived from one record sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStats {
    /// Every record in the input, valid or not.
    pub total_entries: usize,
    /// Records with a positive duration.
    pub valid_entries: usize,
    /// Mean duration in minutes over valid entries.
    pub average_duration: f64,
    /// Mean bedtime in minutes since midnight.
    pub average_bedtime_minutes: f64,
    /// `average_bedtime_minutes` rendered as `HH:MM`.
    pub average_bedtime: String,
    pub average_wake_time_minutes: f64,
    pub average_wake_time: String,
    pub quality_distribution: QualityDistribution,
    pub longest_duration: u32,
    pub shortest_duration: u32,
    /// 0-100; higher means more regular durations.
    pub consistency: f64,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self {
            total_entries: 0,
            valid_entries: 0,
            average_duration: 0.0,
            average_bedtime_minutes: 0.0,
            average_bedtime: format_clock_minutes(0.0),
            average_wake_time_minutes: 0.0,
            average_wake_time: format_clock_minutes(0.0),
            quality_distribution: QualityDistribution::default(),
            longest_duration: 0,
            shortest_duration: 0,
            consistency: 0.0,
        }
    }
}

impl AggregateStats {
    /// Share of all entries rated with `label`, rounded to a whole percent.
    pub fn quality_percentage(&self, label: QualityLabel) -> u32 {
        percentage(self.quality_distribution.count(label), self.total_entries)
    }
}

/// Computes aggregate statistics over `records`.
pub fn aggregate<'a, I>(records: I) -> AggregateStats
where
    I: IntoIterator<Item = &'a SleepRecord>,
{
    let records: Vec<&SleepRecord> = records.into_iter().collect();
    if records.is_empty() {
        return AggregateStats::default();
    }

    let durations: Vec<u32> = records
        .iter()
        .filter_map(|record| record.sleep_duration_minutes)
        .filter(|minutes| *minutes > 0)
        .collect();

    let average_duration = mean(durations.iter().map(|minutes| f64::from(*minutes)));
    let average_bedtime_minutes = mean(
        records
            .iter()
            .filter_map(|record| record.bedtime)
            .map(|time| f64::from(time.minutes_since_midnight())),
    );
    let average_wake_time_minutes = mean(
        records
            .iter()
            .filter_map(|record| record.wake_time)
            .map(|time| f64::from(time.minutes_since_midnight())),
    );

    AggregateStats {
        total_entries: records.len(),
        valid_entries: durations.len(),
        average_duration,
        average_bedtime_minutes,
        average_bedtime: format_clock_minutes(average_bedtime_minutes),
        average_wake_time_minutes,
        average_wake_time: format_clock_minutes(average_wake_time_minutes),
        quality_distribution: QualityDistribution::from_records(records.iter().copied()),
        longest_duration: durations.iter().copied().max().unwrap_or(0),
        shortest_duration: durations.iter().copied().min().unwrap_or(0),
        consistency: consistency_score(&durations),
    }
}

/// Scores how regular `durations` are.
///
/// `100 - (population_std_dev / 60) * 10`, clamped to `0..=100`. A single
/// duration scores 100; no durations score 0.
pub fn consistency_score(durations: &[u32]) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }

    let average = mean(durations.iter().map(|minutes| f64::from(*minutes)));
    let variance = durations
        .iter()
        .map(|minutes| {
            let diff = f64::from(*minutes) - average;
            diff * diff
        })
        .sum::<f64>()
        / durations.len() as f64;
    let std_dev = variance.sqrt();

    (MAX_CONSISTENCY - (std_dev / 60.0) * CONSISTENCY_PENALTY_PER_HOUR).clamp(0.0, MAX_CONSISTENCY)
}

/// Renders minutes since midnight as `HH:MM`.
///
/// Hours are floored and minutes rounded separately, matching how stored
/// averages have always been displayed.
pub fn format_clock_minutes(minutes: f64) -> String {
    let hours = (minutes / 60.0).floor();
    let mins = (minutes % 60.0).round();
    format!("{:02}:{:02}", hours as i64, mins as i64)
}

/// `round(count / total * 100)`, or 0 for an empty total.
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::{consistency_score, format_clock_minutes, percentage, QualityDistribution};
    use crate::model::record::QualityLabel;

    #[test]
    fn consistency_for_spread_durations() {
        let score = consistency_score(&[360, 420, 480]);
        assert!((score - 91.835).abs() < 0.01, "score was {score}");
    }

    #[test]
    fn consistency_is_clamped_at_zero() {
        assert_eq!(consistency_score(&[60, 1440]), 0.0);
    }

    #[test]
    fn consistency_of_single_entry_is_full() {
        assert_eq!(consistency_score(&[480]), 100.0);
        assert_eq!(consistency_score(&[]), 0.0);
    }

    #[test]
    fn format_clock_minutes_floors_hours_and_rounds_minutes() {
        assert_eq!(format_clock_minutes(0.0), "00:00");
        assert_eq!(format_clock_minutes(1365.0), "22:45");
        assert_eq!(format_clock_minutes(450.4), "07:30");
    }

    #[test]
    fn percentage_guards_empty_total() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
    }

    #[test]
    fn most_common_breaks_ties_by_enumeration_order() {
        let distribution = QualityDistribution {
            fresh: 0,
            normal: 2,
            tired: 2,
        };
        assert_eq!(distribution.most_common(), Some(QualityLabel::Normal));
        assert_eq!(QualityDistribution::default().most_common(), None);
    }
}
