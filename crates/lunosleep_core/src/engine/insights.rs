//! Plain-language readings of durations and aggregate statistics.

use std::ops::RangeInclusive;

use super::stats::AggregateStats;

/// Seven to nine hours.
pub const HEALTHY_DURATION_MINUTES: RangeInclusive<f64> = 420.0..=540.0;
const SHORT_SLEEP_BELOW_MINUTES: u32 = 360;
const CONSISTENT_RHYTHM_MIN_SCORE: f64 = 70.0;

/// How one night's duration compares with common guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationAssessment {
    /// 7 to 9 hours.
    Ideal,
    /// Under 6 hours.
    Short,
    Adequate,
}

pub fn assess_duration(minutes: u32) -> DurationAssessment {
    if HEALTHY_DURATION_MINUTES.contains(&f64::from(minutes)) {
        DurationAssessment::Ideal
    } else if minutes < SHORT_SLEEP_BELOW_MINUTES {
        DurationAssessment::Short
    } else {
        DurationAssessment::Adequate
    }
}

/// Positive observations drawn from aggregate statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reflection {
    HealthyDuration,
    ConsistentRhythm,
    MostlyFresh,
}

/// Reflections that hold for `stats`, in display order.
pub fn reflections(stats: &AggregateStats) -> Vec<Reflection> {
    let mut found = Vec::new();
    if HEALTHY_DURATION_MINUTES.contains(&stats.average_duration) {
        found.push(Reflection::HealthyDuration);
    }
    if stats.consistency >= CONSISTENT_RHYTHM_MIN_SCORE {
        found.push(Reflection::ConsistentRhythm);
    }
    if stats.quality_distribution.fresh > stats.quality_distribution.tired {
        found.push(Reflection::MostlyFresh);
    }
    found
}
