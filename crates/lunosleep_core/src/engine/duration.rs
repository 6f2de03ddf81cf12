//! Bedtime/wake-time duration calculation.
//!
//! # Invariants
//! - A wake time at or before the bedtime is read as the next day.
//! - Equal clock times yield a full day (1440 minutes), never zero.
//! - This is the only place a sleep duration is computed.

use crate::model::clock::{ClockTime, MINUTES_PER_DAY};

/// Returns the minutes slept from `bedtime` to the following `wake_time`.
///
/// The result is in `1..=1440` for range-checked inputs. Clock times built
/// directly with out-of-range fields are not rejected; they produce an
/// arithmetically defined value.
pub fn compute_duration(bedtime: ClockTime, wake_time: ClockTime) -> u32 {
    let bed_minutes = bedtime.minutes_since_midnight();
    let mut wake_minutes = wake_time.minutes_since_midnight();

    if wake_minutes <= bed_minutes {
        wake_minutes += MINUTES_PER_DAY;
    }

    wake_minutes.saturating_sub(bed_minutes)
}

/// Duration for a pair of optional times; `None` unless both are present.
pub fn derive_duration(bedtime: Option<ClockTime>, wake_time: Option<ClockTime>) -> Option<u32> {
    match (bedtime, wake_time) {
        (Some(bedtime), Some(wake_time)) => Some(compute_duration(bedtime, wake_time)),
        _ => None,
    }
}
