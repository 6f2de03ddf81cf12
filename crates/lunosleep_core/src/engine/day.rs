//! Calendar-day lookups over a record sequence.
//!
//! # Invariants
//! - Matching is by calendar day only.
//! - When several records share a day, the first in input order wins; the
//!   resolver never deduplicates.

use chrono::{Days, NaiveDate};

use super::weekly::week_start;
use crate::model::record::SleepRecord;

/// Returns the first record dated on `date`.
pub fn find_by_date(records: &[SleepRecord], date: NaiveDate) -> Option<&SleepRecord> {
    records.iter().find(|record| record.date == date)
}

/// Position of a day relative to the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayRelation {
    Past,
    Today,
    Future,
}

/// One cell of the week grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub record: Option<&'a SleepRecord>,
    pub relation: DayRelation,
}

impl DayCell<'_> {
    /// A past day with nothing logged.
    pub fn is_missed(&self) -> bool {
        self.relation == DayRelation::Past && self.record.is_none()
    }
}

/// Monday-to-Sunday cells for the week containing `reference_date`.
pub fn week_cells(records: &[SleepRecord], reference_date: NaiveDate) -> Vec<DayCell<'_>> {
    let monday = week_start(reference_date);

    (0..7u64)
        .filter_map(|offset| monday.checked_add_days(Days::new(offset)))
        .map(|date| DayCell {
            date,
            record: find_by_date(records, date),
            relation: match date.cmp(&reference_date) {
                std::cmp::Ordering::Less => DayRelation::Past,
                std::cmp::Ordering::Equal => DayRelation::Today,
                std::cmp::Ordering::Greater => DayRelation::Future,
            },
        })
        .collect()
}
