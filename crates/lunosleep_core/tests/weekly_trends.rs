use chrono::{Days, NaiveDate, TimeZone, Utc};
use lunosleep_core::{
    best_week, bucket_weeks, compare_trend, week_cells, ClockTime, DayRelation, QualityLabel,
    SleepRecord, TrendDirection,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn night(on: NaiveDate, bed: &str, wake: &str, quality: Option<QualityLabel>) -> SleepRecord {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    let mut record = SleepRecord::new(on, now);
    record.set_times(
        Some(bed.parse::<ClockTime>().unwrap()),
        Some(wake.parse::<ClockTime>().unwrap()),
    );
    record.quality = quality;
    record
}

#[test]
fn fourteen_daily_records_fill_two_weeks() {
    // 2024-01-01 is a Monday.
    let first = date(2024, 1, 1);
    let records: Vec<SleepRecord> = (0..14)
        .map(|offset| {
            night(
                first.checked_add_days(Days::new(offset)).unwrap(),
                "23:00",
                "07:00",
                None,
            )
        })
        .collect();

    let buckets = bucket_weeks(&records, 2, date(2024, 1, 14));

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].week_start, date(2024, 1, 1));
    assert_eq!(buckets[0].week_end(), date(2024, 1, 7));
    assert_eq!(buckets[1].week_start, date(2024, 1, 8));
    assert!(buckets.iter().all(|bucket| bucket.days_logged == 7));
}

#[test]
fn window_ends_at_week_of_reference_date() {
    let records = vec![
        night(date(2024, 1, 3), "23:00", "07:00", None),
        night(date(2024, 1, 10), "23:00", "07:00", None),
        night(date(2024, 1, 22), "23:00", "07:00", None),
    ];

    let buckets = bucket_weeks(&records, 4, date(2024, 1, 24));
    let starts: Vec<NaiveDate> = buckets.iter().map(|bucket| bucket.week_start).collect();
    assert_eq!(
        starts,
        vec![
            date(2024, 1, 1),
            date(2024, 1, 8),
            date(2024, 1, 15),
            date(2024, 1, 22)
        ]
    );
    let logged: Vec<usize> = buckets.iter().map(|bucket| bucket.days_logged).collect();
    assert_eq!(logged, vec![1, 1, 0, 1]);

    assert_eq!(buckets[2].stats.total_entries, 0);
    assert_eq!(buckets[2].consistency(), 0.0);
    assert_eq!(buckets[2].most_common_quality, None);

    assert!(bucket_weeks(&records, 0, date(2024, 1, 24)).is_empty());
}

#[test]
fn sunday_belongs_to_previous_monday_week() {
    let records = vec![
        night(date(2024, 1, 7), "23:00", "07:00", None),
        night(date(2024, 1, 8), "23:00", "07:00", None),
    ];

    let buckets = bucket_weeks(&records, 1, date(2024, 1, 7));
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].days_logged, 1);
    assert!(buckets[0].contains(date(2024, 1, 7)));
    assert!(!buckets[0].contains(date(2024, 1, 8)));
}

#[test]
fn duplicate_days_are_counted_and_most_common_ties_prefer_fresh() {
    let day = date(2024, 1, 2);
    let records = vec![
        night(day, "23:00", "07:00", Some(QualityLabel::Tired)),
        night(day, "23:00", "07:00", Some(QualityLabel::Fresh)),
    ];

    let buckets = bucket_weeks(&records, 1, day);
    assert_eq!(buckets[0].days_logged, 2);
    assert_eq!(buckets[0].most_common_quality, Some(QualityLabel::Fresh));
}

#[test]
fn identical_weeks_compare_as_unchanged() {
    let records = vec![
        night(date(2024, 1, 2), "23:00", "07:00", None),
        night(date(2024, 1, 9), "23:00", "07:00", None),
    ];
    let buckets = bucket_weeks(&records, 2, date(2024, 1, 9));

    let trend = compare_trend(&buckets).unwrap();
    assert_eq!(trend.duration_delta, 0.0);
    assert_eq!(trend.consistency_delta, 0.0);
    assert_eq!(trend.duration_trend, TrendDirection::Unchanged);
    assert_eq!(trend.consistency_trend, TrendDirection::Unchanged);
    assert_eq!(trend.previous_week_start, date(2024, 1, 1));
    assert_eq!(trend.current_week_start, date(2024, 1, 8));
}

#[test]
fn trend_reports_direction_of_each_delta() {
    let records = vec![
        night(date(2024, 1, 2), "23:00", "06:00", None),
        night(date(2024, 1, 3), "23:00", "08:00", None),
        night(date(2024, 1, 9), "22:00", "07:00", None),
        night(date(2024, 1, 10), "22:00", "07:00", None),
    ];
    let buckets = bucket_weeks(&records, 2, date(2024, 1, 10));

    let trend = compare_trend(&buckets).unwrap();
    assert_eq!(trend.duration_delta, 60.0);
    assert_eq!(trend.duration_trend, TrendDirection::Improving);
    assert!(trend.consistency_delta > 0.0);
    assert_eq!(trend.consistency_trend, TrendDirection::Improving);

    let reversed = compare_trend(&buckets.iter().rev().cloned().collect::<Vec<_>>()).unwrap();
    assert_eq!(reversed.duration_trend, TrendDirection::Declining);
}

#[test]
fn trend_needs_two_buckets() {
    let records = vec![night(date(2024, 1, 2), "23:00", "07:00", None)];

    assert!(compare_trend(&bucket_weeks(&records, 1, date(2024, 1, 2))).is_none());
    assert!(compare_trend(&[]).is_none());
}

#[test]
fn best_week_prefers_earliest_on_ties() {
    let records = vec![
        night(date(2024, 1, 2), "23:00", "07:00", None),
        night(date(2024, 1, 9), "23:00", "07:00", None),
    ];
    let buckets = bucket_weeks(&records, 3, date(2024, 1, 16));

    let best = best_week(&buckets).unwrap();
    assert_eq!(best.week_start, date(2024, 1, 1));
    assert!(best_week(&[]).is_none());
}

#[test]
fn week_cells_mark_past_today_and_future() {
    let records = vec![
        night(date(2024, 1, 8), "23:00", "07:00", Some(QualityLabel::Normal)),
        night(date(2024, 1, 10), "23:00", "07:00", Some(QualityLabel::Fresh)),
    ];

    let cells = week_cells(&records, date(2024, 1, 10));
    assert_eq!(cells.len(), 7);
    assert_eq!(cells[0].date, date(2024, 1, 8));
    assert_eq!(cells[6].date, date(2024, 1, 14));

    assert_eq!(cells[0].relation, DayRelation::Past);
    assert!(cells[0].record.is_some());
    assert!(cells[1].is_missed());
    assert_eq!(cells[2].relation, DayRelation::Today);
    assert_eq!(
        cells[2].record.and_then(|record| record.quality),
        Some(QualityLabel::Fresh)
    );
    assert_eq!(cells[3].relation, DayRelation::Future);
    assert!(!cells[3].is_missed());
}

#[test]
fn oversized_window_stops_at_calendar_start() {
    let reference = NaiveDate::MIN.checked_add_days(Days::new(20)).unwrap();

    let buckets = bucket_weeks(&[], usize::MAX, reference);

    assert_eq!(buckets.len(), 3);
    assert!(buckets[0].week_start >= NaiveDate::MIN);
    assert!(buckets[2].contains(reference));
    for pair in buckets.windows(2) {
        assert_eq!(
            pair[0].week_start.checked_add_days(Days::new(7)),
            Some(pair[1].week_start)
        );
    }
}
