//! Tests for timestamp coercion and per-user series preparation.

use chrono::{NaiveDate, NaiveDateTime};
use rstest::{fixture, rstest};

use super::*;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .expect("valid fixture timestamp")
}

fn record(user: &str, date: Option<&str>, miles: Option<f64>) -> MeasurementRecord {
    MeasurementRecord::new(user, date.map(str::to_owned), miles)
}

#[fixture]
fn user() -> UserId {
    UserId::new("user-a").expect("valid id")
}

#[rstest]
#[case("2026-03-01T08:30:00Z", at(2026, 3, 1, 8, 30, 0))]
#[case("2026-03-01T10:30:00+02:00", at(2026, 3, 1, 8, 30, 0))]
#[case("2026-03-01 08:30:00.250-01:00", at(2026, 3, 1, 9, 30, 0) + chrono::Duration::milliseconds(250))]
#[case("2026-03-01T08:30:00", at(2026, 3, 1, 8, 30, 0))]
#[case("2026-03-01 08:30:15", at(2026, 3, 1, 8, 30, 15))]
#[case("2026-03-01 08:30", at(2026, 3, 1, 8, 30, 0))]
#[case("2026-03-01", at(2026, 3, 1, 0, 0, 0))]
#[case("2026/03/01", at(2026, 3, 1, 0, 0, 0))]
#[case("  2026-03-01  ", at(2026, 3, 1, 0, 0, 0))]
fn normalises_supported_forms(#[case] raw: &str, #[case] expected: NaiveDateTime) {
    assert_eq!(normalize_timestamp(raw), Some(expected));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("not a date")]
#[case("2026-13-01")]
#[case("2026-02-30T00:00:00Z")]
fn unreadable_timestamps_become_invalid(#[case] raw: &str) {
    assert_eq!(normalize_timestamp(raw), None);
}

#[rstest]
fn keeps_only_exact_user_matches(user: UserId) {
    let records = vec![
        record("user-a", Some("2026-03-01"), Some(10.0)),
        record("user-b", Some("2026-03-02"), Some(11.0)),
        record("USER-A", Some("2026-03-03"), Some(12.0)),
        record("user-a", Some("2026-03-04"), Some(13.0)),
    ];

    let series = prepare_series(&records, &user);

    assert_eq!(series.len(), 2);
    assert_eq!(series.user_id(), &user);
    let values: Vec<_> = series.points().iter().map(|p| p.value).collect();
    assert_eq!(values, vec![Some(10.0), Some(13.0)]);
}

#[rstest]
fn invalid_markers_are_kept_but_not_usable(user: UserId) {
    let records = vec![
        record("user-a", Some("garbage"), Some(10.0)),
        record("user-a", None, Some(11.0)),
        record("user-a", Some("2026-03-01"), None),
        record("user-a", Some("2026-03-02"), Some(f64::NAN)),
        record("user-a", Some("2026-03-03"), Some(14.0)),
    ];

    let series = prepare_series(&records, &user);

    assert_eq!(series.len(), 5);
    assert_eq!(series.usable_len(), 1);
    let first = series.points().first().expect("first point");
    assert!(first.observed_at.is_none());
}

#[rstest]
fn unknown_user_yields_empty_series(user: UserId) {
    let records = vec![record("user-b", Some("2026-03-01"), Some(1.0))];
    let series = prepare_series(&records, &user);
    assert!(series.is_empty());
}

#[rstest]
fn training_series_sorts_and_drops_unusable(user: UserId) {
    let mut records: Vec<_> = (1..=8)
        .rev()
        .map(|day| {
            record(
                "user-a",
                Some(&format!("2026-03-{day:02}")),
                Some(f64::from(day)),
            )
        })
        .collect();
    records.push(record("user-a", Some("bad"), Some(99.0)));

    let training = prepare_series(&records, &user)
        .training_series()
        .expect("enough points");

    assert_eq!(training.len(), 8);
    let ordered = training
        .points()
        .windows(2)
        .all(|pair| matches!(pair, [a, b] if a.at <= b.at));
    assert!(ordered, "training points must be ascending");
    assert_eq!(training.last().map(|p| p.value), Some(8.0));
}

#[rstest]
fn training_series_rejects_short_input(user: UserId) {
    let records: Vec<_> = (1..=6)
        .map(|day| record("user-a", Some(&format!("2026-03-{day:02}")), Some(1.0)))
        .collect();

    let result = prepare_series(&records, &user).training_series();

    assert_eq!(
        result,
        Err(TrainingSeriesError::TooShort {
            available: 6,
            required: MIN_HISTORY_POINTS
        })
    );
}
