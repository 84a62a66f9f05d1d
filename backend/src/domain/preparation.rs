//! Data preparation: raw measurement documents to a per-user series.
//!
//! Preparation never fails. Timestamps that cannot be read become an invalid
//! marker and the point stays in the [`PreparedSeries`]; only the conversion
//! to a [`TrainingSeries`] drops unusable points and fixes the ordering.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use super::{MIN_HISTORY_POINTS, MeasurementRecord, UserId};

const OFFSET_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Coerce a stored timestamp into canonical timezone-naive UTC.
///
/// Offset-aware inputs are converted to UTC before the offset is dropped;
/// naive inputs are taken as already being UTC; bare dates map to midnight.
/// Returns `None` for anything else.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use range_forecast::domain::normalize_timestamp;
///
/// let parsed = normalize_timestamp("2026-03-01T10:00:00+02:00").expect("parses");
/// let expected = NaiveDate::from_ymd_opt(2026, 3, 1)
///     .and_then(|d| d.and_hms_opt(8, 0, 0))
///     .expect("valid");
/// assert_eq!(parsed, expected);
/// assert!(normalize_timestamp("yesterday-ish").is_none());
/// ```
#[must_use]
pub fn normalize_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_utc());
    }
    OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
        .map(|parsed| parsed.naive_utc())
        .or_else(|| {
            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// One prepared observation. `None` fields mark unreadable or missing data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Canonical observation time, or `None` when the stored value was unusable.
    pub observed_at: Option<NaiveDateTime>,
    /// Observed value.
    pub value: Option<f64>,
}

impl SeriesPoint {
    /// The point as a training pair when both halves are usable.
    #[must_use]
    pub const fn usable(&self) -> Option<TrainingPoint> {
        match (self.observed_at, self.value) {
            (Some(at), Some(value)) if value.is_finite() => Some(TrainingPoint { at, value }),
            _ => None,
        }
    }
}

/// The series for one user, in store order.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    user_id: UserId,
    points: Vec<SeriesPoint>,
}

impl PreparedSeries {
    /// User the series belongs to.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Every matching record, including ones carrying invalid markers.
    #[must_use]
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Number of records that matched the user.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no record matched the user.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points with both a valid timestamp and a finite value.
    #[must_use]
    pub fn usable_len(&self) -> usize {
        self.points.iter().filter_map(SeriesPoint::usable).count()
    }

    /// Build the engine input from the usable points.
    ///
    /// # Errors
    /// Returns [`TrainingSeriesError::TooShort`] when fewer than
    /// [`MIN_HISTORY_POINTS`] usable points exist.
    pub fn training_series(&self) -> Result<TrainingSeries, TrainingSeriesError> {
        TrainingSeries::new(self.points.iter().filter_map(SeriesPoint::usable).collect())
    }
}

/// Select `user_id`'s records from `records` and normalise their timestamps.
///
/// `records` may be the whole collection; anything not owned by `user_id` is
/// ignored.
#[must_use]
pub fn prepare_series(records: &[MeasurementRecord], user_id: &UserId) -> PreparedSeries {
    let points = records
        .iter()
        .filter(|record| user_id.matches(&record.user_id))
        .map(|record| SeriesPoint {
            observed_at: record.date.as_deref().and_then(normalize_timestamp),
            value: record.current_miles,
        })
        .collect();
    PreparedSeries {
        user_id: user_id.clone(),
        points,
    }
}

/// A clean observation handed to the forecast engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingPoint {
    /// Canonical observation time.
    pub at: NaiveDateTime,
    /// Observed value.
    pub value: f64,
}

/// Raised when a series cannot be used for training.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainingSeriesError {
    /// Fewer usable points than the model needs.
    #[error("need at least {required} usable points, got {available}")]
    TooShort {
        /// Usable points present.
        available: usize,
        /// Points the model requires.
        required: usize,
    },
}

/// Clean, ascending engine input with at least [`MIN_HISTORY_POINTS`] points.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSeries {
    points: Vec<TrainingPoint>,
}

impl TrainingSeries {
    /// Validate the length and sort ascending. Ties keep their input order.
    ///
    /// # Errors
    /// Returns [`TrainingSeriesError::TooShort`] for short inputs.
    pub fn new(mut points: Vec<TrainingPoint>) -> Result<Self, TrainingSeriesError> {
        if points.len() < MIN_HISTORY_POINTS {
            return Err(TrainingSeriesError::TooShort {
                available: points.len(),
                required: MIN_HISTORY_POINTS,
            });
        }
        points.sort_by_key(|point| point.at);
        Ok(Self { points })
    }

    /// Points in ascending time order.
    #[must_use]
    pub fn points(&self) -> &[TrainingPoint] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Latest observation.
    #[must_use]
    pub fn last(&self) -> Option<&TrainingPoint> {
        self.points.last()
    }
}

#[cfg(test)]
#[path = "preparation_tests.rs"]
mod tests;
