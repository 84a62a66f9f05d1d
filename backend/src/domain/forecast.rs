//! Forecast projections and the records persisted from them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Calendar days projected past the last observation.
pub const FORECAST_HORIZON_DAYS: u32 = 30;

/// Usable observations required before a forecast is attempted.
pub const MIN_HISTORY_POINTS: usize = 7;

/// A predicted value at one timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Predicted timestamp (canonical, timezone-naive UTC).
    pub ds: NaiveDateTime,
    /// Predicted value.
    pub yhat: f64,
}

/// Engine output: the fitted span followed by the future horizon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedSeries {
    points: Vec<ProjectedPoint>,
}

impl ProjectedSeries {
    /// Wrap engine output.
    #[must_use]
    pub const fn new(points: Vec<ProjectedPoint>) -> Self {
        Self { points }
    }

    /// All projected points in engine order.
    #[must_use]
    pub fn points(&self) -> &[ProjectedPoint] {
        &self.points
    }

    /// Number of projected points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the engine produced nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A persisted forecast document.
///
/// Serialised with the collection's field names: `userId`, `ds`, `yhat`,
/// `generationDate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    /// Owner of the forecast.
    pub user_id: UserId,
    /// Predicted timestamp.
    pub ds: NaiveDateTime,
    /// Predicted value.
    pub yhat: f64,
    /// UTC calendar date of the run that produced this record.
    pub generation_date: NaiveDate,
}

impl ForecastRecord {
    /// Stamp a projected point with its owner and run date.
    #[must_use]
    pub fn from_point(user_id: &UserId, generation_date: NaiveDate, point: ProjectedPoint) -> Self {
        Self {
            user_id: user_id.clone(),
            ds: point.ds,
            yhat: point.yhat,
            generation_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serialises_with_collection_field_names() {
        let ds = NaiveDate::from_ymd_opt(2026, 4, 2)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("valid timestamp");
        let generation_date = NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid date");
        let user = UserId::new("u-9").expect("valid id");

        let record = ForecastRecord::from_point(&user, generation_date, ProjectedPoint { ds, yhat: 180.5 });
        let value = serde_json::to_value(&record).expect("serialise");

        assert_eq!(value["userId"], "u-9");
        assert_eq!(value["ds"], "2026-04-02T09:00:00");
        assert_eq!(value["yhat"], 180.5);
        assert_eq!(value["generationDate"], "2026-04-01");
    }
}
