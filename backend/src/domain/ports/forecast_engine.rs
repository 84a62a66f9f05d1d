//! Driven port for the statistical forecasting capability.
//!
//! The engine is opaque to the domain: it receives a clean ascending series
//! and returns projected points covering the fitted span followed by a
//! horizon of daily steps after the last observation. Fitting is CPU bound
//! and runs inline on the request.

use chrono::Duration;

use crate::domain::{ProjectedPoint, ProjectedSeries, TrainingSeries};

use super::define_port_error;

define_port_error! {
    /// Errors raised by forecast engine adapters.
    pub enum ForecastEngineError {
        /// Model fitting failed.
        Fit { message } => "forecast model fit failed: {message}",
        /// Prediction failed after a successful fit.
        Predict { message } => "forecast prediction failed: {message}",
    }
}

/// Fit-and-predict capability.
#[cfg_attr(test, mockall::automock)]
pub trait ForecastEngine: Send + Sync {
    /// Fit a model on `series` and project `horizon_days` calendar days past
    /// its last observation.
    fn project(
        &self,
        series: &TrainingSeries,
        horizon_days: u32,
    ) -> Result<ProjectedSeries, ForecastEngineError>;
}

/// Deterministic engine that echoes the history and carries the last value
/// forward one day at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureForecastEngine;

impl ForecastEngine for FixtureForecastEngine {
    fn project(
        &self,
        series: &TrainingSeries,
        horizon_days: u32,
    ) -> Result<ProjectedSeries, ForecastEngineError> {
        let Some(last) = series.last() else {
            return Err(ForecastEngineError::fit("empty training series"));
        };
        let fitted = series.points().iter().map(|point| ProjectedPoint {
            ds: point.at,
            yhat: point.value,
        });
        let future = (1..=horizon_days)
            .map(|day| {
                last.at
                    .checked_add_signed(Duration::days(i64::from(day)))
                    .map(|ds| ProjectedPoint {
                        ds,
                        yhat: last.value,
                    })
                    .ok_or_else(|| ForecastEngineError::predict("horizon overflows calendar"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ProjectedSeries::new(fitted.chain(future).collect()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::TrainingPoint;

    fn series(days: u32) -> TrainingSeries {
        let points = (1..=days)
            .map(|day| TrainingPoint {
                at: NaiveDate::from_ymd_opt(2026, 3, day)
                    .and_then(|d| d.and_hms_opt(7, 0, 0))
                    .expect("valid timestamp"),
                value: f64::from(day),
            })
            .collect();
        TrainingSeries::new(points).expect("long enough")
    }

    #[test]
    fn fixture_projects_history_plus_horizon() {
        let projected = FixtureForecastEngine
            .project(&series(10), 30)
            .expect("projection succeeds");

        assert_eq!(projected.len(), 40);
        let last = projected.points().last().expect("non-empty");
        let expected = NaiveDate::from_ymd_opt(2026, 4, 9)
            .and_then(|d| d.and_hms_opt(7, 0, 0))
            .expect("valid timestamp");
        assert_eq!(last.ds, expected);
        assert!((last.yhat - 10.0).abs() < f64::EPSILON);
    }
}
