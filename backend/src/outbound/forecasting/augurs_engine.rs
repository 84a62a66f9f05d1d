//! `ForecastEngine` backed by `augurs` (MSTL + AutoETS).
//!
//! Observations are resampled into daily buckets (mean per UTC day) anchored
//! on the last observation's time of day; empty days are filled by linear
//! interpolation. With at least [`MIN_SEASONAL_BUCKETS`] days the model is
//! MSTL with weekly seasonality and an AutoETS trend, from
//! [`MIN_ETS_BUCKETS`] days a non-seasonal AutoETS. Shorter spans, such as
//! several readings a day over a few days, are projected by drift between
//! the first and last daily means. Predictions are clamped at zero miles.

use std::iter::successors;

use augurs::ets::AutoETS;
use augurs::forecaster::transforms::LinearInterpolator;
use augurs::forecaster::{Forecaster, Transformer};
use augurs::mstl::MSTLModel;
use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;

use crate::domain::ports::{ForecastEngine, ForecastEngineError};
use crate::domain::{ProjectedPoint, ProjectedSeries, TrainingPoint, TrainingSeries};

/// Daily buckets needed before weekly seasonality is modelled.
pub const MIN_SEASONAL_BUCKETS: usize = 14;

/// Daily buckets `AutoETS` needs to fit; shorter spans use drift.
pub const MIN_ETS_BUCKETS: usize = 7;

const WEEKLY_PERIOD: usize = 7;

/// Production forecast engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct AugursForecastEngine;

impl AugursForecastEngine {
    /// Create the engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Model family chosen for a bucketed series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Model {
    Seasonal,
    Ets,
    Drift,
}

impl Model {
    const fn for_buckets(buckets: usize) -> Self {
        if buckets >= MIN_SEASONAL_BUCKETS {
            Self::Seasonal
        } else if buckets >= MIN_ETS_BUCKETS {
            Self::Ets
        } else {
            Self::Drift
        }
    }
}

/// Daily means from the first to the last observed day; `NaN` marks gaps.
#[expect(
    clippy::float_arithmetic,
    reason = "daily means are float sums divided by their counts"
)]
pub(crate) fn daily_buckets(points: &[TrainingPoint]) -> Result<Vec<f64>, ForecastEngineError> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err(ForecastEngineError::fit("empty training series"));
    };
    let span = last
        .at
        .date()
        .signed_duration_since(first.at.date())
        .num_days();
    let len = usize::try_from(span)
        .map(|days| days + 1)
        .map_err(|_| ForecastEngineError::fit("training series is not ascending"))?;

    let mut sums = vec![0.0_f64; len];
    let mut counts = vec![0_u32; len];
    for point in points {
        let offset = point
            .at
            .date()
            .signed_duration_since(first.at.date())
            .num_days();
        let index = usize::try_from(offset)
            .map_err(|_| ForecastEngineError::fit("training series is not ascending"))?;
        if let (Some(sum), Some(count)) = (sums.get_mut(index), counts.get_mut(index)) {
            *sum += point.value;
            *count += 1;
        }
    }
    Ok(sums
        .into_iter()
        .zip(counts)
        .map(|(sum, count)| {
            if count == 0 {
                f64::NAN
            } else {
                sum / f64::from(count)
            }
        })
        .collect())
}

fn interpolator() -> Vec<Box<dyn Transformer>> {
    vec![Box::new(LinearInterpolator::default())]
}

struct Fitted {
    in_sample: Option<Vec<f64>>,
    horizon: Vec<f64>,
}

fn fit_and_predict(values: &[f64], horizon: usize) -> Result<Fitted, ForecastEngineError> {
    match Model::for_buckets(values.len()) {
        Model::Seasonal => {
            let trend = AutoETS::non_seasonal().into_trend_model();
            let mut forecaster = Forecaster::new(MSTLModel::new(vec![WEEKLY_PERIOD], trend))
                .with_transformers(interpolator());
            forecaster
                .fit(values)
                .map_err(|err| ForecastEngineError::fit(format!("MSTL: {err}")))?;
            let future = forecaster
                .predict(horizon, None)
                .map_err(|err| ForecastEngineError::predict(format!("MSTL: {err}")))?;
            let in_sample = forecaster.predict_in_sample(None).ok().map(|f| f.point);
            Ok(Fitted {
                in_sample,
                horizon: future.point,
            })
        }
        Model::Ets => {
            let mut forecaster =
                Forecaster::new(AutoETS::non_seasonal()).with_transformers(interpolator());
            forecaster
                .fit(values)
                .map_err(|err| ForecastEngineError::fit(format!("ETS: {err}")))?;
            let future = forecaster
                .predict(horizon, None)
                .map_err(|err| ForecastEngineError::predict(format!("ETS: {err}")))?;
            let in_sample = forecaster.predict_in_sample(None).ok().map(|f| f.point);
            Ok(Fitted {
                in_sample,
                horizon: future.point,
            })
        }
        Model::Drift => drift(values, horizon),
    }
}

/// Straight line through the first and last daily means, extended past the
/// last day. A single-day span projects flat.
#[expect(
    clippy::float_arithmetic,
    reason = "drift is the mean daily change between two observed means"
)]
fn drift(values: &[f64], horizon: usize) -> Result<Fitted, ForecastEngineError> {
    let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
        return Err(ForecastEngineError::fit("drift: empty training series"));
    };
    let steps = u32::try_from(values.len().saturating_sub(1))
        .map_err(|_| ForecastEngineError::fit("drift: span too long"))?;
    let slope = if steps == 0 {
        0.0
    } else {
        (last - first) / f64::from(steps)
    };
    let in_sample = successors(Some(first), |value| Some(value + slope))
        .take(values.len())
        .collect();
    let future = successors(Some(last + slope), |value| Some(value + slope))
        .take(horizon)
        .collect();
    Ok(Fitted {
        in_sample: Some(in_sample),
        horizon: future,
    })
}

fn shift_days(anchor: NaiveDateTime, days: i64) -> Result<NaiveDateTime, ForecastEngineError> {
    anchor
        .checked_add_signed(TimeDelta::days(days))
        .ok_or_else(|| ForecastEngineError::predict("timestamp out of range"))
}

impl ForecastEngine for AugursForecastEngine {
    fn project(
        &self,
        series: &TrainingSeries,
        horizon_days: u32,
    ) -> Result<ProjectedSeries, ForecastEngineError> {
        let Some(last) = series.last() else {
            return Err(ForecastEngineError::fit("empty training series"));
        };
        let horizon = usize::try_from(horizon_days)
            .map_err(|_| ForecastEngineError::predict("horizon does not fit in memory"))?;
        let values = daily_buckets(series.points())?;
        let fitted = fit_and_predict(&values, horizon)?;

        let mut points = Vec::with_capacity(values.len() + horizon);
        if let Some(in_sample) = fitted.in_sample {
            let n = i64::try_from(in_sample.len())
                .map_err(|_| ForecastEngineError::predict("in-sample span too long"))?;
            for (yhat, back) in in_sample.into_iter().zip((0..n).rev()) {
                points.push(ProjectedPoint {
                    ds: shift_days(last.at, -back)?,
                    yhat: yhat.max(0.0),
                });
            }
        } else {
            debug!("in-sample fit unavailable; projecting horizon only");
        }
        for (yhat, ahead) in fitted.horizon.into_iter().zip(1_i64..) {
            points.push(ProjectedPoint {
                ds: shift_days(last.at, ahead)?,
                yhat: yhat.max(0.0),
            });
        }
        debug!(
            buckets = values.len(),
            model = ?Model::for_buckets(values.len()),
            projected = points.len(),
            "forecast projected"
        );
        Ok(ProjectedSeries::new(points))
    }
}
