//! Idempotency guard deciding whether a forecast run is needed.
//!
//! The guard consults the forecast store first with a live query keyed by
//! (user, generation date). Only when no run exists for today does it read
//! history, so a repeated request never touches the measurement store.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::domain::ports::{
    ForecastRepository, ForecastRepositoryError, MeasurementRepository,
    MeasurementRepositoryError, PriorGeneration,
};
use crate::domain::{MIN_HISTORY_POINTS, PreparedSeries, UserId, prepare_series};

/// Outcome of the guard.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// No run today and enough history; carries the prepared series.
    NeedsForecast(PreparedSeries),
    /// A run already exists for the user on `generation_date`.
    AlreadyProcessed {
        /// Date of the existing run.
        generation_date: NaiveDate,
    },
    /// Fewer usable points than the model requires.
    InsufficientData {
        /// Usable points present.
        available: usize,
        /// Points the model requires.
        required: usize,
    },
    /// The forecast store holds records without `field`.
    MalformedStoreState {
        /// Name of the missing field.
        field: String,
    },
}

impl GuardDecision {
    /// Short name used in log events.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NeedsForecast(_) => "needs_forecast",
            Self::AlreadyProcessed { .. } => "already_processed",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::MalformedStoreState { .. } => "malformed_store_state",
        }
    }
}

/// Store faults the guard cannot resolve into a decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// The forecast store lookup failed.
    #[error(transparent)]
    Forecasts(#[from] ForecastRepositoryError),
    /// The history read failed.
    #[error(transparent)]
    History(#[from] MeasurementRepositoryError),
}

/// Decides between computing, skipping and rejecting a forecast request.
pub struct ForecastGuard<F, M> {
    forecasts: Arc<F>,
    measurements: Arc<M>,
}

impl<F, M> Clone for ForecastGuard<F, M> {
    fn clone(&self) -> Self {
        Self {
            forecasts: Arc::clone(&self.forecasts),
            measurements: Arc::clone(&self.measurements),
        }
    }
}

impl<F, M> ForecastGuard<F, M>
where
    F: ForecastRepository,
    M: MeasurementRepository,
{
    /// Create a guard over the two stores.
    #[must_use]
    pub const fn new(forecasts: Arc<F>, measurements: Arc<M>) -> Self {
        Self {
            forecasts,
            measurements,
        }
    }

    /// Evaluate a request for `user_id` on the UTC calendar day `today`.
    ///
    /// # Errors
    /// Returns [`GuardError`] when either store fails for reasons other than
    /// a missing collection or a missing key field.
    pub async fn evaluate(
        &self,
        user_id: &UserId,
        today: NaiveDate,
    ) -> Result<GuardDecision, GuardError> {
        match self.forecasts.generation_for(user_id, today).await {
            Ok(PriorGeneration::Present) => {
                return Ok(GuardDecision::AlreadyProcessed {
                    generation_date: today,
                });
            }
            Ok(PriorGeneration::Absent) => {}
            Err(ForecastRepositoryError::MissingCollection { message }) => {
                debug!(%message, "forecast collection missing; treating as empty");
            }
            Err(ForecastRepositoryError::MissingField { field }) => {
                return Ok(GuardDecision::MalformedStoreState { field });
            }
            Err(err) => return Err(err.into()),
        }

        let records = self.measurements.load_all().await?;
        let series = prepare_series(&records, user_id);
        let available = series.usable_len();
        if available < MIN_HISTORY_POINTS {
            return Ok(GuardDecision::InsufficientData {
                available,
                required: MIN_HISTORY_POINTS,
            });
        }
        Ok(GuardDecision::NeedsForecast(series))
    }
}
