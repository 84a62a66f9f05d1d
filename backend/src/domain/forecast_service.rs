//! Forecast request orchestration implementing [`ForecastCommand`].
//!
//! Flow per request: guard (live lookup, then history) -> training series ->
//! engine -> persistence policy. Nothing is retried; store and engine faults
//! become [`Error`] values with server error codes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::forecast_guard::{ForecastGuard, GuardDecision, GuardError};
use crate::domain::persistence_policy::PersistencePolicy;
use crate::domain::ports::{
    ForecastCommand, ForecastDecision, ForecastEngine, ForecastMetrics, ForecastOutcome,
    ForecastRepository, ForecastRepositoryError, MeasurementRepository,
    MeasurementRepositoryError, NoOpForecastMetrics,
};
use crate::domain::{Error, FORECAST_HORIZON_DAYS, PreparedSeries, UserId};

pub(crate) fn map_forecast_repository_error(error: ForecastRepositoryError) -> Error {
    match error {
        ForecastRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("forecast store unavailable: {message}"))
        }
        ForecastRepositoryError::MissingField { field } => Error::malformed_forecast_store(
            format!("existing forecast records are missing `{field}`"),
        )
        .with_details(json!({ "field": field })),
        other => Error::internal(format!("forecast store error: {other}")),
    }
}

pub(crate) fn map_measurement_repository_error(error: MeasurementRepositoryError) -> Error {
    match error {
        MeasurementRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("measurement store unavailable: {message}"))
        }
        MeasurementRepositoryError::Query { message } => {
            Error::internal(format!("measurement store error: {message}"))
        }
    }
}

fn map_guard_error(error: GuardError) -> Error {
    match error {
        GuardError::Forecasts(err) => map_forecast_repository_error(err),
        GuardError::History(err) => map_measurement_repository_error(err),
    }
}

/// Forecast service wiring the guard, engine and persistence policy.
pub struct ForecastService<F, M, E> {
    guard: ForecastGuard<F, M>,
    policy: PersistencePolicy<F>,
    engine: Arc<E>,
    clock: Arc<dyn Clock>,
    metrics: Arc<dyn ForecastMetrics>,
}

impl<F, M, E> ForecastService<F, M, E>
where
    F: ForecastRepository,
    M: MeasurementRepository,
    E: ForecastEngine,
{
    /// Create a service over the given stores, engine and clock.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use range_forecast::domain::ForecastService;
    /// use range_forecast::domain::ports::{
    ///     FixtureForecastEngine, FixtureForecastRepository, FixtureMeasurementRepository,
    /// };
    ///
    /// let _service = ForecastService::new(
    ///     Arc::new(FixtureForecastRepository),
    ///     Arc::new(FixtureMeasurementRepository::default()),
    ///     Arc::new(FixtureForecastEngine),
    ///     Arc::new(DefaultClock),
    /// );
    /// ```
    #[must_use]
    pub fn new(
        forecasts: Arc<F>,
        measurements: Arc<M>,
        engine: Arc<E>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            guard: ForecastGuard::new(Arc::clone(&forecasts), measurements),
            policy: PersistencePolicy::new(forecasts, Arc::clone(&clock)),
            engine,
            clock,
            metrics: Arc::new(NoOpForecastMetrics),
        }
    }

    /// Replace the metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn ForecastMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    async fn record_decision(&self, decision: ForecastDecision) {
        if let Err(err) = self.metrics.record_decision(decision).await {
            warn!(error = %err, "failed to record forecast decision");
        }
    }

    async fn run_forecast(
        &self,
        user_id: &UserId,
        generation_date: NaiveDate,
        series: &PreparedSeries,
    ) -> Result<ForecastOutcome, Error> {
        let training = series
            .training_series()
            .map_err(|err| Error::insufficient_history(err.to_string()))?;

        let projection = self
            .engine
            .project(&training, FORECAST_HORIZON_DAYS)
            .map_err(|err| {
                error!(user_id = %user_id, error = %err, "forecast engine failed");
                Error::internal(err.to_string())
            })?;

        let inserted = self
            .policy
            .persist(user_id, generation_date, &projection)
            .await
            .map_err(|err| {
                error!(user_id = %user_id, error = %err, "forecast write failed");
                map_forecast_repository_error(err)
            })?;

        info!(
            user_id = %user_id,
            inserted,
            projected = projection.len(),
            %generation_date,
            "forecast rows written"
        );
        self.record_decision(ForecastDecision::Submitted).await;
        if let Err(err) = self.metrics.record_rows_written(inserted).await {
            warn!(error = %err, "failed to record forecast row count");
        }
        Ok(ForecastOutcome::Submitted {
            inserted,
            generation_date,
        })
    }
}

#[async_trait]
impl<F, M, E> ForecastCommand for ForecastService<F, M, E>
where
    F: ForecastRepository,
    M: MeasurementRepository,
    E: ForecastEngine,
{
    async fn request_forecast(&self, user_id: &UserId) -> Result<ForecastOutcome, Error> {
        let today = self.clock.utc().date_naive();
        let decision = self
            .guard
            .evaluate(user_id, today)
            .await
            .map_err(|err| {
                error!(user_id = %user_id, error = %err, "idempotency guard failed");
                map_guard_error(err)
            })?;
        info!(user_id = %user_id, decision = decision.label(), %today, "idempotency guard decided");

        match decision {
            GuardDecision::AlreadyProcessed { generation_date } => {
                self.record_decision(ForecastDecision::AlreadyProcessed).await;
                Ok(ForecastOutcome::AlreadyProcessed { generation_date })
            }
            GuardDecision::InsufficientData {
                available,
                required,
            } => {
                self.record_decision(ForecastDecision::InsufficientData).await;
                Err(Error::insufficient_history(format!(
                    "insufficient data: need at least {required} measurements, found {available}"
                ))
                .with_details(json!({ "available": available, "required": required })))
            }
            GuardDecision::MalformedStoreState { field } => {
                self.record_decision(ForecastDecision::MalformedStore).await;
                Err(map_forecast_repository_error(
                    ForecastRepositoryError::MissingField { field },
                ))
            }
            GuardDecision::NeedsForecast(series) => {
                self.run_forecast(user_id, today, &series).await
            }
        }
    }
}

#[cfg(test)]
#[path = "forecast_service_tests.rs"]
mod tests;
