//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod forecast_command;
mod forecast_engine;
mod forecast_metrics;
mod forecast_repository;
mod measurement_repository;

#[cfg(test)]
pub use forecast_command::MockForecastCommand;
pub use forecast_command::{ForecastCommand, ForecastOutcome};
#[cfg(test)]
pub use forecast_engine::MockForecastEngine;
pub use forecast_engine::{FixtureForecastEngine, ForecastEngine, ForecastEngineError};
pub use forecast_metrics::{
    ForecastDecision, ForecastMetrics, ForecastMetricsError, NoOpForecastMetrics,
};
#[cfg(test)]
pub use forecast_repository::MockForecastRepository;
pub use forecast_repository::{
    FixtureForecastRepository, ForecastRepository, ForecastRepositoryError, PriorGeneration,
};
#[cfg(test)]
pub use measurement_repository::MockMeasurementRepository;
pub use measurement_repository::{
    FixtureMeasurementRepository, MeasurementRepository, MeasurementRepositoryError,
};
