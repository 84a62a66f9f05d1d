//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool driven by
//! `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use range_forecast::outbound::persistence::{DbPool, DieselForecastRepository};
//!
//! let pool = DbPool::connect("postgres://localhost/forecasts").await?;
//! let repo = DieselForecastRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_forecast_repository;
mod diesel_measurement_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_forecast_repository::DieselForecastRepository;
pub use diesel_measurement_repository::DieselMeasurementRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{CHECKOUT_TIMEOUT, DbPool, MAX_CONNECTIONS, MIN_IDLE_CONNECTIONS, PoolError};
