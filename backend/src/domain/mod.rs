//! Domain primitives, policies and services.
//!
//! Purpose: hold the forecast pipeline independent of HTTP and storage.
//! Adapters reach the domain through [`ports`]; nothing in here knows about
//! actix or diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - UserId, MeasurementRecord, ForecastRecord: typed store shapes.
//! - prepare_series / normalize_timestamp: data preparation.
//! - ForecastGuard, PersistencePolicy, ForecastService: the pipeline.

pub mod error;
pub mod forecast;
pub mod forecast_guard;
pub mod forecast_service;
pub mod measurement;
pub mod persistence_policy;
pub mod ports;
pub mod preparation;
pub mod trace_id;
pub mod user_id;

pub use self::error::{Error, ErrorCode};
pub use self::forecast::{
    FORECAST_HORIZON_DAYS, ForecastRecord, MIN_HISTORY_POINTS, ProjectedPoint, ProjectedSeries,
};
pub use self::forecast_guard::{ForecastGuard, GuardDecision, GuardError};
pub use self::forecast_service::ForecastService;
pub use self::measurement::MeasurementRecord;
pub use self::persistence_policy::{PersistencePolicy, future_records};
pub use self::preparation::{
    PreparedSeries, SeriesPoint, TrainingPoint, TrainingSeries, TrainingSeriesError,
    normalize_timestamp, prepare_series,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user_id::{USER_ID_MAX_LEN, UserId, UserIdValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use range_forecast::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::invalid_request("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
