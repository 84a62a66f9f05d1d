//! Driving port for forecast requests.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Error, UserId};

/// Successful result of a forecast request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastOutcome {
    /// A run already exists for the user today; nothing was computed.
    AlreadyProcessed {
        /// Date of the existing run.
        generation_date: NaiveDate,
    },
    /// A run was computed; `inserted` may be zero when no point lay in the
    /// future.
    Submitted {
        /// Number of forecast rows inserted.
        inserted: usize,
        /// Date of this run.
        generation_date: NaiveDate,
    },
}

/// Domain use-case port consumed by the HTTP adapter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForecastCommand: Send + Sync {
    /// Run the guard, engine and persistence pipeline for one user.
    ///
    /// Handled outcomes that are not successes (insufficient history,
    /// malformed store) are returned as [`Error`] with a client error code.
    async fn request_forecast(&self, user_id: &UserId) -> Result<ForecastOutcome, Error>;
}
