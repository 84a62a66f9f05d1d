//! Driven port for the forecast collection.
//!
//! The guard asks one question of this store (was a run already recorded
//! for this user today?) and the persistence policy appends batches to it.
//! Both go to the live store; nothing here is cached.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{ForecastRecord, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by forecast store adapters.
    pub enum ForecastRepositoryError {
        /// Store connection could not be established.
        Connection { message } => "forecast store connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message } => "forecast store query failed: {message}",
        /// Stored forecasts lack a key field the guard relies on.
        MissingField { field } => "forecast store holds records without `{field}`",
        /// The collection does not exist yet.
        MissingCollection { message } => "forecast collection is missing: {message}",
    }
}

/// Result of looking up a prior run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorGeneration {
    /// No forecast exists for the user and date.
    Absent,
    /// At least one forecast exists for the user and date.
    Present,
}

/// Port over the `range_forecasts` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForecastRepository: Send + Sync {
    /// Look up whether any forecast exists for `user_id` generated on
    /// `generation_date`.
    ///
    /// Adapters report [`ForecastRepositoryError::MissingField`] when the
    /// collection contains records without a `userId`, because ownership of
    /// those records cannot be decided.
    async fn generation_for(
        &self,
        user_id: &UserId,
        generation_date: NaiveDate,
    ) -> Result<PriorGeneration, ForecastRepositoryError>;

    /// Append `records` as one batch and return the number written.
    async fn insert_batch(
        &self,
        records: &[ForecastRecord],
    ) -> Result<usize, ForecastRepositoryError>;
}

/// Fixture implementation that never finds a prior run and discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureForecastRepository;

#[async_trait]
impl ForecastRepository for FixtureForecastRepository {
    async fn generation_for(
        &self,
        _user_id: &UserId,
        _generation_date: NaiveDate,
    ) -> Result<PriorGeneration, ForecastRepositoryError> {
        Ok(PriorGeneration::Absent)
    }

    async fn insert_batch(
        &self,
        records: &[ForecastRecord],
    ) -> Result<usize, ForecastRepositoryError> {
        Ok(records.len())
    }
}
