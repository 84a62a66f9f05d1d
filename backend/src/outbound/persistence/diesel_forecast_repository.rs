//! PostgreSQL-backed `ForecastRepository` implementation using Diesel ORM.
//!
//! Every call queries the live table. A missing table is reported as
//! [`ForecastRepositoryError::MissingCollection`] and ownerless rows as
//! [`ForecastRepositoryError::MissingField`]; the guard decides what either
//! means.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{ForecastRepository, ForecastRepositoryError, PriorGeneration};
use crate::domain::{ForecastRecord, UserId};

use super::diesel_basic_error_mapping::{
    is_undefined_table, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::NewForecastRow;
use super::pool::{DbPool, PoolError};
use super::schema::range_forecasts;

/// Diesel-backed implementation of the `ForecastRepository` port.
#[derive(Clone)]
pub struct DieselForecastRepository {
    pool: DbPool,
}

impl DieselForecastRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ForecastRepositoryError {
    map_basic_pool_error(error, ForecastRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ForecastRepositoryError {
    if is_undefined_table(&error) {
        return ForecastRepositoryError::missing_collection("range_forecasts");
    }
    map_basic_diesel_error(
        &error,
        ForecastRepositoryError::query,
        ForecastRepositoryError::connection,
    )
}

fn to_row(record: &ForecastRecord) -> NewForecastRow<'_> {
    NewForecastRow {
        id: Uuid::new_v4(),
        user_id: record.user_id.as_str(),
        ds: record.ds,
        yhat: record.yhat,
        generation_date: record.generation_date,
    }
}

#[async_trait]
impl ForecastRepository for DieselForecastRepository {
    async fn generation_for(
        &self,
        user_id: &UserId,
        generation_date: NaiveDate,
    ) -> Result<PriorGeneration, ForecastRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let has_ownerless: bool = diesel::select(exists(
            range_forecasts::table.filter(range_forecasts::user_id.is_null()),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if has_ownerless {
            warn!("range_forecasts holds rows without user_id");
            return Err(ForecastRepositoryError::missing_field("userId"));
        }

        let found: bool = diesel::select(exists(
            range_forecasts::table
                .filter(range_forecasts::user_id.eq(user_id.as_str()))
                .filter(range_forecasts::generation_date.eq(generation_date)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        debug!(user_id = %user_id, %generation_date, found, "prior generation lookup");
        Ok(if found {
            PriorGeneration::Present
        } else {
            PriorGeneration::Absent
        })
    }

    async fn insert_batch(
        &self,
        records: &[ForecastRecord],
    ) -> Result<usize, ForecastRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NewForecastRow<'_>> = records.iter().map(to_row).collect();

        diesel::insert_into(range_forecasts::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
