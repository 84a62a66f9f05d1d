//! PostgreSQL-backed `MeasurementRepository` implementation using Diesel ORM.
//!
//! Rows without a `user_id` are quarantined here: they are counted, logged
//! and never handed to the domain.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::MeasurementRecord;
use crate::domain::ports::{MeasurementRepository, MeasurementRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::MeasurementRow;
use super::pool::{DbPool, PoolError};
use super::schema::battery_readings;

/// Diesel-backed implementation of the `MeasurementRepository` port.
#[derive(Clone)]
pub struct DieselMeasurementRepository {
    pool: DbPool,
}

impl DieselMeasurementRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MeasurementRepositoryError {
    map_basic_pool_error(error, MeasurementRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> MeasurementRepositoryError {
    map_basic_diesel_error(
        &error,
        MeasurementRepositoryError::query,
        MeasurementRepositoryError::connection,
    )
}

/// Split rows into domain records, counting those without an owner.
pub(crate) fn quarantine_rows(rows: Vec<MeasurementRow>) -> (Vec<MeasurementRecord>, usize) {
    let mut quarantined = 0;
    let records = rows
        .into_iter()
        .filter_map(|row| match row.user_id {
            Some(user_id) => Some(MeasurementRecord::new(
                user_id,
                row.recorded_at,
                row.current_miles,
            )),
            None => {
                quarantined += 1;
                None
            }
        })
        .collect();
    (records, quarantined)
}

#[async_trait]
impl MeasurementRepository for DieselMeasurementRepository {
    async fn load_all(&self) -> Result<Arc<Vec<MeasurementRecord>>, MeasurementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MeasurementRow> = battery_readings::table
            .select(MeasurementRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let (records, quarantined) = quarantine_rows(rows);
        if quarantined > 0 {
            warn!(quarantined, "skipped measurement rows without user_id");
        }
        Ok(Arc::new(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user_id: Option<&str>) -> MeasurementRow {
        MeasurementRow {
            user_id: user_id.map(str::to_owned),
            recorded_at: Some("2026-03-01".to_owned()),
            current_miles: Some(120.0),
        }
    }

    #[test]
    fn ownerless_rows_are_quarantined() {
        let (records, quarantined) = quarantine_rows(vec![row(Some("a")), row(None), row(Some("b"))]);

        assert_eq!(quarantined, 1);
        let owners: Vec<_> = records.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(owners, vec!["a", "b"]);
    }
}
