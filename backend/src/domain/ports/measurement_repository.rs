//! Driven port for the historical measurement collection.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::MeasurementRecord;

use super::define_port_error;

define_port_error! {
    /// Errors raised by measurement store adapters.
    pub enum MeasurementRepositoryError {
        /// Store connection could not be established.
        Connection { message } => "measurement store connection failed: {message}",
        /// Query failed during execution.
        Query { message } => "measurement store query failed: {message}",
    }
}

/// Read access to the `battery_readings` collection.
///
/// Adapters return the whole collection; selecting one user's records is the
/// job of [`crate::domain::prepare_series`]. Documents without a `userId`
/// are skipped by the adapter and never reach the domain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Load every measurement document.
    async fn load_all(&self) -> Result<Arc<Vec<MeasurementRecord>>, MeasurementRepositoryError>;
}

/// Fixture implementation holding a fixed set of records.
#[derive(Debug, Default, Clone)]
pub struct FixtureMeasurementRepository {
    records: Arc<Vec<MeasurementRecord>>,
}

impl FixtureMeasurementRepository {
    /// Serve `records` from every load.
    #[must_use]
    pub fn new(records: Vec<MeasurementRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }
}

#[async_trait]
impl MeasurementRepository for FixtureMeasurementRepository {
    async fn load_all(&self) -> Result<Arc<Vec<MeasurementRecord>>, MeasurementRepositoryError> {
        Ok(Arc::clone(&self.records))
    }
}
