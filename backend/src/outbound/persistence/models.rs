//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{battery_readings, range_forecasts};

/// Row struct for reading from the battery_readings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = battery_readings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MeasurementRow {
    pub user_id: Option<String>,
    pub recorded_at: Option<String>,
    pub current_miles: Option<f64>,
}

/// Insertable struct for appending forecast rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = range_forecasts)]
pub(crate) struct NewForecastRow<'a> {
    pub id: Uuid,
    pub user_id: &'a str,
    pub ds: NaiveDateTime,
    pub yhat: f64,
    pub generation_date: NaiveDate,
}
