//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Key columns
//! are nullable: both tables stand in for schemaless collections, and the
//! adapters decide what to do with incomplete rows.

diesel::table! {
    /// Raw range measurements written by the ingestion process.
    battery_readings (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owner of the measurement (`userId` in the document shape).
        user_id -> Nullable<Text>,
        /// Observation timestamp exactly as ingested.
        recorded_at -> Nullable<Text>,
        /// Remaining range in miles.
        current_miles -> Nullable<Float8>,
    }
}

diesel::table! {
    /// Forecast rows appended by each run.
    range_forecasts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owner of the forecast.
        user_id -> Nullable<Text>,
        /// Predicted timestamp (UTC, timezone-naive).
        ds -> Nullable<Timestamp>,
        /// Predicted value.
        yhat -> Nullable<Float8>,
        /// UTC calendar date of the run.
        generation_date -> Nullable<Date>,
        /// Row insertion timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(battery_readings, range_forecasts);
