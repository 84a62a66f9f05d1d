//! Raw measurement documents read from the historical store.

use serde::{Deserialize, Serialize};

/// One observed data point for a user, as stored.
///
/// `date` keeps the stored text untouched; coercion into a canonical
/// timestamp is the job of [`crate::domain::prepare_series`]. Documents
/// without a `userId` never become a `MeasurementRecord`: adapters quarantine
/// them at the store boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    /// Owner of the measurement, compared verbatim against the route id.
    pub user_id: String,
    /// Observation timestamp as stored; may be missing or malformed.
    #[serde(default)]
    pub date: Option<String>,
    /// Remaining range in miles.
    #[serde(default, rename = "current_miles")]
    pub current_miles: Option<f64>,
}

impl MeasurementRecord {
    /// Convenience constructor used by adapters and fixtures.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        date: Option<String>,
        current_miles: Option<f64>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            current_miles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialises_document_shape() {
        let record: MeasurementRecord = serde_json::from_str(
            r#"{"userId":"u1","date":"2026-03-01T08:00:00Z","current_miles":212.5}"#,
        )
        .expect("valid document");
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.date.as_deref(), Some("2026-03-01T08:00:00Z"));
        assert_eq!(record.current_miles, Some(212.5));
    }

    #[test]
    fn missing_optional_fields_default_to_none() {
        let record: MeasurementRecord =
            serde_json::from_str(r#"{"userId":"u1"}"#).expect("valid document");
        assert!(record.date.is_none());
        assert!(record.current_miles.is_none());
    }

    #[test]
    fn missing_user_id_is_rejected() {
        let parsed: Result<MeasurementRecord, _> =
            serde_json::from_str(r#"{"date":"2026-03-01","current_miles":1.0}"#);
        assert!(parsed.is_err());
    }
}
