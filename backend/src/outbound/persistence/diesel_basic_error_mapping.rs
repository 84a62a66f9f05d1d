//! Shared Diesel error mapping for the forecast and measurement adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Whether PostgreSQL rejected the statement because a relation is missing.
pub(crate) fn is_undefined_table(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::Unknown, info)
            if info.message().starts_with("relation") && info.message().ends_with("does not exist")
    )
}

/// Map common Diesel error variants into query/connection constructors.
pub(crate) fn map_basic_diesel_error<E, Q, C>(
    error: &DieselError,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(&'static str),
    }

    #[test]
    fn not_found_is_a_query_error() {
        let mapped = map_basic_diesel_error(&DieselError::NotFound, Mapped::Query, Mapped::Connection);
        assert_eq!(mapped, Mapped::Query("record not found"));
    }

    #[test]
    fn closed_connection_is_a_connection_error() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );
        let mapped = map_basic_diesel_error(&error, Mapped::Query, Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("database connection error"));
    }

    #[test]
    fn undefined_relation_is_detected() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new(r#"relation "range_forecasts" does not exist"#.to_owned()),
        );
        assert!(is_undefined_table(&error));
        assert!(!is_undefined_table(&DieselError::NotFound));
    }

    #[test]
    fn pool_errors_keep_their_message() {
        let mapped: String =
            map_basic_pool_error(PoolError::Checkout { message: "timed out".to_owned() }, |m| m);
        assert_eq!(mapped, "timed out");
    }
}
