//! Async connection pool for the forecast and measurement tables.
//!
//! A `bb8` pool of `diesel-async` connections with fixed sizing: the service
//! has two tables and one request path, so nothing here is tunable. A
//! checkout that cannot complete within [`CHECKOUT_TIMEOUT`] surfaces as
//! [`PoolError::Checkout`], which the repositories report as their
//! `Connection` port error (503 at the HTTP edge).

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::debug;

/// Upper bound on open connections.
pub const MAX_CONNECTIONS: u32 = 10;

/// Connections kept warm between requests.
pub const MIN_IDLE_CONNECTIONS: u32 = 2;

/// How long a request waits for a free connection.
pub const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool construction or checkout failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection became available in time.
    #[error("failed to get connection from pool: {message}")]
    Checkout {
        /// Underlying error message.
        message: String,
    },

    /// The initial connections could not be opened.
    #[error("failed to build connection pool: {message}")]
    Build {
        /// Underlying error message.
        message: String,
    },
}

impl PoolError {
    /// The underlying driver message, whichever stage failed.
    #[must_use]
    pub fn into_message(self) -> String {
        match self {
            Self::Checkout { message } | Self::Build { message } => message,
        }
    }
}

/// Shared PostgreSQL pool handed to both Diesel repositories.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open the pool against `database_url`, waiting for the idle
    /// connections to come up.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] if the database is unreachable.
    pub async fn connect(database_url: &str) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let inner = Pool::builder()
            .max_size(MAX_CONNECTIONS)
            .min_idle(Some(MIN_IDLE_CONNECTIONS))
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build(manager)
            .await
            .map_err(|err| PoolError::Build {
                message: err.to_string(),
            })?;
        debug!(max = MAX_CONNECTIONS, idle = MIN_IDLE_CONNECTIONS, "database pool ready");
        Ok(Self { inner })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] if no connection frees up within
    /// [`CHECKOUT_TIMEOUT`].
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner.get().await.map_err(|err| PoolError::Checkout {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::checkout(
        PoolError::Checkout { message: "timed out waiting for connection".to_owned() },
        "failed to get connection from pool: timed out waiting for connection"
    )]
    #[case::build(
        PoolError::Build { message: "invalid DATABASE_URL".to_owned() },
        "failed to build connection pool: invalid DATABASE_URL"
    )]
    fn errors_name_the_failed_stage(#[case] error: PoolError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn message_strips_the_stage_prefix() {
        let error = PoolError::Checkout {
            message: "connection refused".to_owned(),
        };
        assert_eq!(error.into_message(), "connection refused");
    }
}
