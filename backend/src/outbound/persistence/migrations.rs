//! Embedded schema migrations applied at startup.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The migration connection could not be established.
    #[error("failed to connect for migrations: {0}")]
    Connect(#[from] diesel::ConnectionError),
    /// A migration failed to apply.
    #[error("failed to apply migrations: {0}")]
    Apply(String),
}

/// Apply all pending migrations over a dedicated synchronous connection.
///
/// Blocking; call from `tokio::task::spawn_blocking` inside a runtime.
///
/// # Errors
/// Returns [`MigrationError`] when connecting or applying fails.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply(err.to_string()))?;
    info!(applied = applied.len(), "database migrations applied");
    Ok(())
}
