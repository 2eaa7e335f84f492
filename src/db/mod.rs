//! Database module for song persistence.
//!
//! Uses SQLx with PostgreSQL. Provides:
//! - Pool construction and schema migrations
//! - The [`SongStorage`] abstraction and its Postgres implementation
//! - [`StoreError`], the error kinds every storage call can report
//!
//! # Example
//!
//! ```ignore
//! use song_library::db::{init_db, run_migrations, PgSongStorage};
//!
//! let pool = init_db(&config.database).await?;
//! run_migrations(&pool, &config.database.migration_source).await?;
//! let storage = PgSongStorage::new(pool);
//! ```

mod songs;
mod traits;

use std::path::PathBuf;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::PostgresConfig;

pub use songs::PgSongStorage;
pub use traits::SongStorage;
#[cfg(test)]
pub use traits::mocks;

/// Errors reported by song storage operations.
///
/// Absent rows on reads are not errors (reads return `Option`); on
/// mutations they are reported with the precondition that failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Update called without an identifier
    #[error("ID is required")]
    MissingId,

    /// No row with the identifier
    #[error("song not found")]
    NotFound,

    /// No live row with the identifier
    #[error("song not found or already deleted")]
    NotFoundOrDeleted,

    /// No soft-deleted row with the identifier
    #[error("song not found or not deleted")]
    NotFoundOrNotDeleted,

    /// The call did not finish in time and was abandoned
    #[error("storage call timed out after {0:?}")]
    Timeout(Duration),

    /// Transport or query failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether the error describes the state of the catalogue rather than
    /// a failure of the store itself.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::MissingId | Self::NotFound | Self::NotFoundOrDeleted | Self::NotFoundOrNotDeleted
        )
    }
}

/// Open a connection pool and verify the database is reachable.
///
/// # Errors
///
/// Returns an error if the pool cannot establish its first connection.
pub async fn init_db(config: &PostgresConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(config.connect_options())
        .await?;

    tracing::info!(
        host = %config.host,
        database = %config.database,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}

/// Apply all pending migrations from `source`.
///
/// `source` is a directory path; a leading `file://` is accepted.
pub async fn run_migrations(pool: &PgPool, source: &str) -> Result<(), MigrateError> {
    let dir = PathBuf::from(source.strip_prefix("file://").unwrap_or(source));
    let migrator = Migrator::new(dir).await?;
    migrator.run(pool).await?;

    tracing::info!(
        known = migrator.iter().count(),
        "Database schema is up to date"
    );
    Ok(())
}
