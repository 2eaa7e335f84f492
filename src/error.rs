//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`StoreError`], [`ConfigError`], the HTTP layer's `ApiError`), while
//! `main` and the CLI use `anyhow` for convenient error propagation.
//! [`Error`] aggregates the failures that can stop the process.
//!
//! # Example
//!
//! ```ignore
//! use song_library::error::{Result, ResultExt};
//!
//! async fn start(config: &PostgresConfig) -> Result<PgPool> {
//!     let pool = init_db(config).await.with_context("connecting to PostgreSQL")?;
//!     Ok(pool)
//! }
//! ```

use crate::config::ConfigError;
use crate::db::StoreError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Socket or signal I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Storage operation error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(ctx))
    }
}
