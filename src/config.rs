//! Configuration from the environment.
//!
//! Every setting is read from an environment variable and can be
//! overridden by the matching command-line flag. A `.env` file in the
//! working directory is loaded first (see `main`), so local setups can
//! keep their settings there.
//!
//! | Variable | Default |
//! |---|---|
//! | `SERVER_ADDRESS` | `0.0.0.0:8080` |
//! | `REQUEST_TIMEOUT_SECS` | `10` |
//! | `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_DATABASE` | required |
//! | `POSTGRES_DISABLE_SSL` | `false` |
//! | `POSTGRES_MIGRATION_SOURCE` | `./migrations` |
//! | `POSTGRES_MAX_CONNECTIONS` | `10` |

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use clap::Args;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// HTTP server settings
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long = "address", env = "SERVER_ADDRESS", default_value = "0.0.0.0:8080")]
    pub address: String,

    /// Upper bound for a single storage call, in seconds
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Resolve the configured address to a socket address.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        self.address
            .to_socket_addrs()
            .map_err(|e| ConfigError::InvalidAddress(self.address.clone(), e))?
            .next()
            .ok_or_else(|| ConfigError::Unresolved(self.address.clone()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// PostgreSQL connection settings
#[derive(Clone, Args)]
pub struct PostgresConfig {
    /// Database host
    #[arg(long = "postgres-host", env = "POSTGRES_HOST")]
    pub host: String,

    /// Database port
    #[arg(long = "postgres-port", env = "POSTGRES_PORT")]
    pub port: u16,

    /// Database user
    #[arg(long = "postgres-user", env = "POSTGRES_USER")]
    pub user: String,

    /// Database password
    #[arg(long = "postgres-password", env = "POSTGRES_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Database name
    #[arg(long = "postgres-database", env = "POSTGRES_DATABASE")]
    pub database: String,

    /// Connect without TLS
    #[arg(long = "postgres-disable-ssl", env = "POSTGRES_DISABLE_SSL")]
    pub disable_ssl: bool,

    /// Directory holding the SQL migrations
    #[arg(
        long = "postgres-migration-source",
        env = "POSTGRES_MIGRATION_SOURCE",
        default_value = "./migrations"
    )]
    pub migration_source: String,

    /// Connection pool size
    #[arg(
        long = "postgres-max-connections",
        env = "POSTGRES_MAX_CONNECTIONS",
        default_value_t = 10
    )]
    pub max_connections: u32,
}

impl PostgresConfig {
    /// TLS mode derived from `disable_ssl`.
    pub fn ssl_mode(&self) -> PgSslMode {
        if self.disable_ssl {
            PgSslMode::Disable
        } else {
            PgSslMode::Require
        }
    }

    /// Connection options for the pool.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(self.ssl_mode())
            .application_name(env!("CARGO_PKG_NAME"))
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("disable_ssl", &self.disable_ssl)
            .field("migration_source", &self.migration_source)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server address {0}: {1}")]
    InvalidAddress(String, std::io::Error),

    #[error("Server address {0} did not resolve")]
    Unresolved(String),
}

// ============================================================================
// Tests
// ============================================================================
