//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `serve`: run the HTTP server, or only apply migrations
//! - `admin`: inspect, restore and purge individual songs

mod admin;
mod serve;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::config::{PostgresConfig, ServerConfig};

pub use admin::{cmd_purge, cmd_restore, cmd_show};
pub use serve::{cmd_migrate, cmd_serve};

/// Song Library service
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub database: PostgresConfig,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Show a song, including soft-deleted ones
    Show {
        /// Song ID
        id: String,
    },
    /// Restore a soft-deleted song
    Restore {
        /// Song ID
        id: String,
    },
    /// Permanently delete a song
    Purge {
        /// Song ID
        id: String,
    },
}

/// Run the specified CLI command; no command means `serve`.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        None | Some(Commands::Serve) => cmd_serve(&rt, &cli.server, &cli.database),
        Some(Commands::Migrate) => cmd_migrate(&rt, &cli.database),
        Some(Commands::Show { id }) => cmd_show(&rt, &cli.server, &cli.database, id),
        Some(Commands::Restore { id }) => cmd_restore(&rt, &cli.server, &cli.database, id),
        Some(Commands::Purge { id }) => cmd_purge(&rt, &cli.server, &cli.database, id),
    }
}
