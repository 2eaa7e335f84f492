//! Song Library - a CRUD service for a catalogue of songs.
//!
//! Exposes create, read, filtered listing, partial update and soft delete
//! of songs over HTTP with JSON payloads, backed by PostgreSQL. Operator
//! commands (restore, permanent delete) are available on the CLI.

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod model;
pub mod service;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    // Settings may live in a local .env; real environment variables win
    let _ = dotenvy::dotenv();

    let args = cli::Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("song_library=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    cli::run_command(&args)
}
