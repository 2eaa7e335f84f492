//! Command-line interface for song-library.
//!
//! This module provides the server entry point and operator commands that
//! reach catalogue operations not exposed over HTTP.

mod commands;

pub use commands::{Cli, Commands, run_command};
