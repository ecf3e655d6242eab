//! CLI module for yelpcamp
//!
//! Provides command-line interface for:
//! - start: Open the store and serve the HTTP API
//! - check: Consistency report (and repair) over the stored data

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, check_store, run, run_command, start, CheckOutput};
pub use config::{Config, StorageConfig};
pub use errors::{CliError, CliErrorCode, CliResult};
