//! CLI argument definitions using clap
//!
//! Commands:
//! - yelpcamp start --config <path>
//! - yelpcamp check --config <path> [--repair]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// YelpCamp - campgrounds and their reviews over a JSON API
#[derive(Parser, Debug)]
#[command(name = "yelpcamp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Open the store and serve the HTTP API until Ctrl-C
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./yelpcamp.json")]
        config: PathBuf,
    },

    /// Report dangling review references and orphan reviews
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./yelpcamp.json")]
        config: PathBuf,

        /// Pull dangling ids, delete orphans, and persist the result
        #[arg(long)]
        repair: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
