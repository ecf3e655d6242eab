//! CLI command implementations
//!
//! Both commands follow the same lifecycle: load config, install logging,
//! open the store from its snapshot, do the work, close the store. Closing
//! writes the snapshot back.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::http_server::{AppState, HttpServer};
use crate::repository::{ConsistencyReport, IntegrityChecker, RepairSummary};
use crate::storage::{DocumentStore, MemoryStore};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Output of `yelpcamp check`
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub consistent: bool,
    pub report: ConsistencyReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair: Option<RepairSummary>,
}

/// Parse args and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Start { config } => start(&config),
        Command::Check { config, repair } => {
            let output = check(&config, repair)?;
            write_response(&output)
        }
    }
}

/// Serve the HTTP API until Ctrl-C, then close the store.
pub fn start(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    init_tracing(&config.log_filter);

    runtime()?.block_on(serve(config))
}

/// Run the consistency check, optionally repairing what it finds.
pub fn check(config_path: &Path, repair: bool) -> CliResult<CheckOutput> {
    let config = Config::load(config_path)?;
    init_tracing(&config.log_filter);

    runtime()?.block_on(check_store(&config, repair))
}

async fn serve(config: Config) -> CliResult<()> {
    let store = Arc::new(MemoryStore::open(&config.storage.snapshot_path)?);
    info!(snapshot = %config.storage.snapshot_path.display(), "store opened");

    let server = HttpServer::new(config.server.clone(), AppState::new(store.clone()));
    let served = server
        .start(shutdown_signal())
        .await
        .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)));

    // Persist whatever was written, even if serving failed
    store.close().await?;
    info!("store closed");
    served
}

/// Scan (and optionally repair) the store behind `config`.
pub async fn check_store(config: &Config, repair: bool) -> CliResult<CheckOutput> {
    let store = Arc::new(MemoryStore::open(&config.storage.snapshot_path)?);
    let checker = IntegrityChecker::new(store.clone());

    let report = checker.check().await?;
    let repair = if repair && !report.is_consistent() {
        Some(checker.repair(&report).await?)
    } else {
        None
    };

    store.close().await?;
    Ok(CheckOutput {
        consistent: report.is_consistent(),
        report,
        repair,
    })
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// filter. Logs go to stderr so stdout stays machine-readable.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // Already installed when a command runs twice in one process
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl-C; serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
