//! Orchestrator Migrate
//!
//! Component entrypoint: loads configuration, migrates orchestrations and
//! maps the outcome to the process exit code (0 success, 1 user error,
//! 2 application error).

use anyhow::Context;
use orchestrator_migrate::config::Config;
use orchestrator_migrate::error::{MigrationError, APPLICATION_ERROR_EXIT_CODE};
use orchestrator_migrate::migration::MigrationReport;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

async fn run_component() -> anyhow::Result<MigrationReport> {
    let config = Config::from_env()
        .map_err(MigrationError::from)
        .context("Failed to load configuration")?;
    info!("Configuration loaded: {:?}", config);

    let report = orchestrator_migrate::app::run(&config).await?;
    Ok(report)
}

fn log_report(report: &MigrationReport) {
    for dangling in &report.dangling {
        warn!(
            orchestration_id = %dangling.orchestration_id,
            task_index = dangling.task_index,
            source_reference = %dangling.source_reference,
            "Task still references an orchestration outside the migrated set"
        );
    }
    info!(
        migrated = report.migrated.len(),
        patched = report.patched,
        references_rewritten = report.references_rewritten,
        dangling = report.dangling.len(),
        "Migration finished"
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    match run_component().await {
        Ok(report) => {
            log_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let exit_code = e
                .downcast_ref::<MigrationError>()
                .map(MigrationError::exit_code)
                .unwrap_or(APPLICATION_ERROR_EXIT_CODE);
            error!("{:#}", e);
            ExitCode::from(exit_code)
        }
    }
}
