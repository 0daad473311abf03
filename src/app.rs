//! Top-level run
//!
//! Wires configuration, endpoint discovery and the two project clients
//! into one migration run.

use crate::client::{build_http_client, HttpOrchestrationStore};
use crate::config::{Config, ProjectConfig};
use crate::discovery::resolve_service_url;
use crate::error::MigrationError;
use crate::migration::{MigrationReport, Migrator};

/// Build the orchestrator client for one project
async fn connect(
    http: &reqwest::Client,
    project: &ProjectConfig,
) -> Result<HttpOrchestrationStore, MigrationError> {
    let url = resolve_service_url(http, &project.token, &project.url).await?;
    Ok(HttpOrchestrationStore::new(http.clone(), &url, &project.token)?)
}

/// Migrate all orchestrations of the source project into the destination project
pub async fn run(config: &Config) -> Result<MigrationReport, MigrationError> {
    let http = build_http_client(config.http.timeout_secs)?;

    tracing::info!("Detecting orchestrator API url for source project");
    let source = connect(&http, &config.source).await?;
    tracing::info!(url = %source.base_url(), "Source orchestrator API resolved");

    tracing::info!("Detecting orchestrator API url for destination project");
    let destination = connect(&http, &config.destination).await?;
    tracing::info!(url = %destination.base_url(), "Destination orchestrator API resolved");

    Migrator::new(&source, &destination).run().await
}
