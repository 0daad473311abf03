//! Orchestrator endpoint discovery
//!
//! Each project may live in a different region, so the orchestrator API URL
//! is looked up in the project's Storage API index instead of being configured.

use crate::client::StorageApiClient;
use crate::constants::ORCHESTRATOR_COMPONENT_ID;
use crate::error::MigrationError;

/// Resolve the orchestrator API URL for the project owning `token`
///
/// # Arguments
/// * `http` - Shared HTTP client
/// * `token` - Storage API token of the project
/// * `base_url` - Storage API base URL of the project
///
/// # Returns
/// * `Ok(String)` - URI advertised for the `"orchestrator"` service
/// * `Err(MigrationError::ServiceNotFound)` - The index has no orchestrator;
///   the region comes from token verification so the message is actionable
/// * `Err(MigrationError::Transport)` - Any Storage API call failed
pub async fn resolve_service_url(
    http: &reqwest::Client,
    token: &str,
    base_url: &str,
) -> Result<String, MigrationError> {
    let storage = StorageApiClient::new(http.clone(), base_url, token)?;

    let index = storage.index_action().await?;
    if let Some(component) = index.find_component(ORCHESTRATOR_COMPONENT_ID) {
        tracing::debug!(uri = %component.uri, "Found orchestrator service");
        return Ok(component.uri.clone());
    }

    let token_info = storage.verify_token().await?;
    Err(MigrationError::ServiceNotFound {
        region: token_info.owner.region,
    })
}
