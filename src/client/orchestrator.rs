//! Orchestrator API client
//!
//! HTTP implementation of [`OrchestrationStore`] for one project, reached
//! at the URI discovered from the Storage API index.

use crate::client::{
    decode_response, ensure_success, normalize_base_url, token_header, TransportError,
};
use crate::constants::TOKEN_HEADER;
use crate::model::{
    CreatedOrchestration, NewOrchestration, Orchestration, OrchestrationId, OrchestrationPatch,
    OrchestrationSummary,
};
use crate::store::OrchestrationStore;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::RequestBuilder;
use std::fmt;

/// Orchestrator API client bound to one project token
#[derive(Clone)]
pub struct HttpOrchestrationStore {
    http: reqwest::Client,
    base_url: String,
    token: HeaderValue,
}

impl fmt::Debug for HttpOrchestrationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpOrchestrationStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpOrchestrationStore {
    /// Create a client for the orchestrator service at `base_url`
    ///
    /// # Errors
    /// * `TransportError::InvalidUrl` if `base_url` does not parse
    /// * `TransportError::InvalidToken` if `token` is not a valid header value
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        token: &str,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            token: token_header(token)?,
        })
    }

    /// Resolved base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/orchestrations", self.base_url)
    }

    fn item_url(&self, id: &OrchestrationId) -> String {
        format!("{}/orchestrations/{}", self.base_url, id)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(TOKEN_HEADER, self.token.clone())
    }
}

#[async_trait]
impl OrchestrationStore for HttpOrchestrationStore {
    async fn list(&self) -> Result<Vec<OrchestrationSummary>, TransportError> {
        let url = self.collection_url();
        tracing::debug!(url = %url, "Listing orchestrations");

        let response = self.authorized(self.http.get(&url)).send().await?;
        decode_response(response, "list orchestrations").await
    }

    async fn get(&self, id: &OrchestrationId) -> Result<Orchestration, TransportError> {
        let url = self.item_url(id);
        tracing::debug!(url = %url, "Loading orchestration");

        let response = self.authorized(self.http.get(&url)).send().await?;
        decode_response(response, "get orchestration").await
    }

    async fn create(
        &self,
        orchestration: &NewOrchestration,
    ) -> Result<OrchestrationId, TransportError> {
        let url = self.collection_url();
        tracing::debug!(
            url = %url,
            name = %orchestration.name,
            task_count = orchestration.tasks.len(),
            "Creating orchestration"
        );

        let response = self
            .authorized(self.http.post(&url))
            .json(orchestration)
            .send()
            .await?;
        let created: CreatedOrchestration =
            decode_response(response, "create orchestration").await?;
        Ok(created.id)
    }

    async fn update(
        &self,
        id: &OrchestrationId,
        patch: &OrchestrationPatch,
    ) -> Result<(), TransportError> {
        let url = self.item_url(id);
        tracing::debug!(
            url = %url,
            active = ?patch.active,
            replaces_tasks = patch.tasks.is_some(),
            "Updating orchestration"
        );

        let response = self
            .authorized(self.http.put(&url))
            .json(patch)
            .send()
            .await?;
        ensure_success(response, "update orchestration").await?;
        Ok(())
    }

    async fn delete(&self, id: &OrchestrationId) -> Result<(), TransportError> {
        let url = self.item_url(id);
        tracing::debug!(url = %url, "Deleting orchestration");

        let response = self.authorized(self.http.delete(&url)).send().await?;
        ensure_success(response, "delete orchestration").await?;
        Ok(())
    }
}
