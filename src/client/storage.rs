//! Storage API client
//!
//! Only the two calls needed to locate a project's orchestrator service:
//! the service index and token verification.

use crate::client::{decode_response, normalize_base_url, token_header, TransportError};
use crate::constants::TOKEN_HEADER;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use std::fmt;

/// Service advertised in the Storage API index
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceComponent {
    /// Service identifier (e.g. `"orchestrator"`)
    pub id: String,
    /// Base URI of the service
    #[serde(default)]
    pub uri: String,
}

/// Response of `GET /v2/storage`
#[derive(Debug, Clone, Deserialize)]
pub struct IndexResponse {
    /// Services available to the project
    #[serde(default)]
    pub components: Vec<ServiceComponent>,
}

impl IndexResponse {
    /// Look up a service by id
    pub fn find_component(&self, id: &str) -> Option<&ServiceComponent> {
        self.components.iter().find(|component| component.id == id)
    }
}

/// Owner section of the token verification response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenOwner {
    /// Region the project lives in
    #[serde(default)]
    pub region: String,
}

/// Response of `GET /v2/storage/tokens/verify`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    /// Project the token belongs to
    pub owner: TokenOwner,
}

/// Client for one project's Storage API
pub struct StorageApiClient {
    http: reqwest::Client,
    base_url: String,
    token: HeaderValue,
}

impl fmt::Debug for StorageApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl StorageApiClient {
    /// Create a client for the project identified by `token` at `base_url`
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

    /// List the services available to the project
    pub async fn index_action(&self) -> Result<IndexResponse, TransportError> {
        let url = format!("{}/v2/storage", self.base_url);
        tracing::debug!(url = %url, "Loading Storage API index");

        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, self.token.clone())
            .send()
            .await?;

        decode_response(response, "storage index").await
    }

    /// Verify the token and return its project metadata
    pub async fn verify_token(&self) -> Result<TokenInfo, TransportError> {
        let url = format!("{}/v2/storage/tokens/verify", self.base_url);
        tracing::debug!(url = %url, "Verifying Storage API token");

        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, self.token.clone())
            .send()
            .await?;

        decode_response(response, "token verification").await
    }
}
