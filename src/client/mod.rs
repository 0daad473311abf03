//! Remote API clients
//!
//! HTTP clients for the Storage API (service index, token verification)
//! and the orchestrator API. All requests carry the project token in the
//! `X-StorageApi-Token` header and share one `reqwest::Client` for
//! connection pooling.

pub mod error;
pub mod orchestrator;
pub mod storage;

pub use error::TransportError;
pub use orchestrator::HttpOrchestrationStore;
pub use storage::{IndexResponse, ServiceComponent, StorageApiClient, TokenInfo};

use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build the HTTP client shared by every project client
///
/// `timeout_secs = None` leaves requests without a client-side timeout.
pub fn build_http_client(timeout_secs: Option<u64>) -> Result<reqwest::Client, TransportError> {
    let mut builder = reqwest::Client::builder().user_agent(format!(
        "orchestrator-migrate/{}",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Validate a base URL and strip the trailing slash so paths can be appended
pub(crate) fn normalize_base_url(raw: &str) -> Result<String, TransportError> {
    let trimmed = raw.trim().trim_end_matches('/');
    reqwest::Url::parse(trimmed)
        .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", raw, e)))?;
    Ok(trimmed.to_string())
}

/// Header value for a project token, marked sensitive
pub(crate) fn token_header(token: &str) -> Result<HeaderValue, TransportError> {
    let mut value =
        HeaderValue::from_str(token).map_err(|e| TransportError::InvalidToken(e.to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Fail on a non-success status, returning the body as the error message
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    operation: &str,
) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error body".to_string());

    tracing::error!(
        status_code = status.as_u16(),
        error_body = %error_body,
        operation = operation,
        "Remote API returned error status"
    );

    Err(TransportError::api(operation, status.as_u16(), error_body))
}

/// Check the status and decode a JSON body
pub(crate) async fn decode_response<T>(
    response: reqwest::Response,
    operation: &str,
) -> Result<T, TransportError>
where
    T: DeserializeOwned,
{
    let response = ensure_success(response, operation).await?;
    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| {
        TransportError::invalid_response(operation, format!("{} - Response body: {}", e, body))
    })
}
