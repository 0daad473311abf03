//! Transport error types
//!
//! Errors raised while talking to the Storage API or the orchestrator API
//! (network failures, non-success statuses, undecodable bodies).

use thiserror::Error;

/// Errors that can occur during a remote call
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("API error during {operation}: HTTP {status} - {message}")]
    Api {
        /// Operation being performed (e.g. "create orchestration")
        operation: String,
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The response body did not have the expected shape
    #[error("Invalid response from {operation}: {reason}")]
    InvalidResponse {
        /// Operation being performed
        operation: String,
        /// What was wrong with the body
        reason: String,
    },

    /// A base URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A token could not be used as a header value
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl TransportError {
    /// Create an API error from a non-success response
    pub fn api(operation: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.into(),
            status,
            message: message.into(),
        }
    }

    /// Create an invalid-response error
    pub fn invalid_response(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status of the failed call, when the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Api { status, .. } => Some(*status),
            TransportError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
