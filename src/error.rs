//! Error types and error handling for the migration run
//!
//! Every failure aborts the run. Errors are split into user errors
//! (actionable precondition or configuration problems, exit code 1) and
//! application errors (remote call failures, exit code 2).

use crate::client::TransportError;
use crate::config::ConfigError;
use thiserror::Error;

/// Exit code for user errors
pub const USER_ERROR_EXIT_CODE: u8 = 1;

/// Exit code for application errors
pub const APPLICATION_ERROR_EXIT_CODE: u8 = 2;

/// Top-level error of a migration run
#[derive(Error, Debug)]
pub enum MigrationError {
    /// The destination project already has orchestrations
    #[error("Destination project has some existing orchestrations")]
    DestinationNotEmpty {
        /// Number of orchestrations found in the destination
        count: usize,
    },

    /// The project's region does not offer the orchestrator service
    #[error("Orchestrator not found in {region} region")]
    ServiceNotFound {
        /// Region reported by token verification
        region: String,
    },

    /// Configuration is missing or invalid
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A remote call failed
    #[error("{0}")]
    Transport(#[from] TransportError),
}

impl MigrationError {
    /// True for actionable errors the operator can fix
    pub fn is_user_error(&self) -> bool {
        match self {
            MigrationError::DestinationNotEmpty { .. } => true,
            MigrationError::ServiceNotFound { .. } => true,
            MigrationError::Config(_) => true,
            MigrationError::Transport(_) => false,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        if self.is_user_error() {
            USER_ERROR_EXIT_CODE
        } else {
            APPLICATION_ERROR_EXIT_CODE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_not_empty_is_user_error() {
        let error = MigrationError::DestinationNotEmpty { count: 3 };
        assert!(error.is_user_error());
        assert_eq!(error.exit_code(), 1);
        assert_eq!(
            error.to_string(),
            "Destination project has some existing orchestrations"
        );
    }

    #[test]
    fn test_service_not_found_message() {
        let error = MigrationError::ServiceNotFound {
            region: "eu-central-1".to_string(),
        };
        assert_eq!(error.to_string(), "Orchestrator not found in eu-central-1 region");
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_transport_is_application_error() {
        let error: MigrationError =
            TransportError::api("create orchestration", 500, "boom").into();
        assert!(!error.is_user_error());
        assert_eq!(error.exit_code(), 2);
        assert!(error.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_config_is_user_error() {
        let error: MigrationError = ConfigError::MissingEnv("KBC_TOKEN".to_string()).into();
        assert_eq!(error.exit_code(), 1);
    }
}
