//! Application configuration
//!
//! The source project comes from the component configuration file
//! (`$KBC_DATADIR/config.json`), the destination project from the
//! `KBC_TOKEN` / `KBC_URL` environment variables of the running component.

use crate::constants::{
    CONFIG_FILE_NAME, DATA_DIR_ENV, DEFAULT_DATA_DIR, DESTINATION_TOKEN_ENV, DESTINATION_URL_ENV,
    HTTP_TIMEOUT_ENV,
};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SOURCE_TOKEN_PARAMETER: &str = "#sourceKbcToken";
const SOURCE_URL_PARAMETER: &str = "sourceKbcUrl";

/// Errors raised while loading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read configuration file {path}: {reason}")]
    Io {
        /// File path
        path: String,
        /// Underlying I/O error
        reason: String,
    },

    /// The configuration file is not valid JSON of the expected shape
    #[error("Invalid configuration JSON: {0}")]
    Json(String),

    /// A required node is absent
    #[error("The child node \"{node}\" at path \"{path}\" must be configured.")]
    MissingNode {
        /// Missing node name
        node: String,
        /// Path of the parent node
        path: String,
    },

    /// A required node is present but empty
    #[error("The path \"{0}\" cannot contain an empty value, but got \"\".")]
    EmptyValue(String),

    /// A required environment variable is not set
    #[error("Environment variable {0} is not set")]
    MissingEnv(String),

    /// An environment variable has an unusable value
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name
        name: String,
        /// Offending value
        value: String,
    },
}

/// Connection settings for one project
#[derive(Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Storage API token
    pub token: String,
    /// Storage API base URL (e.g. `https://connection.keboola.com`)
    pub url: String,
}

impl fmt::Debug for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectConfig")
            .field("token", &"<redacted>")
            .field("url", &self.url)
            .finish()
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpConfig {
    /// Per-request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Project orchestrations are copied from
    pub source: ProjectConfig,
    /// Project orchestrations are copied to
    pub destination: ProjectConfig,
    /// HTTP client configuration
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
struct ComponentConfig {
    parameters: Option<Parameters>,
}

#[derive(Debug, Deserialize)]
struct Parameters {
    #[serde(rename = "#sourceKbcToken")]
    source_token: Option<String>,
    #[serde(rename = "sourceKbcUrl")]
    source_url: Option<String>,
}

fn required(value: Option<String>, node: &str) -> Result<String, ConfigError> {
    let value = value.ok_or_else(|| ConfigError::MissingNode {
        node: node.to_string(),
        path: "root.parameters".to_string(),
    })?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ConfigError::EmptyValue(format!("root.parameters.{}", node)));
    }
    Ok(value)
}

impl Config {
    /// Load configuration from the data directory and the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let lookup = |name: &str| env::var(name).ok();

        Ok(Self {
            source: Self::load_source_project(&data_dir.join(CONFIG_FILE_NAME))?,
            destination: Self::destination_from_lookup(lookup)?,
            http: Self::http_from_lookup(lookup)?,
        })
    }

    /// Read the source project settings from a component configuration file
    pub fn load_source_project<P: AsRef<Path>>(path: P) -> Result<ProjectConfig, ConfigError> {
        let json = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse_source_project(&json)
    }

    /// Parse the source project settings from component configuration JSON
    ///
    /// Extra parameters are accepted and ignored.
    pub fn parse_source_project(json: &str) -> Result<ProjectConfig, ConfigError> {
        let config: ComponentConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        let parameters = config.parameters.ok_or_else(|| ConfigError::MissingNode {
            node: "parameters".to_string(),
            path: "root".to_string(),
        })?;

        Ok(ProjectConfig {
            token: required(parameters.source_token, SOURCE_TOKEN_PARAMETER)?,
            url: required(parameters.source_url, SOURCE_URL_PARAMETER)?,
        })
    }

    /// Destination project settings from `KBC_TOKEN` / `KBC_URL`
    pub fn destination_from_lookup<F>(lookup: F) -> Result<ProjectConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingEnv(name.to_string()))
        };

        Ok(ProjectConfig {
            token: read(DESTINATION_TOKEN_ENV)?,
            url: read(DESTINATION_URL_ENV)?,
        })
    }

    /// HTTP settings from `HTTP_TIMEOUT_SECS`
    pub fn http_from_lookup<F>(lookup: F) -> Result<HttpConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = match lookup(HTTP_TIMEOUT_ENV) {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => {
                let parsed = raw.trim().parse::<u64>();
                match parsed {
                    Ok(secs) if secs > 0 => Some(secs),
                    _ => {
                        return Err(ConfigError::InvalidEnv {
                            name: HTTP_TIMEOUT_ENV.to_string(),
                            value: raw,
                        })
                    }
                }
            }
        };
        Ok(HttpConfig { timeout_secs })
    }
}
