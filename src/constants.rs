//! Migration constants
//!
//! Centralized identifiers shared by the clients, discovery and migration code.

/// Component id of the orchestrator service in the Storage API index,
/// and the `component` value of a task that runs another orchestration
pub const ORCHESTRATOR_COMPONENT_ID: &str = "orchestrator";

/// Key inside `actionParameters` holding the referenced orchestration id
pub const CONFIG_PARAMETER_KEY: &str = "config";

/// Header carrying the project token on every request
pub const TOKEN_HEADER: &str = "X-StorageApi-Token";

/// Environment variable pointing at the component data directory
pub const DATA_DIR_ENV: &str = "KBC_DATADIR";

/// Data directory used when `KBC_DATADIR` is not set
pub const DEFAULT_DATA_DIR: &str = "/data";

/// Name of the component configuration file inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable holding the destination project token
pub const DESTINATION_TOKEN_ENV: &str = "KBC_TOKEN";

/// Environment variable holding the destination project Storage API URL
pub const DESTINATION_URL_ENV: &str = "KBC_URL";

/// Environment variable with an optional per-request timeout in seconds
pub const HTTP_TIMEOUT_ENV: &str = "HTTP_TIMEOUT_SECS";
