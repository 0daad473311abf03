//! Orchestration wire types
//!
//! Serde types for the orchestrator API payloads. Field names follow the
//! camelCase JSON the service speaks. Task fields that are not modelled
//! explicitly are carried in `extra` so a task copied between projects is
//! written back exactly as it was read.

use crate::constants::{CONFIG_PARAMETER_KEY, ORCHESTRATOR_COMPONENT_ID};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Project-scoped orchestration identifier assigned by the remote store
///
/// The service returns numeric ids, but task parameters sometimes carry
/// them as strings, so both shapes are accepted and kept as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrchestrationId {
    /// Numeric id (the usual form)
    Number(u64),
    /// Textual id
    Text(String),
}

impl OrchestrationId {
    /// Read an id out of an arbitrary JSON value
    ///
    /// Returns `None` for anything that cannot name an orchestration
    /// (null, booleans, negative or fractional numbers, empty strings, ...).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(OrchestrationId::Number),
            Value::String(s) if !s.trim().is_empty() => {
                Some(OrchestrationId::Text(s.trim().to_string()))
            }
            _ => None,
        }
    }

    /// JSON form of the id, preserving its native type
    pub fn to_value(&self) -> Value {
        match self {
            OrchestrationId::Number(n) => Value::from(*n),
            OrchestrationId::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for OrchestrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrchestrationId::Number(n) => write!(f, "{}", n),
            OrchestrationId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for OrchestrationId {
    fn from(id: u64) -> Self {
        OrchestrationId::Number(id)
    }
}

impl From<&str> for OrchestrationId {
    fn from(id: &str) -> Self {
        OrchestrationId::Text(id.to_string())
    }
}

/// One step of an orchestration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Component the task runs; `"orchestrator"` marks a task that runs another orchestration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Component action, usually `"run"`
    #[serde(default)]
    pub action: String,
    /// Whether the orchestration goes on when this task fails
    #[serde(default)]
    pub continue_on_failure: bool,
    /// Phase the task belongs to
    #[serde(default)]
    pub phase: Option<i64>,
    /// Whether the task is enabled
    #[serde(default)]
    pub active: bool,
    /// Task timeout in minutes (null or 0 means no limit)
    #[serde(default)]
    pub timeout_minutes: Option<i64>,
    /// Free-form action parameters
    #[serde(default, deserialize_with = "deserialize_action_parameters")]
    pub action_parameters: Map<String, Value>,
    /// Any other task field, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// True when the task invokes another orchestration
    pub fn is_orchestration_reference(&self) -> bool {
        self.component.as_deref() == Some(ORCHESTRATOR_COMPONENT_ID)
    }

    /// Id of the orchestration this task invokes, if it is a reference task
    pub fn referenced_orchestration(&self) -> Option<OrchestrationId> {
        if !self.is_orchestration_reference() {
            return None;
        }
        self.action_parameters
            .get(CONFIG_PARAMETER_KEY)
            .and_then(OrchestrationId::from_value)
    }

    /// Point the task at a different orchestration
    pub fn set_referenced_orchestration(&mut self, id: &OrchestrationId) {
        self.action_parameters
            .insert(CONFIG_PARAMETER_KEY.to_string(), id.to_value());
    }
}

/// PHP-backed services encode an empty map as `[]`
fn deserialize_action_parameters<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        Value::Array(items) if items.is_empty() => Ok(Map::new()),
        other => Err(serde::de::Error::custom(format!(
            "actionParameters must be an object, got {}",
            other
        ))),
    }
}

/// Full orchestration as returned by `GET /orchestrations/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Orchestration {
    /// Project-scoped id
    pub id: OrchestrationId,
    /// Display name
    pub name: String,
    /// Cron schedule, if any
    #[serde(default)]
    pub crontab_record: Option<String>,
    /// Notification settings (opaque)
    #[serde(default)]
    pub notifications: Value,
    /// Whether the schedule is enabled
    #[serde(default)]
    pub active: bool,
    /// Ordered task list
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Orchestration {
    /// True when at least one task invokes another orchestration
    pub fn has_orchestration_references(&self) -> bool {
        self.tasks.iter().any(Task::is_orchestration_reference)
    }
}

/// Listing entry returned by `GET /orchestrations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationSummary {
    /// Project-scoped id
    pub id: OrchestrationId,
    /// Display name
    pub name: String,
}

/// Body of `POST /orchestrations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrchestration {
    /// Display name
    pub name: String,
    /// Cron schedule
    pub crontab_record: Option<String>,
    /// Notification settings (opaque)
    pub notifications: Value,
    /// Ordered task list
    pub tasks: Vec<Task>,
    /// Whether the schedule is enabled
    pub active: bool,
}

impl NewOrchestration {
    /// Copy of `source` for another project, always created disabled
    pub fn inactive_copy_of(source: &Orchestration) -> Self {
        Self {
            name: source.name.clone(),
            crontab_record: source.crontab_record.clone(),
            notifications: source.notifications.clone(),
            tasks: source.tasks.clone(),
            active: false,
        }
    }
}

/// Response of `POST /orchestrations`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrchestration {
    /// Id assigned by the service
    pub id: OrchestrationId,
}

/// Partial body of `PUT /orchestrations/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationPatch {
    /// New `active` flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Replacement task list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

impl OrchestrationPatch {
    /// Patch that only disables the orchestration
    pub fn deactivate() -> Self {
        Self {
            active: Some(false),
            ..Default::default()
        }
    }

    /// Patch that only replaces the task list
    pub fn tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Some(tasks),
            ..Default::default()
        }
    }
}
