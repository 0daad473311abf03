//! Orchestration store abstraction
//!
//! The migration core only talks to projects through [`OrchestrationStore`].
//! The HTTP implementation lives in `crate::client::orchestrator`; the
//! in-memory one backs tests and local fixtures.

pub mod memory;

pub use memory::{InMemoryOrchestrationStore, StoreCall};

use crate::client::TransportError;
use crate::model::{
    NewOrchestration, Orchestration, OrchestrationId, OrchestrationPatch, OrchestrationSummary,
};
use async_trait::async_trait;

/// CRUD access to the orchestrations of one project
#[async_trait]
pub trait OrchestrationStore: Send + Sync {
    /// List orchestration summaries (tasks not included)
    async fn list(&self) -> Result<Vec<OrchestrationSummary>, TransportError>;

    /// Load one orchestration with its tasks
    async fn get(&self, id: &OrchestrationId) -> Result<Orchestration, TransportError>;

    /// Create an orchestration and return the id the store assigned
    async fn create(
        &self,
        orchestration: &NewOrchestration,
    ) -> Result<OrchestrationId, TransportError>;

    /// Apply a partial update
    async fn update(
        &self,
        id: &OrchestrationId,
        patch: &OrchestrationPatch,
    ) -> Result<(), TransportError>;

    /// Delete an orchestration
    async fn delete(&self, id: &OrchestrationId) -> Result<(), TransportError>;
}
