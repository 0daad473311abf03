//! In-memory orchestration store
//!
//! Behaves like one project's orchestrator service: assigns fresh numeric ids
//! on create, applies partial updates, and records every call so tests can
//! assert which mutations were (or were not) issued.

use crate::client::TransportError;
use crate::model::{
    NewOrchestration, Orchestration, OrchestrationId, OrchestrationPatch, OrchestrationSummary,
};
use crate::store::OrchestrationStore;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// A call received by [`InMemoryOrchestrationStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    /// `list()`
    List,
    /// `get(id)`
    Get(OrchestrationId),
    /// `create(..)` with the requested name
    Create(String),
    /// `update(id, patch)`
    Update(OrchestrationId, OrchestrationPatch),
    /// `delete(id)`
    Delete(OrchestrationId),
}

impl StoreCall {
    /// True for calls that change the store
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            StoreCall::Create(_) | StoreCall::Update(..) | StoreCall::Delete(_)
        )
    }
}

#[derive(Debug, Default)]
struct Inner {
    orchestrations: Vec<Orchestration>,
    calls: Vec<StoreCall>,
    next_id: u64,
    creates: usize,
}

/// Orchestration store held in memory
#[derive(Debug)]
pub struct InMemoryOrchestrationStore {
    inner: Mutex<Inner>,
    activate_on_create: bool,
    create_limit: Option<usize>,
}

impl Default for InMemoryOrchestrationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryOrchestrationStore {
    /// Empty store assigning ids from 1
    pub fn new() -> Self {
        Self::with_first_id(1)
    }

    /// Empty store assigning ids from `first_id`
    ///
    /// Giving the source and destination stores disjoint ranges makes a
    /// missed id rewrite visible in assertions.
    pub fn with_first_id(first_id: u64) -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: first_id,
                ..Default::default()
            }),
            activate_on_create: false,
            create_limit: None,
        }
    }

    /// Ignore the `active` flag sent on create and enable every new orchestration
    pub fn activating_on_create(mut self) -> Self {
        self.activate_on_create = true;
        self
    }

    /// Fail every create after the first `limit` ones with HTTP 500
    pub fn failing_after_creates(mut self, limit: usize) -> Self {
        self.create_limit = Some(limit);
        self
    }

    /// Add an orchestration under its own id without recording a call
    pub async fn insert(&self, orchestration: Orchestration) {
        let mut inner = self.inner.lock().await;
        if let OrchestrationId::Number(n) = orchestration.id {
            inner.next_id = inner.next_id.max(n + 1);
        }
        inner.orchestrations.push(orchestration);
    }

    /// Snapshot of the stored orchestrations, in creation order
    pub async fn orchestrations(&self) -> Vec<Orchestration> {
        self.inner.lock().await.orchestrations.clone()
    }

    /// Find a stored orchestration by name
    pub async fn find_by_name(&self, name: &str) -> Option<Orchestration> {
        self.inner
            .lock()
            .await
            .orchestrations
            .iter()
            .find(|o| o.name == name)
            .cloned()
    }

    /// Every call received so far
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().await.calls.clone()
    }

    /// Number of create, update and delete calls received so far
    pub async fn mutation_count(&self) -> usize {
        self.inner
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| call.is_mutation())
            .count()
    }
}

fn not_found(operation: &str, id: &OrchestrationId) -> TransportError {
    TransportError::api(operation, 404, format!("Orchestration {} not found", id))
}

#[async_trait]
impl OrchestrationStore for InMemoryOrchestrationStore {
    async fn list(&self) -> Result<Vec<OrchestrationSummary>, TransportError> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(StoreCall::List);
        Ok(inner
            .orchestrations
            .iter()
            .map(|o| OrchestrationSummary {
                id: o.id.clone(),
                name: o.name.clone(),
            })
            .collect())
    }

    async fn get(&self, id: &OrchestrationId) -> Result<Orchestration, TransportError> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(StoreCall::Get(id.clone()));
        inner
            .orchestrations
            .iter()
            .find(|o| &o.id == id)
            .cloned()
            .ok_or_else(|| not_found("get orchestration", id))
    }

    async fn create(
        &self,
        orchestration: &NewOrchestration,
    ) -> Result<OrchestrationId, TransportError> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(StoreCall::Create(orchestration.name.clone()));

        if let Some(limit) = self.create_limit {
            if inner.creates >= limit {
                return Err(TransportError::api(
                    "create orchestration",
                    500,
                    "Internal Server Error",
                ));
            }
        }

        let id = OrchestrationId::Number(inner.next_id);
        inner.next_id += 1;
        inner.creates += 1;
        inner.orchestrations.push(Orchestration {
            id: id.clone(),
            name: orchestration.name.clone(),
            crontab_record: orchestration.crontab_record.clone(),
            notifications: orchestration.notifications.clone(),
            active: orchestration.active || self.activate_on_create,
            tasks: orchestration.tasks.clone(),
        });
        Ok(id)
    }

    async fn update(
        &self,
        id: &OrchestrationId,
        patch: &OrchestrationPatch,
    ) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(StoreCall::Update(id.clone(), patch.clone()));
        let orchestration = inner
            .orchestrations
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| not_found("update orchestration", id))?;

        if let Some(active) = patch.active {
            orchestration.active = active;
        }
        if let Some(tasks) = &patch.tasks {
            orchestration.tasks = tasks.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &OrchestrationId) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(StoreCall::Delete(id.clone()));
        let before = inner.orchestrations.len();
        inner.orchestrations.retain(|o| &o.id != id);
        if inner.orchestrations.len() == before {
            return Err(not_found("delete orchestration", id));
        }
        Ok(())
    }
}
