//! Destination precondition
//!
//! Migration creates orchestrations with fresh ids and cannot merge, so it
//! only runs against a project without orchestrations.

use crate::error::MigrationError;
use crate::store::OrchestrationStore;

/// Fail with `DestinationNotEmpty` if the destination has any orchestration
pub async fn check_destination_empty(
    destination: &dyn OrchestrationStore,
) -> Result<(), MigrationError> {
    tracing::info!("Checking destination project for existing orchestrations");

    let existing = destination.list().await?;
    if !existing.is_empty() {
        return Err(MigrationError::DestinationNotEmpty {
            count: existing.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Orchestration, OrchestrationId};
    use crate::store::InMemoryOrchestrationStore;
    use serde_json::Value;

    #[tokio::test]
    async fn test_empty_destination_passes() {
        let store = InMemoryOrchestrationStore::new();
        assert!(check_destination_empty(&store).await.is_ok());
    }

    #[tokio::test]
    async fn test_non_empty_destination_blocks() {
        let store = InMemoryOrchestrationStore::new();
        store
            .insert(Orchestration {
                id: OrchestrationId::Number(1),
                name: "Child orchestration".to_string(),
                crontab_record: None,
                notifications: Value::Null,
                active: false,
                tasks: vec![],
            })
            .await;

        let error = check_destination_empty(&store).await.unwrap_err();
        assert!(matches!(error, MigrationError::DestinationNotEmpty { count: 1 }));
        assert_eq!(store.mutation_count().await, 0);
    }
}
