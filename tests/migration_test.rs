//! Migration tests against in-memory projects
//!
//! These tests verify the observable guarantees of a run:
//! 1. A non-empty destination blocks the run before any mutation
//! 2. Copies are always disabled
//! 3. Orchestration references are rewritten to destination ids
//! 4. Other tasks are copied untouched
//! 5. Dangling references are tolerated

use orchestrator_migrate::error::MigrationError;
use orchestrator_migrate::migration::Migrator;
use orchestrator_migrate::model::{Orchestration, OrchestrationId, Task};
use orchestrator_migrate::store::{InMemoryOrchestrationStore, OrchestrationStore, StoreCall};
use serde_json::{json, Value};

fn id(n: u64) -> OrchestrationId {
    OrchestrationId::Number(n)
}

fn child_orchestration(source_id: u64) -> Orchestration {
    Orchestration {
        id: id(source_id),
        name: "Child orchestration".to_string(),
        crontab_record: None,
        notifications: json!([]),
        active: false,
        tasks: vec![],
    }
}

fn orchestrator_task(target: Value) -> Task {
    serde_json::from_value(json!({
        "id": 31,
        "component": "orchestrator",
        "action": "run",
        "continueOnFailure": true,
        "phase": 1,
        "active": true,
        "timeoutMinutes": 10,
        "actionParameters": {"config": target}
    }))
    .unwrap()
}

fn csv_import_task() -> Task {
    serde_json::from_value(json!({
        "id": 32,
        "component": "keboola.csv-import",
        "action": "run",
        "continueOnFailure": false,
        "phase": 2,
        "active": false,
        "timeoutMinutes": 0,
        "actionParameters": []
    }))
    .unwrap()
}

fn master_orchestration(source_id: u64, child_id: Value) -> Orchestration {
    Orchestration {
        id: id(source_id),
        name: "Master orchestration".to_string(),
        crontab_record: Some("1 1 1 1 1".to_string()),
        notifications: json!([{"email": "ops@example.com", "channel": "error", "parameters": []}]),
        active: true,
        tasks: vec![orchestrator_task(child_id), csv_import_task()],
    }
}

/// Source project holding master (listed first) and the child it runs
async fn master_child_source() -> InMemoryOrchestrationStore {
    let source = InMemoryOrchestrationStore::new();
    source.insert(master_orchestration(12, json!(11))).await;
    source.insert(child_orchestration(11)).await;
    source
}

#[tokio::test]
async fn test_non_empty_destination_aborts_before_mutation() {
    let source = master_child_source().await;
    let destination = InMemoryOrchestrationStore::with_first_id(1000);
    destination.insert(child_orchestration(1000)).await;

    let result = Migrator::new(&source, &destination).run().await;

    match result {
        Err(e @ MigrationError::DestinationNotEmpty { .. }) => {
            assert!(e.is_user_error());
            assert_eq!(e.exit_code(), 1);
        }
        other => panic!("Expected DestinationNotEmpty, got {:?}", other),
    }
    assert_eq!(destination.mutation_count().await, 0);
    assert_eq!(source.mutation_count().await, 0);
    assert_eq!(destination.orchestrations().await.len(), 1);
}

#[tokio::test]
async fn test_non_empty_destination_aborts_even_for_empty_source() {
    let source = InMemoryOrchestrationStore::new();
    let destination = InMemoryOrchestrationStore::new();
    destination.insert(child_orchestration(1)).await;

    let result = Migrator::new(&source, &destination).run().await;

    assert!(matches!(
        result,
        Err(MigrationError::DestinationNotEmpty { count: 1 })
    ));
    assert!(source.calls().await.is_empty());
}

#[tokio::test]
async fn test_empty_source_issues_no_mutations() {
    let source = InMemoryOrchestrationStore::new();
    let destination = InMemoryOrchestrationStore::new();

    let report = Migrator::new(&source, &destination).run().await.unwrap();

    assert!(report.migrated.is_empty());
    assert!(report.id_map.is_empty());
    assert_eq!(destination.mutation_count().await, 0);
    assert_eq!(destination.calls().await, vec![StoreCall::List]);
}

#[tokio::test]
async fn test_copies_are_always_inactive() {
    let source = InMemoryOrchestrationStore::new();
    let mut enabled = child_orchestration(1);
    enabled.name = "Enabled".to_string();
    enabled.active = true;
    let mut disabled = child_orchestration(2);
    disabled.name = "Disabled".to_string();
    disabled.active = false;
    source.insert(enabled).await;
    source.insert(disabled).await;

    // Destination that ignores `active` on create
    let destination = InMemoryOrchestrationStore::with_first_id(500).activating_on_create();

    let report = Migrator::new(&source, &destination).run().await.unwrap();

    assert_eq!(report.migrated.len(), 2);
    for orchestration in destination.orchestrations().await {
        assert!(
            !orchestration.active,
            "{} should be inactive after migration",
            orchestration.name
        );
    }
    // Source keeps its own flags
    assert!(source.find_by_name("Enabled").await.unwrap().active);
}

#[tokio::test]
async fn test_forward_reference_is_rewritten() {
    let source = master_child_source().await;
    let destination = InMemoryOrchestrationStore::with_first_id(1000);

    let report = Migrator::new(&source, &destination).run().await.unwrap();

    let master = destination.find_by_name("Master orchestration").await.unwrap();
    let child = destination.find_by_name("Child orchestration").await.unwrap();

    // Master was listed first, so its copy got the first destination id
    assert_eq!(master.id, id(1000));
    assert_eq!(child.id, id(1001));
    assert_eq!(
        master.tasks[0].action_parameters["config"],
        child.id.to_value()
    );
    assert_eq!(report.id_map.get(&id(11)), Some(&child.id));
    assert_eq!(report.id_map.get(&id(12)), Some(&master.id));
    assert_eq!(report.patched, 1);
    assert_eq!(report.references_rewritten, 1);
    assert!(report.dangling.is_empty());

    // Source tasks are never modified
    let source_master = source.get(&id(12)).await.unwrap();
    assert_eq!(source_master.tasks[0].action_parameters["config"], json!(11));
}

#[tokio::test]
async fn test_string_reference_resolves_numeric_listing_id() {
    let source = InMemoryOrchestrationStore::new();
    source.insert(child_orchestration(11)).await;
    source.insert(master_orchestration(12, json!("11"))).await;
    let destination = InMemoryOrchestrationStore::with_first_id(1000);

    Migrator::new(&source, &destination).run().await.unwrap();

    let master = destination.find_by_name("Master orchestration").await.unwrap();
    assert_eq!(master.tasks[0].action_parameters["config"], json!(1000));
}

#[tokio::test]
async fn test_non_reference_tasks_pass_through() {
    let source = master_child_source().await;
    let destination = InMemoryOrchestrationStore::with_first_id(1000);

    Migrator::new(&source, &destination).run().await.unwrap();

    let master = destination.find_by_name("Master orchestration").await.unwrap();
    assert_eq!(master.tasks.len(), 2);
    assert_eq!(master.tasks[1], csv_import_task());

    let task = &master.tasks[1];
    assert_eq!(task.component.as_deref(), Some("keboola.csv-import"));
    assert_eq!(task.action, "run");
    assert!(!task.continue_on_failure);
    assert_eq!(task.phase, Some(2));
    assert!(!task.active);
    assert_eq!(task.timeout_minutes, Some(0));

    // Reference task keeps everything except the rewritten id
    let reference = &master.tasks[0];
    assert_eq!(reference.action, "run");
    assert!(reference.continue_on_failure);
    assert_eq!(reference.phase, Some(1));
    assert!(reference.active);
    assert_eq!(reference.timeout_minutes, Some(10));
    assert_eq!(reference.extra.get("id"), Some(&json!(31)));

    assert_eq!(master.crontab_record.as_deref(), Some("1 1 1 1 1"));
    assert_eq!(
        master.notifications,
        json!([{"email": "ops@example.com", "channel": "error", "parameters": []}])
    );
}

#[tokio::test]
async fn test_dangling_reference_is_left_unchanged() {
    let source = InMemoryOrchestrationStore::new();
    source.insert(master_orchestration(12, json!(4242))).await;
    let destination = InMemoryOrchestrationStore::with_first_id(1000);

    let report = Migrator::new(&source, &destination).run().await.unwrap();

    let master = destination.find_by_name("Master orchestration").await.unwrap();
    assert_eq!(master.tasks[0].action_parameters["config"], json!(4242));
    assert_eq!(report.patched, 0);
    assert_eq!(report.dangling.len(), 1);
    assert_eq!(report.dangling[0].orchestration_id, id(1000));
    assert_eq!(report.dangling[0].task_index, 0);
    assert_eq!(report.dangling[0].source_reference, id(4242));

    // Nothing resolved, so the task list is not written back
    let task_updates = destination
        .calls()
        .await
        .into_iter()
        .filter(|call| matches!(call, StoreCall::Update(_, patch) if patch.tasks.is_some()))
        .count();
    assert_eq!(task_updates, 0);
}

#[tokio::test]
async fn test_self_reference_points_at_own_copy() {
    let source = InMemoryOrchestrationStore::new();
    let mut looping = master_orchestration(7, json!(7));
    looping.name = "Loop".to_string();
    source.insert(looping).await;
    let destination = InMemoryOrchestrationStore::with_first_id(70);

    Migrator::new(&source, &destination).run().await.unwrap();

    let copy = destination.find_by_name("Loop").await.unwrap();
    assert_eq!(copy.tasks[0].action_parameters["config"], json!(70));
}

#[tokio::test]
async fn test_fix_pass_runs_after_all_creations() {
    let source = master_child_source().await;
    let destination = InMemoryOrchestrationStore::with_first_id(1000);

    Migrator::new(&source, &destination).run().await.unwrap();

    let calls = destination.calls().await;
    let last_create = calls
        .iter()
        .rposition(|call| matches!(call, StoreCall::Create(_)))
        .unwrap();
    let first_fix_read = calls
        .iter()
        .position(|call| matches!(call, StoreCall::Get(_)))
        .unwrap();
    assert!(last_create < first_fix_read);

    // Only the master has reference tasks, so only it is re-read
    let reads: Vec<_> = calls
        .iter()
        .filter_map(|call| match call {
            StoreCall::Get(id) => Some(id.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(reads, vec![id(1000)]);
}

#[tokio::test]
async fn test_failed_create_aborts_run() {
    let source = master_child_source().await;
    let destination = InMemoryOrchestrationStore::with_first_id(1000).failing_after_creates(1);

    let error = Migrator::new(&source, &destination).run().await.unwrap_err();

    assert!(matches!(error, MigrationError::Transport(_)));
    assert_eq!(error.exit_code(), 2);
    // The first copy stays behind; no fix-up was attempted
    let remaining = destination.orchestrations().await;
    assert_eq!(remaining.len(), 1);
    assert!(!destination
        .calls()
        .await
        .iter()
        .any(|call| matches!(call, StoreCall::Get(_))));
}
