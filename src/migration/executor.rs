//! Two-pass migration
//!
//! Pass 1 copies every source orchestration into the destination (disabled)
//! and records the id the destination assigned. Pass 2 runs only after every
//! copy exists, and rewrites reference tasks from source ids to destination
//! ids. A referrer may be copied before the orchestration it references, so
//! the passes cannot be merged.

use crate::error::MigrationError;
use crate::migration::precheck::check_destination_empty;
use crate::migration::report::{
    DanglingReference, FixOutcome, MigratedOrchestration, MigrationReport,
};
use crate::migration::IdMap;
use crate::model::{NewOrchestration, Orchestration, OrchestrationId, OrchestrationPatch};
use crate::store::OrchestrationStore;

/// Copies orchestrations from one project to another
pub struct Migrator<'a> {
    source: &'a dyn OrchestrationStore,
    destination: &'a dyn OrchestrationStore,
}

impl<'a> Migrator<'a> {
    /// Create a migrator between two independently configured stores
    pub fn new(
        source: &'a dyn OrchestrationStore,
        destination: &'a dyn OrchestrationStore,
    ) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Fail if the destination project already has orchestrations
    pub async fn check_destination_empty(&self) -> Result<(), MigrationError> {
        check_destination_empty(self.destination).await
    }

    /// Run the whole migration: precondition, pass 1, pass 2
    ///
    /// Sequential and fail-fast: the first failed call aborts the run and
    /// leaves whatever was already created in the destination.
    pub async fn run(&self) -> Result<MigrationReport, MigrationError> {
        self.check_destination_empty().await?;

        tracing::info!("Loading orchestrations from current project");
        let summaries = self.source.list().await?;

        let mut report = MigrationReport::default();
        if summaries.is_empty() {
            tracing::info!("Current project does not contain any orchestrations");
            return Ok(report);
        }

        tracing::info!("Orchestrations migration");
        let mut id_map = IdMap::new();
        let mut pending_fixes = Vec::new();
        let total = summaries.len();

        for (i, summary) in summaries.iter().enumerate() {
            tracing::info!("Orchestration ({}/{})", i + 1, total);

            // The listing carries no tasks
            let orchestration = self.source.get(&summary.id).await?;
            let destination_id = self.migrate_one(&orchestration).await?;

            id_map.insert(summary.id.clone(), destination_id.clone());
            report.migrated.push(MigratedOrchestration {
                name: orchestration.name.clone(),
                source_id: summary.id.clone(),
                destination_id: destination_id.clone(),
            });

            if orchestration.has_orchestration_references() {
                pending_fixes.push(destination_id);
            }
        }

        if !pending_fixes.is_empty() {
            tracing::info!("Orchestrations tasks fix");
            let total = pending_fixes.len();
            for (i, destination_id) in pending_fixes.iter().enumerate() {
                tracing::info!("Orchestration ({}/{})", i + 1, total);
                let outcome = self.fix_references(destination_id, &id_map).await?;
                report.record_fix(outcome);
            }
        }

        report.id_map = id_map;
        Ok(report)
    }

    /// Pass 1: copy one fully loaded source orchestration
    ///
    /// The copy is created disabled and then explicitly disabled again,
    /// whatever the source's `active` flag; the create call's handling of
    /// `active` is not relied upon.
    ///
    /// # Returns
    /// * `Ok(OrchestrationId)` - Id assigned by the destination
    pub async fn migrate_one(
        &self,
        source: &Orchestration,
    ) -> Result<OrchestrationId, MigrationError> {
        tracing::info!("Migrating \"{}\" orchestration", source.name);

        let destination_id = self
            .destination
            .create(&NewOrchestration::inactive_copy_of(source))
            .await?;
        self.destination
            .update(&destination_id, &OrchestrationPatch::deactivate())
            .await?;

        tracing::debug!(
            source_id = %source.id,
            destination_id = %destination_id,
            task_count = source.tasks.len(),
            "Orchestration migrated"
        );
        Ok(destination_id)
    }

    /// Pass 2: rewrite orchestration references of one destination orchestration
    ///
    /// Tasks are re-read from the destination. Reference tasks whose source
    /// id is in `id_map` are pointed at the destination id; other tasks are
    /// left alone. Unknown source ids are left as they are and reported as
    /// dangling. The task list is written back once, and only if something
    /// changed.
    pub async fn fix_references(
        &self,
        destination_id: &OrchestrationId,
        id_map: &IdMap,
    ) -> Result<FixOutcome, MigrationError> {
        let mut orchestration = self.destination.get(destination_id).await?;
        tracing::info!("Fixing \"{}\" orchestration tasks", orchestration.name);

        let mut outcome = FixOutcome::default();
        for (task_index, task) in orchestration.tasks.iter_mut().enumerate() {
            if !task.is_orchestration_reference() {
                continue;
            }

            let Some(source_reference) = task.referenced_orchestration() else {
                tracing::warn!(
                    orchestration_id = %destination_id,
                    task_index = task_index,
                    "Orchestration task has no referenced orchestration id"
                );
                continue;
            };

            match id_map.get(&source_reference) {
                Some(target) => {
                    tracing::debug!(
                        task_index = task_index,
                        source_reference = %source_reference,
                        destination_reference = %target,
                        "Rewriting orchestration reference"
                    );
                    task.set_referenced_orchestration(target);
                    outcome.rewritten += 1;
                }
                None => {
                    tracing::warn!(
                        orchestration_id = %destination_id,
                        task_index = task_index,
                        source_reference = %source_reference,
                        "Referenced orchestration was not migrated, leaving reference unchanged"
                    );
                    outcome.dangling.push(DanglingReference {
                        orchestration_id: destination_id.clone(),
                        task_index,
                        source_reference,
                    });
                }
            }
        }

        if outcome.updated() {
            self.destination
                .update(destination_id, &OrchestrationPatch::tasks(orchestration.tasks))
                .await?;
        }

        Ok(outcome)
    }
}
