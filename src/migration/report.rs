//! Migration run summary

use crate::migration::IdMap;
use crate::model::OrchestrationId;

/// Orchestration copied during the creation pass
#[derive(Debug, Clone, PartialEq)]
pub struct MigratedOrchestration {
    /// Orchestration name
    pub name: String,
    /// Id in the source project
    pub source_id: OrchestrationId,
    /// Id assigned by the destination project
    pub destination_id: OrchestrationId,
}

/// Reference task whose target was not part of the migrated set
#[derive(Debug, Clone, PartialEq)]
pub struct DanglingReference {
    /// Destination orchestration holding the task
    pub orchestration_id: OrchestrationId,
    /// Position of the task in the task list
    pub task_index: usize,
    /// Source id the task still points at
    pub source_reference: OrchestrationId,
}

/// Result of fixing the references of one destination orchestration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixOutcome {
    /// Number of task references rewritten
    pub rewritten: usize,
    /// References left pointing at unknown orchestrations
    pub dangling: Vec<DanglingReference>,
}

impl FixOutcome {
    /// True when the task list was written back
    pub fn updated(&self) -> bool {
        self.rewritten > 0
    }
}

/// Summary of a completed migration run
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    /// Orchestrations created in the destination, in migration order
    pub migrated: Vec<MigratedOrchestration>,
    /// Final source to destination mapping
    pub id_map: IdMap,
    /// Destination orchestrations whose task list was rewritten
    pub patched: usize,
    /// Task references rewritten across all orchestrations
    pub references_rewritten: usize,
    /// References that could not be resolved
    pub dangling: Vec<DanglingReference>,
}

impl MigrationReport {
    /// Fold one fix-up outcome into the report
    pub fn record_fix(&mut self, outcome: FixOutcome) {
        if outcome.updated() {
            self.patched += 1;
        }
        self.references_rewritten += outcome.rewritten;
        self.dangling.extend(outcome.dangling);
    }
}
