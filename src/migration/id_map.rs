//! Source to destination id mapping

use crate::model::OrchestrationId;
use std::collections::HashMap;

/// Map from source orchestration ids to the ids the destination assigned
///
/// Keys are compared by their textual form: a task parameter holding `"17"`
/// resolves the orchestration listed as `17`. Values keep the JSON type the
/// destination returned.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    by_source: HashMap<String, OrchestrationId>,
    entries: Vec<(OrchestrationId, OrchestrationId)>,
}

impl IdMap {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `source` was migrated as `destination`
    ///
    /// A repeated source id replaces the earlier destination.
    pub fn insert(&mut self, source: OrchestrationId, destination: OrchestrationId) {
        let key = source.to_string();
        if self.by_source.insert(key, destination.clone()).is_some() {
            tracing::warn!(source_id = %source, "Source orchestration id mapped twice");
            self.entries.retain(|(s, _)| s.to_string() != source.to_string());
        }
        self.entries.push((source, destination));
    }

    /// Destination id for a source id
    pub fn get(&self, source: &OrchestrationId) -> Option<&OrchestrationId> {
        self.by_source.get(&source.to_string())
    }

    /// Number of mapped orchestrations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been mapped
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mapped pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&OrchestrationId, &OrchestrationId)> {
        self.entries.iter().map(|(s, d)| (s, d))
    }
}
