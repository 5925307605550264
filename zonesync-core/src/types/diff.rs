//! Diff result types.

use serde::{Deserialize, Serialize};

use crate::types::observed::{ObservedRecord, QueryWarning};
use crate::types::record::Record;

/// A desired/observed pair that differs in value or TTL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    /// The record as declared (TTL-resolved).
    pub desired: Record,
    /// The record as currently published.
    pub observed: ObservedRecord,
}

/// Per-action change counts for one zone diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    /// Records to create.
    pub create: usize,
    /// Records to update in place.
    pub update: usize,
    /// Records to delete.
    pub delete: usize,
    /// Records already in sync.
    pub unchanged: usize,
}

impl std::fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete, {} unchanged",
            self.create, self.update, self.delete, self.unchanged
        )
    }
}

/// The difference between a zone's declared records and the records its
/// authoritative server currently publishes.
///
/// The three change lists are disjoint and sorted by
/// `(label, type, value)`, so diffing identical inputs twice yields
/// byte-identical plans downstream. Produced fresh per reconciliation and
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDiff {
    /// Zone the diff belongs to.
    pub zone_name: String,
    /// Declared but not published.
    pub to_create: Vec<Record>,
    /// Published with a different value or TTL.
    pub to_update: Vec<RecordUpdate>,
    /// Published at a managed label but no longer declared.
    pub to_delete: Vec<ObservedRecord>,
    /// Records that already match.
    pub unchanged: usize,
    /// Labels/types the state query could not resolve.
    pub warnings: Vec<QueryWarning>,
}

impl ZoneDiff {
    /// Whether any change is needed.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.to_create.is_empty() || !self.to_update.is_empty() || !self.to_delete.is_empty()
    }

    /// Change counts by action.
    #[must_use]
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            create: self.to_create.len(),
            update: self.to_update.len(),
            delete: self.to_delete.len(),
            unchanged: self.unchanged,
        }
    }
}
