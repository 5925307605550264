//! Observed-state types read back from the live server.

use serde::{Deserialize, Serialize};
use zonesync_authority::{RecordAnswer, RecordData, RecordType};

/// A record as currently published by the live server.
///
/// Deliberately a different type from the declared `Record`: observed data
/// always carries the TTL the server returned, and none of the declared-
/// side defaulting or validation ever applies to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedRecord {
    /// Relative label the answer belongs to (`@` for the apex).
    pub label: String,
    /// TTL the server published, in seconds.
    pub ttl: u32,
    /// Type-specific record data.
    pub data: RecordData,
}

impl ObservedRecord {
    /// Attach the queried label to a wire answer.
    #[must_use]
    pub fn from_answer(label: impl Into<String>, answer: RecordAnswer) -> Self {
        Self {
            label: label.into(),
            ttl: answer.ttl,
            data: answer.data,
        }
    }

    /// The record's type discriminant.
    #[must_use]
    pub const fn record_type(&self) -> RecordType {
        self.data.record_type()
    }
}

/// A non-fatal state-query failure for one label/type.
///
/// Warnings ride along with whatever diff was computable from the labels
/// that did resolve; they never abort a zone query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryWarning {
    /// Label whose lookup failed.
    pub label: String,
    /// Record type that was being queried.
    pub record_type: RecordType,
    /// What went wrong.
    pub detail: String,
}

impl std::fmt::Display for QueryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.label, self.record_type, self.detail)
    }
}

/// Everything a state query produced for one zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedState {
    /// Records currently published at the zone's managed labels.
    pub records: Vec<ObservedRecord>,
    /// Labels/types that could not be queried.
    pub warnings: Vec<QueryWarning>,
}
