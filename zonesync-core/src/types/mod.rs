//! Core type definitions: declared and observed record models, diffs,
//! and update plans.

mod diff;
mod observed;
mod plan;
mod record;
mod zone;

pub use diff::{DiffSummary, RecordUpdate, ZoneDiff};
pub use observed::{ObservedRecord, ObservedState, QueryWarning};
pub use plan::{UpdatePlan, UpdateStep};
pub use record::{Record, RecordLimits, CAA_TAGS, MIN_TTL};
pub use zone::{Zone, DEFAULT_ZONE_TTL};

// Re-export the wire-facing types; most callers need them together with
// the models above.
pub use zonesync_authority::{RecordAnswer, RecordData, RecordType};
