//! Update plan types and wire-script rendering.

use serde::{Deserialize, Serialize};
use zonesync_authority::RecordType;

/// One primitive operation inside an update transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum UpdateStep {
    /// Remove a record (or, with no rdata, the whole RRset) at a name.
    #[serde(rename_all = "camelCase")]
    Delete {
        /// Absolute record name.
        fqdn: String,
        /// RRset type.
        record_type: RecordType,
        /// Specific rdata to remove; `None` removes every record of the
        /// type (used only for singleton types).
        #[serde(skip_serializing_if = "Option::is_none")]
        rdata: Option<String>,
    },
    /// Add one record at a name.
    #[serde(rename_all = "camelCase")]
    Add {
        /// Absolute record name.
        fqdn: String,
        /// TTL in seconds.
        ttl: u32,
        /// RRset type.
        record_type: RecordType,
        /// Wire-format rdata.
        rdata: String,
    },
}

impl UpdateStep {
    /// Render the step as one `nsupdate` script line.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Delete {
                fqdn,
                record_type,
                rdata: Some(rdata),
            } => format!("update delete {fqdn} {record_type} {rdata}"),
            Self::Delete {
                fqdn,
                record_type,
                rdata: None,
            } => format!("update delete {fqdn} {record_type}"),
            Self::Add {
                fqdn,
                ttl,
                record_type,
                rdata,
            } => format!("update add {fqdn} {ttl} {record_type} {rdata}"),
        }
    }
}

/// An ordered, atomic sequence of update primitives for one zone.
///
/// Consumed exactly once: a plan is rendered and submitted as a single
/// transaction, and is never reused across zones or resubmitted after a
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlan {
    /// Zone the plan applies to.
    pub zone_name: String,
    /// Authoritative server the transaction targets.
    pub server: String,
    /// Primitives in submission order.
    pub steps: Vec<UpdateStep>,
}

impl UpdatePlan {
    /// Whether the plan contains no work.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of primitives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Render the full transaction as an `nsupdate` script.
    ///
    /// Line-oriented: `server`, `zone`, one line per primitive, `send`.
    /// Rendering is deterministic; identical plans produce identical
    /// bytes.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.steps.len() + 3);
        lines.push(format!("server {}", self.server));
        lines.push(format!("zone {}", self.zone_name));
        for step in &self.steps {
            lines.push(step.render());
        }
        lines.push("send".to_string());
        let mut script = lines.join("\n");
        script.push('\n');
        script
    }
}
