//! Zone model and zone-wide invariants.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use zonesync_authority::RecordType;

use crate::error::{CoreError, CoreResult};
use crate::types::record::{validate_label, validate_ttl, Record, RecordLimits};

/// Default TTL applied to records that do not set one, in seconds.
pub const DEFAULT_ZONE_TTL: u32 = 3600;

const fn default_zone_ttl() -> u32 {
    DEFAULT_ZONE_TTL
}

/// A DNS zone managed through transactional updates.
///
/// Holds the declared record set together with the server and key needed
/// to publish it. A zone value is never mutated in place by the core; any
/// edit produces a new value that is re-validated before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// FQDN of the zone (`example.com`).
    pub name: String,
    /// Authoritative name server to query and update.
    pub server: String,
    /// Path to the TSIG key file handed to the update client.
    pub key_file: PathBuf,
    /// Human friendly metadata about the zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Default TTL for records that do not set one.
    #[serde(default = "default_zone_ttl")]
    pub default_ttl: u32,
    /// Declared records.
    #[serde(default)]
    pub records: Vec<Record>,
}

impl Zone {
    /// Validate with default limits.
    pub fn validate(&self) -> CoreResult<()> {
        self.validate_with(&RecordLimits::default())
    }

    /// Validate the zone's own fields, every record, and the zone-wide
    /// invariants no single record can see.
    ///
    /// Zone-wide rules: at most one CNAME per label, and a label carrying
    /// a CNAME carries nothing else.
    pub fn validate_with(&self, limits: &RecordLimits) -> CoreResult<()> {
        if self.name.trim_end_matches('.').is_empty() {
            return Err(CoreError::validation("name", "zone name must not be empty"));
        }
        validate_label(self.name.trim_end_matches('.'))
            .map_err(|_| CoreError::validation("name", format!("'{}' is not a valid zone name", self.name)))?;
        if self.server.is_empty() {
            return Err(CoreError::validation("server", "server must not be empty"));
        }
        validate_ttl(self.default_ttl)?;

        for record in &self.records {
            record.validate_with(limits)?;
        }

        // label -> types declared at that label
        let mut types_by_label: BTreeMap<String, BTreeSet<RecordType>> = BTreeMap::new();
        let mut cname_labels: BTreeSet<String> = BTreeSet::new();
        for record in &self.records {
            let label = record.label.to_ascii_lowercase();
            let record_type = record.record_type();
            if record_type == RecordType::Cname && !cname_labels.insert(label.clone()) {
                return Err(CoreError::validation(
                    "records",
                    format!("label '{}' declares more than one CNAME", record.label),
                ));
            }
            types_by_label.entry(label).or_default().insert(record_type);
        }
        for label in &cname_labels {
            let types = &types_by_label[label];
            if let Some(other) = types.iter().find(|t| **t != RecordType::Cname) {
                return Err(CoreError::validation(
                    "records",
                    format!("label '{label}' declares a CNAME alongside {other} records"),
                ));
            }
        }

        Ok(())
    }

    /// The zone apex as a bare lowercase name, no trailing dot.
    #[must_use]
    pub fn apex_name(&self) -> String {
        self.name.trim_end_matches('.').to_ascii_lowercase()
    }

    /// Absolute name for a record label, with the trailing dot.
    #[must_use]
    pub fn fqdn(&self, label: &str) -> String {
        let apex = self.apex_name();
        if label == "@" {
            format!("{apex}.")
        } else {
            format!("{}.{apex}.", label.to_ascii_lowercase())
        }
    }

    /// The distinct labels the zone declares records for.
    ///
    /// These are the managed labels: state queries enumerate exactly this
    /// set, and records observed at any other label are left alone.
    #[must_use]
    pub fn managed_labels(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .map(|r| r.label.to_ascii_lowercase())
            .collect()
    }

    /// The declared records with TTLs resolved and rdata normalized.
    ///
    /// Every returned record has a concrete TTL (the zone default where
    /// unset), a lowercase label, and hostname rdata in comparison form
    /// (`@` expanded, trailing dots stripped). Diffing always operates on
    /// this form, never on the raw declaration.
    #[must_use]
    pub fn resolved_records(&self) -> Vec<Record> {
        let apex = self.apex_name();
        self.records
            .iter()
            .map(|r| Record {
                label: r.label.to_ascii_lowercase(),
                ttl: Some(r.ttl.unwrap_or(self.default_ttl)),
                data: r.data.normalized(&apex),
            })
            .collect()
    }
}
