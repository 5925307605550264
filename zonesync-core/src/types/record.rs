//! Declared DNS record model and per-field validation.

use serde::{Deserialize, Serialize};
use zonesync_authority::{RecordData, RecordType};

use crate::error::{CoreError, CoreResult};

/// Minimum TTL accepted anywhere, in seconds.
pub const MIN_TTL: u32 = 60;

/// CAA property tags the model accepts.
pub const CAA_TAGS: [&str; 3] = ["issue", "issuewild", "iodef"];

/// Tunable validation limits.
#[derive(Debug, Clone)]
pub struct RecordLimits {
    /// Maximum length of a logical TXT value, before wire chunking.
    pub txt_value_cap: usize,
}

impl Default for RecordLimits {
    fn default() -> Self {
        Self {
            txt_value_cap: 4096,
        }
    }
}

/// Single DNS record declared for a zone.
///
/// This is desired state: it comes from configuration, never from the
/// wire, and a missing TTL means "use the owning zone's default". The
/// observed counterpart is `ObservedRecord`, which always carries the TTL
/// the server published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Relative record label (`@` for the zone apex).
    pub label: String,
    /// TTL in seconds; `None` inherits the zone default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Type-specific record data.
    pub data: RecordData,
}

impl Record {
    /// Construct a record, validating every field.
    pub fn new(
        label: impl Into<String>,
        data: RecordData,
        ttl: Option<u32>,
    ) -> CoreResult<Self> {
        let record = Self {
            label: label.into(),
            ttl,
            data,
        };
        record.validate()?;
        Ok(record)
    }

    /// True when the record applies to the zone apex.
    #[must_use]
    pub fn is_apex(&self) -> bool {
        self.label == "@"
    }

    /// The record's type discriminant.
    #[must_use]
    pub const fn record_type(&self) -> RecordType {
        self.data.record_type()
    }

    /// Validate with default limits.
    pub fn validate(&self) -> CoreResult<()> {
        self.validate_with(&RecordLimits::default())
    }

    /// Validate every field against syntax and range rules.
    ///
    /// Deserialized records must be re-validated before use; serde only
    /// guarantees shape, not semantics.
    pub fn validate_with(&self, limits: &RecordLimits) -> CoreResult<()> {
        validate_label(&self.label)?;

        if let Some(ttl) = self.ttl {
            validate_ttl(ttl)?;
        }

        match &self.data {
            RecordData::A { .. } | RecordData::AAAA { .. } => Ok(()),
            RecordData::CNAME { target } => {
                if self.is_apex() {
                    return Err(CoreError::validation(
                        "label",
                        "CNAME is not allowed at the zone apex",
                    ));
                }
                validate_host_value("target", target)
            }
            RecordData::MX { exchange, .. } => validate_host_value("exchange", exchange),
            RecordData::NS { nameserver } => validate_host_value("nameserver", nameserver),
            RecordData::TXT { text } => {
                if text.len() > limits.txt_value_cap {
                    return Err(CoreError::validation(
                        "text",
                        format!(
                            "TXT value is {} bytes, exceeding the cap of {}",
                            text.len(),
                            limits.txt_value_cap
                        ),
                    ));
                }
                Ok(())
            }
            RecordData::SRV { port, target, .. } => {
                if *port == 0 {
                    return Err(CoreError::validation(
                        "port",
                        "port must be between 1 and 65535",
                    ));
                }
                validate_host_value("target", target)
            }
            RecordData::CAA { flags, tag, value } => {
                if !CAA_TAGS.contains(&tag.to_ascii_lowercase().as_str()) {
                    return Err(CoreError::validation(
                        "tag",
                        format!("CAA tag '{tag}' is not one of issue, issuewild, iodef"),
                    ));
                }
                if *flags != 0 && *flags != 128 {
                    return Err(CoreError::validation(
                        "flags",
                        format!("CAA flags must be 0 or 128, got {flags}"),
                    ));
                }
                if value.is_empty() {
                    return Err(CoreError::validation("value", "CAA value must not be empty"));
                }
                Ok(())
            }
        }
    }
}

/// Validate a TTL against the floor.
pub fn validate_ttl(ttl: u32) -> CoreResult<()> {
    if ttl < MIN_TTL {
        return Err(CoreError::validation(
            "ttl",
            format!("TTL {ttl} is below the minimum of {MIN_TTL} seconds"),
        ));
    }
    Ok(())
}

/// Validate a relative record label.
///
/// `@` denotes the apex. Anything else is one or more dot-separated
/// segments of 1–63 ASCII `[A-Za-z0-9_-]` characters with no leading or
/// trailing hyphen. Underscores stay legal for SRV service labels such as
/// `_sip._tcp`.
pub fn validate_label(label: &str) -> CoreResult<()> {
    if label == "@" {
        return Ok(());
    }
    if label.is_empty() {
        return Err(CoreError::validation("label", "label must not be empty"));
    }
    for segment in label.split('.') {
        if segment.is_empty() {
            return Err(CoreError::validation(
                "label",
                format!("label '{label}' contains an empty segment"),
            ));
        }
        if segment.len() > 63 {
            return Err(CoreError::validation(
                "label",
                format!("label segment '{segment}' exceeds 63 characters"),
            ));
        }
        if segment.starts_with('-') || segment.ends_with('-') {
            return Err(CoreError::validation(
                "label",
                format!("label segment '{segment}' must not start or end with a hyphen"),
            ));
        }
        if !segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(CoreError::validation(
                "label",
                format!("label segment '{segment}' contains characters outside [A-Za-z0-9_-]"),
            ));
        }
    }
    Ok(())
}

/// Validate a hostname-valued rdata field (`@` means the zone apex).
fn validate_host_value(field: &str, value: &str) -> CoreResult<()> {
    if value.is_empty() {
        return Err(CoreError::validation(
            field,
            format!("{field} must not be empty"),
        ));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(CoreError::validation(
            field,
            format!("{field} must not contain whitespace"),
        ));
    }
    Ok(())
}
