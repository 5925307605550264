use std::net::{Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

/// DNS record type identifier.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Name server record.
    Ns,
    /// Service locator record.
    Srv,
    /// Certificate Authority Authorization record.
    Caa,
}

impl RecordType {
    /// Every record type a label can carry.
    ///
    /// State queries sweep all of these, even when the declared zone only
    /// uses some of them, so that stale records of other types are visible.
    pub const ALL: [Self; 8] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Mx,
        Self::Txt,
        Self::Ns,
        Self::Srv,
        Self::Caa,
    ];

    /// The uppercase presentation name of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
        }
    }

    /// Whether at most one record of this type may exist per label.
    #[must_use]
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::Cname)
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-safe representation of DNS record data.
///
/// Each variant carries the fields specific to that record type, so illegal
/// field combinations are unrepresentable. Use
/// [`record_type()`](Self::record_type) to get the [`RecordType`]
/// discriminant, or [`rdata_text()`](Self::rdata_text) for the canonical
/// presentation-format rdata.
///
/// IPv4/IPv6 addresses are `std::net` values: only canonical textual forms
/// parse (an IPv4 octet with a leading zero is rejected, never normalized).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum RecordData {
    /// A record — maps a hostname to an IPv4 address.
    A {
        /// IPv4 address (e.g., `1.2.3.4`).
        address: Ipv4Addr,
    },

    /// AAAA record — maps a hostname to an IPv6 address.
    AAAA {
        /// IPv6 address (e.g., `2001:db8::1`).
        address: Ipv6Addr,
    },

    /// CNAME record — alias from one name to another.
    CNAME {
        /// Target hostname (`@` refers to the zone apex).
        target: String,
    },

    /// MX record — mail exchange server.
    MX {
        /// Priority (lower = preferred).
        priority: u16,
        /// Mail server hostname.
        exchange: String,
    },

    /// TXT record — arbitrary text data.
    ///
    /// Holds the logical, unsplit string; splitting into 255-byte wire
    /// chunks happens when an update script is rendered.
    TXT {
        /// Text content.
        text: String,
    },

    /// NS record — authoritative name server.
    NS {
        /// Name server hostname.
        nameserver: String,
    },

    /// SRV record — service locator.
    SRV {
        /// Priority (lower = preferred).
        priority: u16,
        /// Weight for load balancing among same-priority targets.
        weight: u16,
        /// TCP/UDP port number.
        port: u16,
        /// Target hostname providing the service.
        target: String,
    },

    /// CAA record — Certificate Authority Authorization.
    CAA {
        /// Issuer critical flag (0 or 128).
        flags: u8,
        /// Property tag (`"issue"`, `"issuewild"`, or `"iodef"`).
        tag: String,
        /// CA domain or reporting URI.
        value: String,
    },
}

impl RecordData {
    /// Returns the [`RecordType`] discriminant for this record data.
    #[must_use]
    pub const fn record_type(&self) -> RecordType {
        match self {
            Self::A { .. } => RecordType::A,
            Self::AAAA { .. } => RecordType::Aaaa,
            Self::CNAME { .. } => RecordType::Cname,
            Self::MX { .. } => RecordType::Mx,
            Self::TXT { .. } => RecordType::Txt,
            Self::NS { .. } => RecordType::Ns,
            Self::SRV { .. } => RecordType::Srv,
            Self::CAA { .. } => RecordType::Caa,
        }
    }

    /// Returns the primary display value for this record (e.g., the IP
    /// address for A/AAAA, the target for CNAME/SRV, the exchange for MX).
    #[must_use]
    pub fn display_value(&self) -> String {
        match self {
            Self::A { address } => address.to_string(),
            Self::AAAA { address } => address.to_string(),
            Self::CNAME { target } | Self::SRV { target, .. } => target.clone(),
            Self::MX { exchange, .. } => exchange.clone(),
            Self::TXT { text } => text.clone(),
            Self::NS { nameserver } => nameserver.clone(),
            Self::CAA { value, .. } => value.clone(),
        }
    }

    /// Canonical presentation-format rdata.
    ///
    /// Embeds every comparison-relevant field (MX priority, SRV
    /// priority/weight/port, the full CAA triple), so two records are
    /// equivalent under diffing exactly when their rdata text matches.
    #[must_use]
    pub fn rdata_text(&self) -> String {
        match self {
            Self::A { address } => address.to_string(),
            Self::AAAA { address } => address.to_string(),
            Self::CNAME { target } => target.clone(),
            Self::MX { priority, exchange } => format!("{priority} {exchange}"),
            Self::TXT { text } => text.clone(),
            Self::NS { nameserver } => nameserver.clone(),
            Self::SRV {
                priority,
                weight,
                port,
                target,
            } => format!("{priority} {weight} {port} {target}"),
            Self::CAA { flags, tag, value } => format!("{flags} {tag} \"{value}\""),
        }
    }

    /// Returns a normalized copy suitable for comparison.
    ///
    /// Hostname-valued fields are lowercased, stripped of their trailing
    /// dot, and `@` targets are expanded to `zone_apex`. Addresses and text
    /// payloads are left untouched.
    #[must_use]
    pub fn normalized(&self, zone_apex: &str) -> Self {
        let host = |name: &str| normalize_host(name, zone_apex);
        match self {
            Self::A { .. } | Self::AAAA { .. } | Self::TXT { .. } => self.clone(),
            Self::CNAME { target } => Self::CNAME {
                target: host(target),
            },
            Self::MX { priority, exchange } => Self::MX {
                priority: *priority,
                exchange: host(exchange),
            },
            Self::NS { nameserver } => Self::NS {
                nameserver: host(nameserver),
            },
            Self::SRV {
                priority,
                weight,
                port,
                target,
            } => Self::SRV {
                priority: *priority,
                weight: *weight,
                port: *port,
                target: host(target),
            },
            Self::CAA { flags, tag, value } => Self::CAA {
                flags: *flags,
                tag: tag.to_ascii_lowercase(),
                value: value.clone(),
            },
        }
    }
}

/// Normalize a hostname-valued field: lowercase, trailing dot stripped,
/// `@` expanded to the zone apex.
fn normalize_host(name: &str, zone_apex: &str) -> String {
    if name == "@" {
        return zone_apex.trim_end_matches('.').to_ascii_lowercase();
    }
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// A single answer read back from the wire for one query.
///
/// Unlike a declared record, an answer always carries the TTL the server
/// published. The owning label is attached by the caller, which knows which
/// relative name was queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAnswer {
    /// Published time to live in seconds.
    pub ttl: u32,
    /// Type-specific record data.
    pub data: RecordData,
}
