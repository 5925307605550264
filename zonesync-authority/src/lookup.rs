//! Record lookups against the zone's authoritative server.

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use hickory_resolver::proto::rr::{RData, RecordType as WireRecordType};

use crate::error::{AuthorityError, Result};
use crate::resolver::{build_resolver_for_ns, resolve_server_ip};
use crate::traits::RecordLookup;
use crate::types::{RecordAnswer, RecordData, RecordType};

/// [`RecordLookup`] implementation backed by hickory-resolver.
///
/// Each query builds a resolver pinned to the zone's advertised server so
/// the answers reflect what that server publishes right now, bypassing
/// recursive caches.
#[derive(Debug, Default, Clone)]
pub struct HickoryLookup;

impl HickoryLookup {
    /// Create a new lookup client.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RecordLookup for HickoryLookup {
    async fn query(
        &self,
        server: &str,
        fqdn: &str,
        record_type: RecordType,
    ) -> Result<Vec<RecordAnswer>> {
        let ns_ip = resolve_server_ip(server).await?;
        let resolver = build_resolver_for_ns(ns_ip);
        query_rrset(&resolver, fqdn, record_type).await
    }
}

async fn query_rrset(
    resolver: &TokioResolver,
    fqdn: &str,
    record_type: RecordType,
) -> Result<Vec<RecordAnswer>> {
    let response = match resolver.lookup(fqdn, to_wire_type(record_type)).await {
        Ok(response) => response,
        Err(e) if e.is_no_records_found() || e.is_nx_domain() => return Ok(Vec::new()),
        Err(e) => {
            return Err(AuthorityError::Network {
                detail: format!("{record_type} lookup for {fqdn} failed: {e}"),
            });
        }
    };

    let mut answers = Vec::new();
    for record in response.record_iter() {
        // The resolver may return other types alongside the requested
        // RRset (e.g. the CNAME a query was chased through); keep only
        // answers of the requested type.
        if let Some(data) = parse_rdata(record_type, record.data()) {
            answers.push(RecordAnswer {
                ttl: record.ttl(),
                data,
            });
        }
    }
    Ok(answers)
}

const fn to_wire_type(record_type: RecordType) -> WireRecordType {
    match record_type {
        RecordType::A => WireRecordType::A,
        RecordType::Aaaa => WireRecordType::AAAA,
        RecordType::Cname => WireRecordType::CNAME,
        RecordType::Mx => WireRecordType::MX,
        RecordType::Txt => WireRecordType::TXT,
        RecordType::Ns => WireRecordType::NS,
        RecordType::Srv => WireRecordType::SRV,
        RecordType::Caa => WireRecordType::CAA,
    }
}

/// Convert one wire answer into typed record data.
///
/// Hostname-valued answers are lowercased with the trailing dot stripped,
/// and TXT character-strings are concatenated into the logical text, so
/// observed data compares cleanly against declared data.
fn parse_rdata(record_type: RecordType, rdata: &RData) -> Option<RecordData> {
    match (record_type, rdata) {
        (RecordType::A, RData::A(a)) => Some(RecordData::A { address: a.0 }),
        (RecordType::Aaaa, RData::AAAA(aaaa)) => Some(RecordData::AAAA { address: aaaa.0 }),
        (RecordType::Cname, RData::CNAME(cname)) => Some(RecordData::CNAME {
            target: host_text(&cname.0.to_string()),
        }),
        (RecordType::Mx, RData::MX(mx)) => Some(RecordData::MX {
            priority: mx.preference(),
            exchange: host_text(&mx.exchange().to_string()),
        }),
        (RecordType::Txt, RData::TXT(txt)) => {
            let text: String = txt
                .iter()
                .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
                .collect();
            Some(RecordData::TXT { text })
        }
        (RecordType::Ns, RData::NS(ns)) => Some(RecordData::NS {
            nameserver: host_text(&ns.0.to_string()),
        }),
        (RecordType::Srv, RData::SRV(srv)) => Some(RecordData::SRV {
            priority: srv.priority(),
            weight: srv.weight(),
            port: srv.port(),
            target: host_text(&srv.target().to_string()),
        }),
        (RecordType::Caa, RData::CAA(caa)) => Some(RecordData::CAA {
            flags: if caa.issuer_critical() { 128 } else { 0 },
            tag: caa.tag().as_str().to_ascii_lowercase(),
            value: String::from_utf8_lossy(caa.raw_value()).into_owned(),
        }),
        _ => None,
    }
}

fn host_text(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}
