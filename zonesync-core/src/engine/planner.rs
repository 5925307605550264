//! Pure translation of a diff into an ordered update plan.

use std::collections::BTreeMap;

use zonesync_authority::{RecordData, RecordType};

use crate::error::{CoreError, CoreResult};
use crate::types::{ObservedRecord, Record, UpdatePlan, UpdateStep, Zone, ZoneDiff};

/// Maximum bytes per TXT character-string on the wire.
pub const TXT_CHUNK_LEN: usize = 255;

/// Build the update transaction for a diff.
///
/// Pure: the plan is fully determined by its inputs. Step order is fixed:
/// every standalone delete, then every update as a delete immediately
/// followed by its paired add, then every create. Delete-before-add is
/// mandatory — the server applies operations in script order, and an
/// add-before-delete would leave a stale record behind on a multi-value
/// type or momentarily duplicate a singleton.
///
/// Fails with [`CoreError::Planning`] when the adds it is about to emit
/// violate CNAME exclusivity; a diff can only look like that when an
/// invalid zone slipped past validation, so the zone's reconciliation
/// halts rather than submitting a transaction the server may accept.
pub fn build_plan(zone: &Zone, diff: &ZoneDiff) -> CoreResult<UpdatePlan> {
    let mut steps =
        Vec::with_capacity(diff.to_delete.len() + 2 * diff.to_update.len() + diff.to_create.len());

    for observed in &diff.to_delete {
        steps.push(delete_step(zone, observed));
    }
    for update in &diff.to_update {
        steps.push(delete_step(zone, &update.observed));
        steps.push(add_step(zone, &update.desired));
    }
    for record in &diff.to_create {
        steps.push(add_step(zone, record));
    }

    check_cname_exclusive_adds(&steps)?;

    Ok(UpdatePlan {
        zone_name: zone.apex_name(),
        server: zone.server.clone(),
        steps,
    })
}

/// Delete one observed record.
///
/// Multi-value deletes are rdata-qualified so sibling records at the same
/// name survive; a CNAME delete drops the whole RRset, which the singleton
/// invariant makes equivalent.
fn delete_step(zone: &Zone, observed: &ObservedRecord) -> UpdateStep {
    let record_type = observed.record_type();
    UpdateStep::Delete {
        fqdn: zone.fqdn(&observed.label),
        record_type,
        rdata: if record_type.is_singleton() {
            None
        } else {
            Some(wire_rdata(&observed.data))
        },
    }
}

fn add_step(zone: &Zone, record: &Record) -> UpdateStep {
    UpdateStep::Add {
        fqdn: zone.fqdn(&record.label),
        ttl: record.ttl.unwrap_or(zone.default_ttl),
        record_type: record.record_type(),
        rdata: wire_rdata(&record.data),
    }
}

/// Render rdata in the form the update script needs.
///
/// Hostnames are emitted absolute (trailing dot) so the server never
/// re-qualifies them against the zone; TXT text is split into quoted
/// 255-byte chunks; CAA stays the `flags tag "value"` triple.
fn wire_rdata(data: &RecordData) -> String {
    match data {
        RecordData::A { address } => address.to_string(),
        RecordData::AAAA { address } => address.to_string(),
        RecordData::CNAME { target } => absolute(target),
        RecordData::NS { nameserver } => absolute(nameserver),
        RecordData::MX { priority, exchange } => format!("{priority} {}", absolute(exchange)),
        RecordData::SRV {
            priority,
            weight,
            port,
            target,
        } => format!("{priority} {weight} {port} {}", absolute(target)),
        RecordData::TXT { text } => quote_txt_value(text),
        RecordData::CAA { flags, tag, value } => {
            format!("{flags} {tag} \"{}\"", escape_quoted(value))
        }
    }
}

fn absolute(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a TXT value for the wire.
///
/// Values longer than one character-string allows are split into multiple
/// quoted chunks, which the server concatenates back into one value. The
/// split respects UTF-8 boundaries and happens after escaping, so no chunk
/// exceeds the wire limit.
fn quote_txt_value(text: &str) -> String {
    let escaped = escape_quoted(text);
    if escaped.len() <= TXT_CHUNK_LEN {
        return format!("\"{escaped}\"");
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in escaped.chars() {
        if current.len() + ch.len_utf8() > TXT_CHUNK_LEN {
            chunks.push(format!("\"{current}\""));
            current = String::new();
        }
        current.push(ch);
    }
    if !current.is_empty() {
        chunks.push(format!("\"{current}\""));
    }
    chunks.join(" ")
}

/// CNAME exclusivity over the adds about to be emitted.
fn check_cname_exclusive_adds(steps: &[UpdateStep]) -> CoreResult<()> {
    let mut adds_by_fqdn: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for step in steps {
        if let UpdateStep::Add {
            fqdn, record_type, ..
        } = step
        {
            let entry = adds_by_fqdn.entry(fqdn).or_default();
            if *record_type == RecordType::Cname {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }
    for (fqdn, (cnames, others)) in adds_by_fqdn {
        if cnames > 1 || (cnames > 0 && others > 0) {
            return Err(CoreError::Planning(format!(
                "plan would add a CNAME alongside other records at {fqdn}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::engine::diff::diff_zone;
    use std::path::PathBuf;

    fn zone_with(records: Vec<Record>) -> Zone {
        Zone {
            name: "example.com".into(),
            server: "ns1.example.com".into(),
            key_file: PathBuf::from("/etc/nsupdate/example.com.key"),
            notes: None,
            default_ttl: 3600,
            records,
        }
    }

    fn a_declared(label: &str, address: &str, ttl: Option<u32>) -> Record {
        Record {
            label: label.into(),
            ttl,
            data: RecordData::A {
                address: address.parse().unwrap(),
            },
        }
    }

    fn a_observed(label: &str, address: &str, ttl: u32) -> ObservedRecord {
        ObservedRecord {
            label: label.into(),
            ttl,
            data: RecordData::A {
                address: address.parse().unwrap(),
            },
        }
    }

    #[test]
    fn update_pair_renders_delete_then_add() {
        // Desired @ A 198.51.100.10/600, observed @ A 192.0.2.1/300.
        let zone = zone_with(vec![a_declared("@", "198.51.100.10", Some(600))]);
        let observed = vec![a_observed("@", "192.0.2.1", 300)];
        let plan = build_plan(&zone, &diff_zone(&zone, &observed)).unwrap();

        assert_eq!(
            plan.steps,
            vec![
                UpdateStep::Delete {
                    fqdn: "example.com.".into(),
                    record_type: RecordType::A,
                    rdata: Some("192.0.2.1".into()),
                },
                UpdateStep::Add {
                    fqdn: "example.com.".into(),
                    ttl: 600,
                    record_type: RecordType::A,
                    rdata: "198.51.100.10".into(),
                },
            ]
        );
    }

    #[test]
    fn orphaned_record_renders_one_delete() {
        let zone = zone_with(vec![]);
        let observed = vec![a_observed("old", "198.51.100.100", 300)];
        let plan = build_plan(&zone, &diff_zone(&zone, &observed)).unwrap();
        assert_eq!(
            plan.steps,
            vec![UpdateStep::Delete {
                fqdn: "old.example.com.".into(),
                record_type: RecordType::A,
                rdata: Some("198.51.100.100".into()),
            }]
        );
    }

    #[test]
    fn every_update_delete_precedes_its_add() {
        let zone = zone_with(vec![
            a_declared("www", "192.0.2.10", Some(300)),
            a_declared("mail", "192.0.2.11", Some(300)),
        ]);
        let observed = vec![
            a_observed("www", "192.0.2.1", 300),
            a_observed("mail", "192.0.2.2", 300),
        ];
        let plan = build_plan(&zone, &diff_zone(&zone, &observed)).unwrap();

        for (i, step) in plan.steps.iter().enumerate() {
            if let UpdateStep::Add { fqdn, .. } = step {
                let delete_index = plan
                    .steps
                    .iter()
                    .position(|s| matches!(s, UpdateStep::Delete { fqdn: d, .. } if d == fqdn))
                    .unwrap();
                assert!(delete_index < i, "delete for {fqdn} must precede its add");
            }
        }
    }

    #[test]
    fn plans_are_byte_identical_across_runs() {
        let zone = zone_with(vec![
            a_declared("www", "192.0.2.1", None),
            a_declared("mail", "198.51.100.20", Some(300)),
            Record {
                label: "@".into(),
                ttl: None,
                data: RecordData::MX {
                    priority: 10,
                    exchange: "mail.example.com".into(),
                },
            },
        ]);
        let observed = vec![a_observed("www", "192.0.2.7", 600)];
        let first = build_plan(&zone, &diff_zone(&zone, &observed)).unwrap();
        let second = build_plan(&zone, &diff_zone(&zone, &observed)).unwrap();
        assert_eq!(first.render(), second.render());
    }

    #[test]
    fn cname_delete_drops_the_rrset() {
        let zone = zone_with(vec![a_declared("www", "192.0.2.1", None)]);
        let observed = vec![ObservedRecord {
            label: "www".into(),
            ttl: 300,
            data: RecordData::CNAME {
                target: "example.net".into(),
            },
        }];
        let plan = build_plan(&zone, &diff_zone(&zone, &observed)).unwrap();
        assert!(plan.steps.contains(&UpdateStep::Delete {
            fqdn: "www.example.com.".into(),
            record_type: RecordType::Cname,
            rdata: None,
        }));
    }

    #[test]
    fn hostname_rdata_is_absolute() {
        let zone = zone_with(vec![Record {
            label: "@".into(),
            ttl: Some(3600),
            data: RecordData::MX {
                priority: 10,
                exchange: "mail.example.com".into(),
            },
        }]);
        let plan = build_plan(&zone, &diff_zone(&zone, &[])).unwrap();
        assert_eq!(
            plan.steps[0],
            UpdateStep::Add {
                fqdn: "example.com.".into(),
                ttl: 3600,
                record_type: RecordType::Mx,
                rdata: "10 mail.example.com.".into(),
            }
        );
    }

    #[test]
    fn srv_rdata_carries_all_fields() {
        let zone = zone_with(vec![Record {
            label: "_sip._tcp".into(),
            ttl: Some(300),
            data: RecordData::SRV {
                priority: 0,
                weight: 5,
                port: 5060,
                target: "sip.example.com".into(),
            },
        }]);
        let plan = build_plan(&zone, &diff_zone(&zone, &[])).unwrap();
        assert_eq!(
            plan.steps[0],
            UpdateStep::Add {
                fqdn: "_sip._tcp.example.com.".into(),
                ttl: 300,
                record_type: RecordType::Srv,
                rdata: "0 5 5060 sip.example.com.".into(),
            }
        );
    }

    #[test]
    fn short_txt_is_quoted_once() {
        assert_eq!(quote_txt_value("v=spf1 -all"), "\"v=spf1 -all\"");
    }

    #[test]
    fn long_txt_is_chunked() {
        let text = "a".repeat(600);
        let quoted = quote_txt_value(&text);
        let chunks: Vec<&str> = quoted.split(' ').collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), TXT_CHUNK_LEN + 2);
        assert_eq!(chunks[1].len(), TXT_CHUNK_LEN + 2);
        assert_eq!(chunks[2].len(), 600 - 2 * TXT_CHUNK_LEN + 2);
        for chunk in chunks {
            assert!(chunk.starts_with('"') && chunk.ends_with('"'));
        }
    }

    #[test]
    fn txt_quotes_are_escaped() {
        assert_eq!(quote_txt_value("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn caa_value_is_quoted_verbatim() {
        let zone = zone_with(vec![Record {
            label: "@".into(),
            ttl: Some(3600),
            data: RecordData::CAA {
                flags: 0,
                tag: "issue".into(),
                value: "letsencrypt.org".into(),
            },
        }]);
        let plan = build_plan(&zone, &diff_zone(&zone, &[])).unwrap();
        assert_eq!(
            plan.steps[0],
            UpdateStep::Add {
                fqdn: "example.com.".into(),
                ttl: 3600,
                record_type: RecordType::Caa,
                rdata: "0 issue \"letsencrypt.org\"".into(),
            }
        );
    }

    #[test]
    fn conflicting_adds_fail_planning() {
        // Hand-built diff that zone validation would have rejected.
        let zone = zone_with(vec![]);
        let diff = ZoneDiff {
            zone_name: "example.com".into(),
            to_create: vec![
                Record {
                    label: "www".into(),
                    ttl: Some(300),
                    data: RecordData::CNAME {
                        target: "example.net".into(),
                    },
                },
                a_declared("www", "192.0.2.1", Some(300)),
            ],
            ..ZoneDiff::default()
        };
        let err = build_plan(&zone, &diff).unwrap_err();
        assert!(matches!(err, CoreError::Planning(_)));
    }

    #[test]
    fn scripts_follow_the_wire_grammar() {
        let zone = zone_with(vec![a_declared("www", "192.0.2.2", Some(300))]);
        let observed = vec![a_observed("www", "192.0.2.1", 300)];
        let plan = build_plan(&zone, &diff_zone(&zone, &observed)).unwrap();
        assert_eq!(
            plan.render(),
            "server ns1.example.com\n\
             zone example.com\n\
             update delete www.example.com. A 192.0.2.1\n\
             update add www.example.com. 300 A 192.0.2.2\n\
             send\n"
        );
    }
}
