//! Pure comparison of declared records against observed records.

use std::collections::BTreeMap;

use crate::types::{ObservedRecord, Record, RecordUpdate, Zone, ZoneDiff};

/// Records are grouped by `(label, type name)` before matching; within a
/// group the rdata text is the identity (it embeds MX priority and SRV
/// priority/weight/port).
type GroupKey = (String, &'static str);

/// Compare a zone's declared records against the observed record set.
///
/// Pure: no I/O and no hidden state. Declared records are resolved
/// (TTL defaults filled, rdata normalized) before comparison, so TTLs and
/// hostname spellings never produce spurious differences.
///
/// Within each `(label, type)` group:
/// - records whose rdata matches exactly are unchanged, or an update when
///   only the TTL differs;
/// - remaining declared and observed entries pair up as updates — a
///   changed value or a changed MX/SRV priority is a replacement, not an
///   unrelated create plus delete;
/// - leftovers become creates (declared only) or deletes (observed only).
///
/// Every observed record handed in is considered in scope: whatever shows
/// up and is no longer declared gets deleted. Keeping unmanaged data safe
/// is the state query's job — it only enumerates the labels the zone
/// declares, so records at other labels never reach this function.
///
/// Output lists are sorted by `(label, type, value)`; two runs over
/// identical inputs produce identical diffs.
#[must_use]
pub fn diff_zone(zone: &Zone, observed: &[ObservedRecord]) -> ZoneDiff {
    let mut groups: BTreeMap<GroupKey, (Vec<Record>, Vec<ObservedRecord>)> = BTreeMap::new();
    for record in zone.resolved_records() {
        let key = (record.label.clone(), record.record_type().as_str());
        groups.entry(key).or_default().0.push(record);
    }
    for record in observed {
        let key = (
            record.label.to_ascii_lowercase(),
            record.record_type().as_str(),
        );
        groups.entry(key).or_default().1.push(record.clone());
    }

    let mut diff = ZoneDiff {
        zone_name: zone.apex_name(),
        ..ZoneDiff::default()
    };

    for (mut declared, mut published) in groups.into_values() {
        declared.sort_by_key(|r| r.data.rdata_text());
        published.sort_by_key(|o| o.data.rdata_text());

        let mut unmatched = Vec::new();
        for record in declared {
            let rdata = record.data.rdata_text();
            if let Some(pos) = published.iter().position(|o| o.data.rdata_text() == rdata) {
                let observed = published.remove(pos);
                if record.ttl.unwrap_or(zone.default_ttl) == observed.ttl {
                    diff.unchanged += 1;
                } else {
                    diff.to_update.push(RecordUpdate {
                        desired: record,
                        observed,
                    });
                }
            } else {
                unmatched.push(record);
            }
        }

        let mut leftovers = published.into_iter();
        for record in unmatched {
            match leftovers.next() {
                Some(observed) => diff.to_update.push(RecordUpdate {
                    desired: record,
                    observed,
                }),
                None => diff.to_create.push(record),
            }
        }
        diff.to_delete.extend(leftovers);
    }

    diff.to_create
        .sort_by_key(|r| (r.label.clone(), r.record_type().as_str(), r.data.rdata_text()));
    diff.to_update.sort_by_key(|u| {
        (
            u.desired.label.clone(),
            u.desired.record_type().as_str(),
            u.desired.data.rdata_text(),
        )
    });
    diff.to_delete
        .sort_by_key(|o| (o.label.clone(), o.record_type().as_str(), o.data.rdata_text()));

    diff
}
