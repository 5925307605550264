//! Live DNS state queries.

use std::sync::Arc;

use futures::future::join_all;
use tokio::time::timeout;
use zonesync_authority::RecordType;

use crate::services::ServiceContext;
use crate::types::{ObservedRecord, ObservedState, QueryWarning, Zone};

/// Queries the records a zone's authoritative server currently publishes.
pub struct StateService {
    ctx: Arc<ServiceContext>,
}

impl StateService {
    /// Create a state service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Query the published state of every label the zone declares.
    ///
    /// Each label is queried for every record type a label can carry, so
    /// stale records of undeclared types are visible to the diff. Lookups
    /// run concurrently; a failed or timed-out lookup becomes a
    /// [`QueryWarning`] and the remaining labels still resolve — a zone
    /// query never aborts as a whole. Labels the zone does not declare
    /// are not queried at all, which keeps unmanaged data out of the diff.
    pub async fn query_zone(&self, zone: &Zone) -> ObservedState {
        let labels = zone.managed_labels();
        log::info!(
            "Querying current DNS state for zone {} ({} label(s))",
            zone.name,
            labels.len()
        );

        let mut lookups = Vec::with_capacity(labels.len() * RecordType::ALL.len());
        for label in &labels {
            for record_type in RecordType::ALL {
                lookups.push(self.query_label(zone, label.clone(), record_type));
            }
        }
        let results = join_all(lookups).await;

        let mut state = ObservedState::default();
        for result in results {
            match result {
                Ok(records) => state.records.extend(records),
                Err(warning) => state.warnings.push(warning),
            }
        }
        state.records.sort_by_key(|r| {
            (
                r.label.clone(),
                r.record_type().as_str(),
                r.data.rdata_text(),
            )
        });
        state
            .warnings
            .sort_by_key(|w| (w.label.clone(), w.record_type.as_str()));

        log::info!(
            "Found {} record(s) for zone {} ({} warning(s))",
            state.records.len(),
            zone.name,
            state.warnings.len()
        );
        state
    }

    /// Query one label/type RRset, degrading failures into a warning.
    async fn query_label(
        &self,
        zone: &Zone,
        label: String,
        record_type: RecordType,
    ) -> Result<Vec<ObservedRecord>, QueryWarning> {
        let fqdn = zone.fqdn(&label);
        let lookup = self.ctx.lookup.query(&zone.server, &fqdn, record_type);

        match timeout(self.ctx.query_timeout, lookup).await {
            Ok(Ok(answers)) => {
                if !answers.is_empty() {
                    log::debug!(
                        "Found {} {record_type} record(s) for {fqdn}",
                        answers.len()
                    );
                }
                Ok(answers
                    .into_iter()
                    .map(|answer| ObservedRecord::from_answer(&label, answer))
                    .collect())
            }
            Ok(Err(e)) => {
                log::warn!("Failed to query {record_type} records for {fqdn}: {e}");
                Err(QueryWarning {
                    label,
                    record_type,
                    detail: e.to_string(),
                })
            }
            Err(_) => {
                log::warn!(
                    "Query for {record_type} records at {fqdn} timed out after {}s",
                    self.ctx.query_timeout.as_secs()
                );
                Err(QueryWarning {
                    label,
                    record_type,
                    detail: format!(
                        "query timed out after {}s",
                        self.ctx.query_timeout.as_secs()
                    ),
                })
            }
        }
    }
}
