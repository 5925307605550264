//! Zone reconciliation: query, diff, plan, and apply.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engine;
use crate::error::CoreResult;
use crate::services::{ServiceContext, StateService};
use crate::types::{QueryWarning, UpdatePlan, Zone, ZoneDiff};

/// How an update plan is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplyMode {
    /// Render the script only; no network I/O at all.
    DryRun,
    /// Submit the transaction and await the outcome.
    Apply,
}

impl std::fmt::Display for ApplyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DryRun => f.write_str("dry-run"),
            Self::Apply => f.write_str("live"),
        }
    }
}

/// Outcome of executing one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    /// Zone the plan targeted.
    pub zone_name: String,
    /// Execution mode.
    pub mode: ApplyMode,
    /// Number of primitives in the transaction.
    pub steps: usize,
    /// The rendered update script.
    pub script: String,
    /// Update client output; `None` on a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_output: Option<String>,
}

/// Everything one reconciliation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// The computed difference.
    pub diff: ZoneDiff,
    /// The plan derived from it.
    pub plan: UpdatePlan,
    /// Execution outcome; `None` when the zone was already in sync.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply: Option<ApplyReport>,
}

/// Result of a sync check against the live server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
    /// Whether the live state matches the declaration exactly.
    pub in_sync: bool,
    /// Human-oriented mismatch lines, empty when in sync.
    pub findings: Vec<String>,
    /// Labels/types the state query could not resolve.
    pub warnings: Vec<QueryWarning>,
}

/// Drives the reconciliation pipeline for one zone at a time.
///
/// Callers must serialize operations per zone: the service assumes no two
/// queries or applies run concurrently against the same zone name, and it
/// provides no cross-process locking of its own. A failed apply leaves the
/// live state unknown — re-run the pipeline from the state query; the
/// stale plan must never be resubmitted.
pub struct ReconcileService {
    ctx: Arc<ServiceContext>,
    state: StateService,
}

impl ReconcileService {
    /// Create a reconcile service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            state: StateService::new(ctx.clone()),
            ctx,
        }
    }

    /// Compute the difference between the zone's declaration and the live
    /// server state.
    ///
    /// Fails closed on an invalid zone; lookup failures degrade into the
    /// diff's warnings instead of aborting.
    pub async fn diff_zone(&self, zone: &Zone) -> CoreResult<ZoneDiff> {
        zone.validate()?;

        let observed = self.state.query_zone(zone).await;
        let mut diff = engine::diff_zone(zone, &observed.records);
        diff.warnings = observed.warnings;

        log::info!("Diff for zone {}: {}", zone.name, diff.summary());
        Ok(diff)
    }

    /// Build the update plan for a previously computed diff.
    pub fn plan(zone: &Zone, diff: &ZoneDiff) -> CoreResult<UpdatePlan> {
        engine::build_plan(zone, diff)
    }

    /// Execute a plan in the given mode.
    ///
    /// A dry run renders the script and returns without touching the
    /// network. A live run submits the whole plan as one transaction —
    /// the server applies it entirely or rejects it entirely — and the
    /// plan is never mutated or resubmitted here.
    pub async fn execute(
        &self,
        zone: &Zone,
        plan: &UpdatePlan,
        mode: ApplyMode,
    ) -> CoreResult<ApplyReport> {
        let script = plan.render();
        let mut report = ApplyReport {
            zone_name: plan.zone_name.clone(),
            mode,
            steps: plan.len(),
            script,
            server_output: None,
        };

        match mode {
            ApplyMode::DryRun => {
                log::info!(
                    "Dry-run: would submit {} update step(s) for zone {}",
                    plan.len(),
                    plan.zone_name
                );
                Ok(report)
            }
            ApplyMode::Apply => {
                log::info!(
                    "Submitting {} update step(s) for zone {}",
                    plan.len(),
                    plan.zone_name
                );
                match self
                    .ctx
                    .transport
                    .submit(&zone.server, &zone.key_file, &report.script)
                    .await
                {
                    Ok(output) => {
                        log::info!("Update transaction committed for zone {}", plan.zone_name);
                        report.server_output = Some(output);
                        Ok(report)
                    }
                    Err(e) => {
                        if e.is_expected() {
                            log::warn!("Update for zone {} failed: {e}", plan.zone_name);
                        } else {
                            log::error!("Update for zone {} failed: {e}", plan.zone_name);
                        }
                        Err(e.into())
                    }
                }
            }
        }
    }

    /// Run the full pipeline: validate, query, diff, plan, execute.
    ///
    /// A zone that is already in sync short-circuits with no transaction
    /// submitted (`apply` is `None` in the report).
    pub async fn reconcile(&self, zone: &Zone, mode: ApplyMode) -> CoreResult<ReconcileReport> {
        let diff = self.diff_zone(zone).await?;
        let plan = Self::plan(zone, &diff)?;

        if plan.is_empty() {
            log::info!("Zone {} is already in sync", zone.name);
            return Ok(ReconcileReport {
                diff,
                plan,
                apply: None,
            });
        }

        let apply = self.execute(zone, &plan, mode).await?;
        Ok(ReconcileReport {
            diff,
            plan,
            apply: Some(apply),
        })
    }

    /// Check whether the live state matches the declaration, reporting
    /// each mismatch as a human-oriented line.
    pub async fn verify(&self, zone: &Zone) -> CoreResult<VerifyReport> {
        let diff = self.diff_zone(zone).await?;
        let in_sync = !diff.has_changes();

        let mut findings = Vec::new();
        if !in_sync {
            findings.push(format!("DNS state mismatch: {}", diff.summary()));
            for record in &diff.to_create {
                findings.push(format!(
                    "  Missing: {} {} {}",
                    record.label,
                    record.record_type(),
                    record.data.rdata_text()
                ));
            }
            for update in &diff.to_update {
                findings.push(format!(
                    "  Different: {} {} {}",
                    update.desired.label,
                    update.desired.record_type(),
                    update.desired.data.rdata_text()
                ));
            }
            for record in &diff.to_delete {
                findings.push(format!(
                    "  Extra: {} {} {}",
                    record.label,
                    record.record_type(),
                    record.data.rdata_text()
                ));
            }
        }

        log::info!("Validation result for zone {}: valid={in_sync}", zone.name);
        Ok(VerifyReport {
            in_sync,
            findings,
            warnings: diff.warnings,
        })
    }
}
