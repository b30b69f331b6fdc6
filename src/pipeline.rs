//! Scan pipeline: snapshot in, scan result out
//!
//! Single-threaded, synchronous, and pure over its inputs. The pipeline
//! holds no state between runs, so independent snapshots can be scored
//! concurrently from separate threads without coordination.

use crate::error::ZeroLagError;
use crate::models::{FindingsSummary, ScanResult};
use crate::normalize::normalize;
use crate::policy::ModePolicy;
use crate::prioritize::prioritize;
use crate::rules::{evaluate, RuleCtx};
use crate::scoring::aggregate;
use crate::snapshot::SystemSnapshot;
use tracing::debug;

/// Score one snapshot under one policy.
///
/// Fails only with `NoData` (every category abstained); the snapshot
/// itself cannot be malformed enough to error, and an invalid mode was
/// rejected before a policy ever existed.
pub fn run_scan(snapshot: SystemSnapshot, policy: &ModePolicy) -> Result<ScanResult, ZeroLagError> {
    let metrics = normalize(&snapshot);
    debug!(?metrics, "normalized snapshot");

    let ctx = RuleCtx {
        metrics: &metrics,
        startup: &snapshot.startup_items,
        processes: &snapshot.processes,
        machine_total_memory: snapshot.memory_total_bytes,
    };
    let evaluation = evaluate(&ctx, policy);
    let breakdown = aggregate(&evaluation, policy)?;
    let findings = prioritize(evaluation.findings);
    let findings_summary = FindingsSummary::from_findings(&findings);

    Ok(ScanResult {
        mode: policy.mode,
        timestamp: snapshot.captured_at,
        score: breakdown.score,
        band: breakdown.band,
        breakdown: breakdown.categories,
        findings,
        findings_summary,
        snapshot,
    })
}
