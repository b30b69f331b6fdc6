//! Disk rules: free space and write latency

use crate::models::{Category, Finding, Severity};
use crate::normalize::latency_badness;
use crate::policy::ModePolicy;
use crate::rules::{headroom_score, tier_impact, RuleCtx, RuleOutcome};

/// Score free space on the worst disk.
pub(super) fn disk_space(ctx: &RuleCtx<'_>, policy: &ModePolicy) -> RuleOutcome {
    let Some(free) = ctx.metrics.disk_free.value() else {
        return RuleOutcome::abstain();
    };
    let t = &policy.thresholds;
    // Free space is healthy-high; fold into badness space
    let badness = 1.0 - free;
    let warn = 1.0 - t.disk_free_warn;
    let bad = 1.0 - t.disk_free_bad;
    let mut findings = Vec::new();

    if free <= t.disk_free_bad {
        findings.push(
            Finding::new(
                "disk-space",
                Category::Disk,
                Severity::High,
                format!("Very low free disk space ({:.0}%)", free * 100.0),
                "Low disk free space slows the OS, updates, and games.",
            )
            .with_action("free-disk-space")
            .with_impact(tier_impact(badness, warn, bad)),
        );
    } else if free <= t.disk_free_warn {
        findings.push(
            Finding::new(
                "disk-space",
                Category::Disk,
                Severity::Medium,
                format!("Free space getting tight ({:.0}%)", free * 100.0),
                "Keeping comfortable free space helps performance and stability.",
            )
            .with_action("free-disk-space")
            .with_impact(tier_impact(badness, warn, bad)),
        );
    }

    RuleOutcome::score(headroom_score(badness, warn, bad)).with_findings(findings)
}

/// Score the small-write latency sample.
pub(super) fn disk_latency(ctx: &RuleCtx<'_>, policy: &ModePolicy) -> RuleOutcome {
    let Some(latency) = ctx.metrics.disk_latency.value() else {
        return RuleOutcome::abstain();
    };
    let t = &policy.thresholds;
    // Project millisecond thresholds through the same saturating curve
    // the normalizer applied, so metric and cutoffs share a scale
    let warn = latency_badness(t.latency_warn_ms);
    let bad = latency_badness(t.latency_bad_ms);
    let mut findings = Vec::new();

    if latency >= bad {
        findings.push(
            Finding::new(
                "disk-latency",
                Category::Disk,
                Severity::High,
                "Storage responding very slowly".to_string(),
                "High write latency causes long load times, stutter, and laggy saves.",
            )
            .with_action("check-storage-health")
            .with_impact(tier_impact(latency, warn, bad)),
        );
    } else if latency >= warn {
        findings.push(
            Finding::new(
                "disk-latency",
                Category::Disk,
                Severity::Medium,
                "Storage latency elevated".to_string(),
                "Slow disk writes drag down the whole system, not just file copies.",
            )
            .with_action("check-storage-health")
            .with_impact(tier_impact(latency, warn, bad)),
        );
    }

    RuleOutcome::score(headroom_score(latency, warn, bad)).with_findings(findings)
}
