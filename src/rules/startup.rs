//! Startup rules: entry volume and high-impact entries
//!
//! An empty startup list is a measurement (none found), not missing data,
//! so these rules never abstain. Disabled entries cost nothing at boot and
//! are ignored.

use crate::models::{Category, Finding, Severity};
use crate::policy::ModePolicy;
use crate::rules::{headroom_score, tier_impact, RuleCtx, RuleOutcome};
use crate::snapshot::BootImpact;

/// Penalty per enabled high-impact entry, off the 100-point rule score
const HIGH_IMPACT_PENALTY: f64 = 15.0;

/// Penalty per enabled medium-impact entry
const MEDIUM_IMPACT_PENALTY: f64 = 5.0;

/// Score the sheer number of enabled startup entries.
pub(super) fn startup_volume(ctx: &RuleCtx<'_>, policy: &ModePolicy) -> RuleOutcome {
    let t = &policy.thresholds;
    let count = ctx.startup.iter().filter(|s| s.enabled).count();

    // Count thresholds map onto the badness scale with the bad cutoff at
    // its midpoint, so the score keeps falling past "too many"
    let scale = (2 * t.startup_bad).max(1) as f64;
    let badness = (count as f64 / scale).min(1.0);
    let warn = t.startup_warn as f64 / scale;
    let bad = t.startup_bad as f64 / scale;
    let mut findings = Vec::new();

    if count >= t.startup_bad {
        findings.push(
            Finding::new(
                "startup-volume",
                Category::Startup,
                Severity::High,
                format!("Too many startup items ({count})"),
                "Too many startup apps slow boot and keep background CPU/RAM usage high.",
            )
            .with_action("trim-startup-items")
            .with_impact(tier_impact(badness, warn, bad)),
        );
    } else if count >= t.startup_warn {
        findings.push(
            Finding::new(
                "startup-volume",
                Category::Startup,
                Severity::Medium,
                format!("Several startup items ({count})"),
                "Startup apps can silently reduce performance.",
            )
            .with_action("trim-startup-items")
            .with_impact(tier_impact(badness, warn, bad)),
        );
    }

    RuleOutcome::score(headroom_score(badness, warn, bad)).with_findings(findings)
}

/// Flag enabled entries with a known heavy boot impact.
pub(super) fn startup_heavy_hitters(ctx: &RuleCtx<'_>, _policy: &ModePolicy) -> RuleOutcome {
    let mut high = 0usize;
    let mut medium = 0usize;
    let mut names: Vec<&str> = Vec::new();

    for item in ctx.startup.iter().filter(|s| s.enabled) {
        match item.boot_impact {
            BootImpact::High => {
                high += 1;
                names.push(&item.name);
            }
            BootImpact::Medium => medium += 1,
            BootImpact::Low | BootImpact::Unknown => {}
        }
    }

    let score = 100.0
        - HIGH_IMPACT_PENALTY * high as f64
        - MEDIUM_IMPACT_PENALTY * medium as f64;

    if high == 0 {
        return RuleOutcome::score(score);
    }

    let shown = super::cpu::name_list(names.iter().copied(), high);
    let finding = Finding::new(
        "startup-heavy-hitters",
        Category::Startup,
        Severity::Medium,
        format!(
            "{high} high-impact startup {} enabled: {shown}",
            if high == 1 { "item" } else { "items" }
        ),
        "Heavy startup entries delay every boot and linger in the background.",
    )
    .with_action("trim-startup-items")
    .with_impact(0.3 * high as f64);

    RuleOutcome::score(score).with_findings(vec![finding])
}
