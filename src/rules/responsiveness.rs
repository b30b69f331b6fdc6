//! Input/render-path responsiveness rule, active only in gaming mode
//!
//! Frame pacing suffers when the CPU has no slack for input handling or
//! when storage stalls block asset streaming. This rule blends both
//! signals; neither alone tells the story, so it abstains unless both
//! metrics are available.

use crate::models::{Category, Finding, Severity};
use crate::policy::ModePolicy;
use crate::rules::{headroom_score, tier_impact, RuleCtx, RuleOutcome};

/// Blended-badness warn threshold
const RESP_WARN: f64 = 0.50;

/// Blended-badness bad threshold
const RESP_BAD: f64 = 0.75;

pub(super) fn input_path(ctx: &RuleCtx<'_>, _policy: &ModePolicy) -> RuleOutcome {
    let (Some(cpu), Some(latency)) = (
        ctx.metrics.cpu_load.value(),
        ctx.metrics.disk_latency.value(),
    ) else {
        return RuleOutcome::abstain();
    };

    let badness = 0.5 * cpu + 0.5 * latency;
    let mut findings = Vec::new();

    if badness >= RESP_BAD {
        findings.push(
            Finding::new(
                "input-path",
                Category::Responsiveness,
                Severity::High,
                "Input path under pressure".to_string(),
                "CPU and storage are both saturated; expect stutter and input lag in game.",
            )
            .with_action("close-heavy-apps")
            .with_impact(tier_impact(badness, RESP_WARN, RESP_BAD)),
        );
    } else if badness >= RESP_WARN {
        findings.push(
            Finding::new(
                "input-path",
                Category::Responsiveness,
                Severity::Medium,
                "Responsiveness headroom is thin".to_string(),
                "Combined CPU and storage load leaves little slack for frame pacing.",
            )
            .with_action("close-heavy-apps")
            .with_impact(tier_impact(badness, RESP_WARN, RESP_BAD)),
        );
    }

    RuleOutcome::score(headroom_score(badness, RESP_WARN, RESP_BAD)).with_findings(findings)
}
