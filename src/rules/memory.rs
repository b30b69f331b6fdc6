//! Memory rules: overall pressure and per-process hogs

use crate::models::{Category, Finding, Severity};
use crate::policy::ModePolicy;
use crate::rules::cpu::name_list;
use crate::rules::{headroom_score, tier_impact, RuleCtx, RuleOutcome};

/// Penalty per flagged memory hog, off the 100-point rule score
const HOG_PENALTY: f64 = 25.0;

/// Score overall memory pressure (used / total).
pub(super) fn memory_pressure(ctx: &RuleCtx<'_>, policy: &ModePolicy) -> RuleOutcome {
    let Some(pressure) = ctx.metrics.memory_pressure.value() else {
        return RuleOutcome::abstain();
    };
    let t = &policy.thresholds;
    let mut findings = Vec::new();

    if pressure >= t.memory_bad {
        findings.push(
            Finding::new(
                "memory-pressure",
                Category::Memory,
                Severity::High,
                format!("High RAM usage ({:.0}%)", pressure * 100.0),
                "When RAM is near full, the OS swaps to disk, causing stutter and slowdowns.",
            )
            .with_action("reduce-background-apps")
            .with_impact(tier_impact(pressure, t.memory_warn, t.memory_bad)),
        );
    } else if pressure >= t.memory_warn {
        findings.push(
            Finding::new(
                "memory-pressure",
                Category::Memory,
                Severity::Medium,
                format!("RAM pressure ({:.0}%)", pressure * 100.0),
                "Background apps and browsers can degrade gaming and productivity over time.",
            )
            .with_action("reduce-background-apps")
            .with_impact(tier_impact(pressure, t.memory_warn, t.memory_bad)),
        );
    }

    RuleOutcome::score(headroom_score(pressure, t.memory_warn, t.memory_bad))
        .with_findings(findings)
}

/// Flag processes holding an outsized share of total RAM.
///
/// The threshold is relative to machine memory, so the rule abstains when
/// the memory metric is unavailable: a 4 GB process means something very
/// different on an 8 GB box than on a 64 GB one.
pub(super) fn process_memory_hogs(ctx: &RuleCtx<'_>, policy: &ModePolicy) -> RuleOutcome {
    if ctx.processes.is_empty() || !ctx.metrics.memory_pressure.is_available() {
        return RuleOutcome::abstain();
    }
    let Some(machine_total) = ctx.machine_total_memory else {
        return RuleOutcome::abstain();
    };
    let threshold_bytes =
        (machine_total as f64 * policy.thresholds.process_mem_hog_fraction) as u64;

    let hogs: Vec<_> = ctx
        .processes
        .iter()
        .filter(|p| p.memory_bytes >= threshold_bytes)
        .collect();

    if hogs.is_empty() {
        return RuleOutcome::score(100.0);
    }

    let worst = hogs.iter().map(|p| p.memory_bytes).max().unwrap_or(0);
    let names = name_list(hogs.iter().map(|p| p.name.as_str()), hogs.len());

    let finding = Finding::new(
        "process-memory-hogs",
        Category::Memory,
        Severity::Medium,
        format!("Memory-hungry processes: {names}"),
        "A few oversized processes can push the whole machine into swapping.",
    )
    .with_action("reduce-background-apps")
    .with_impact(worst as f64 / threshold_bytes.max(1) as f64 - 1.0);

    RuleOutcome::score(100.0 - HOG_PENALTY * hogs.len() as f64).with_findings(vec![finding])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::policy::{Mode, ModePolicy};
    use crate::rules::RuleCtx;
    use crate::snapshot::{ProcessSample, SystemSnapshot};
    use chrono::Utc;

    const GIB: u64 = 1 << 30;

    fn eval(
        snap: &SystemSnapshot,
        mode: Mode,
        rule: fn(&RuleCtx<'_>, &ModePolicy) -> RuleOutcome,
    ) -> RuleOutcome {
        let metrics = normalize(snap);
        let policy = ModePolicy::for_mode(mode);
        let ctx = RuleCtx {
            metrics: &metrics,
            startup: &snap.startup_items,
            processes: &snap.processes,
            machine_total_memory: snap.memory_total_bytes,
        };
        rule(&ctx, &policy)
    }

    #[test]
    fn test_pressure_abstains_without_metric() {
        let snap = SystemSnapshot::empty(Utc::now());
        let out = eval(&snap, Mode::General, memory_pressure);
        assert!(out.sub_score.is_none());
    }

    #[test]
    fn test_high_pressure_finding() {
        let mut snap = SystemSnapshot::empty(Utc::now());
        snap.memory_total_bytes = Some(16 * GIB);
        snap.memory_used_bytes = Some(15 * GIB);
        let out = eval(&snap, Mode::General, memory_pressure);
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].severity, Severity::High);
        assert!(out.sub_score.unwrap() < 30.0);
    }

    #[test]
    fn test_gaming_warns_earlier() {
        let mut snap = SystemSnapshot::empty(Utc::now());
        snap.memory_total_bytes = Some(16 * GIB);
        snap.memory_used_bytes = Some(10 * GIB); // 62.5%
        assert!(eval(&snap, Mode::General, memory_pressure).findings.is_empty());
        let gaming = eval(&snap, Mode::Gaming, memory_pressure);
        assert_eq!(gaming.findings.len(), 1);
        assert_eq!(gaming.findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_mem_hogs_abstain_when_memory_unavailable() {
        let mut snap = SystemSnapshot::empty(Utc::now());
        snap.processes = vec![ProcessSample {
            name: "big.exe".into(),
            pid: 1,
            cpu_pct: 1.0,
            memory_bytes: 8 * GIB,
        }];
        let out = eval(&snap, Mode::General, process_memory_hogs);
        assert!(out.sub_score.is_none());
        assert!(out.findings.is_empty());
    }

    #[test]
    fn test_mem_hog_detection() {
        let mut snap = SystemSnapshot::empty(Utc::now());
        snap.memory_total_bytes = Some(16 * GIB);
        snap.memory_used_bytes = Some(8 * GIB);
        snap.processes = vec![
            ProcessSample {
                name: "chrome.exe".into(),
                pid: 1,
                cpu_pct: 5.0,
                memory_bytes: 5 * GIB, // 31% of 16 GB
            },
            ProcessSample {
                name: "small.exe".into(),
                pid: 2,
                cpu_pct: 1.0,
                memory_bytes: 200 << 20,
            },
        ];
        let out = eval(&snap, Mode::General, process_memory_hogs);
        assert_eq!(out.sub_score, Some(75.0));
        assert!(out.findings[0].title.contains("chrome.exe"));
    }
}
