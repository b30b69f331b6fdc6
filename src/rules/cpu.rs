//! CPU rules: overall load and per-process hogs

use crate::models::{Category, Finding, Severity};
use crate::policy::ModePolicy;
use crate::rules::{headroom_score, tier_impact, RuleCtx, RuleOutcome};

/// Penalty per flagged CPU hog, off the 100-point rule score
const HOG_PENALTY: f64 = 35.0;

/// Names listed in a hog finding before "and N more"
const HOG_NAME_LIMIT: usize = 3;

/// Score the system-wide CPU load at scan time.
pub(super) fn cpu_load(ctx: &RuleCtx<'_>, policy: &ModePolicy) -> RuleOutcome {
    let Some(load) = ctx.metrics.cpu_load.value() else {
        return RuleOutcome::abstain();
    };
    let t = &policy.thresholds;
    let mut findings = Vec::new();

    if load >= t.cpu_bad {
        findings.push(
            Finding::new(
                "cpu-load",
                Category::Cpu,
                Severity::High,
                format!("High CPU load at scan time ({:.0}%)", load * 100.0),
                "Sustained high CPU load causes lag, FPS drops, and slow app switching.",
            )
            .with_action("review-top-processes")
            .with_impact(tier_impact(load, t.cpu_warn, t.cpu_bad)),
        );
    } else if load >= t.cpu_warn {
        findings.push(
            Finding::new(
                "cpu-load",
                Category::Cpu,
                Severity::Medium,
                format!("CPU moderately loaded ({:.0}%)", load * 100.0),
                "Could be normal, but worth monitoring during gaming or heavy work.",
            )
            .with_action("review-top-processes")
            .with_impact(tier_impact(load, t.cpu_warn, t.cpu_bad)),
        );
    }

    RuleOutcome::score(headroom_score(load, t.cpu_warn, t.cpu_bad)).with_findings(findings)
}

/// Flag individual processes eating an outsized share of the CPU.
///
/// Abstains when the process table is empty: no samples is missing data,
/// not evidence of a quiet machine.
pub(super) fn process_cpu_hogs(ctx: &RuleCtx<'_>, policy: &ModePolicy) -> RuleOutcome {
    if ctx.processes.is_empty() {
        return RuleOutcome::abstain();
    }
    let threshold = policy.thresholds.process_cpu_hog_pct;
    let hogs: Vec<_> = ctx
        .processes
        .iter()
        .filter(|p| p.cpu_pct >= threshold)
        .collect();

    if hogs.is_empty() {
        return RuleOutcome::score(100.0);
    }

    let worst = hogs
        .iter()
        .map(|p| p.cpu_pct)
        .max_by(f64::total_cmp)
        .unwrap_or(threshold);
    let names = name_list(hogs.iter().map(|p| p.name.as_str()), hogs.len());

    let finding = Finding::new(
        "process-cpu-hogs",
        Category::Cpu,
        Severity::Medium,
        format!("Runaway CPU usage: {names}"),
        "A single process hogging the CPU starves everything else on the machine.",
    )
    .with_action("review-top-processes")
    .with_impact(worst / threshold - 1.0);

    RuleOutcome::score(100.0 - HOG_PENALTY * hogs.len() as f64).with_findings(vec![finding])
}

/// "a, b, c and 2 more"
pub(super) fn name_list<'a>(names: impl Iterator<Item = &'a str>, total: usize) -> String {
    let shown: Vec<&str> = names.take(HOG_NAME_LIMIT).collect();
    let mut out = shown.join(", ");
    if total > shown.len() {
        out.push_str(&format!(" and {} more", total - shown.len()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::policy::{Mode, ModePolicy};
    use crate::snapshot::{ProcessSample, SystemSnapshot};
    use chrono::Utc;

    fn ctx_eval(
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
    fn test_cpu_load_abstains_without_metric() {
        let snap = SystemSnapshot::empty(Utc::now());
        let out = ctx_eval(&snap, Mode::General, cpu_load);
        assert!(out.sub_score.is_none());
        assert!(out.findings.is_empty());
    }

    #[test]
    fn test_cpu_load_high_severity_past_bad_threshold() {
        let mut snap = SystemSnapshot::empty(Utc::now());
        snap.cpu_load_pct = Some(95.0);
        let out = ctx_eval(&snap, Mode::General, cpu_load);
        assert!(out.sub_score.unwrap() < 30.0);
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].severity, Severity::High);
        assert!(out.findings[0].impact >= 1.0);
    }

    #[test]
    fn test_gaming_flags_lower_load() {
        let mut snap = SystemSnapshot::empty(Utc::now());
        snap.cpu_load_pct = Some(80.0);
        // 80% is warn tier in general mode but past bad in gaming
        let general = ctx_eval(&snap, Mode::General, cpu_load);
        assert_eq!(general.findings[0].severity, Severity::Medium);
        let gaming = ctx_eval(&snap, Mode::Gaming, cpu_load);
        assert_eq!(gaming.findings[0].severity, Severity::High);
    }

    #[test]
    fn test_warn_tier_matches_other_rules() {
        // Every rule's warn tier is Medium; CPU is no softer than the rest
        let mut snap = SystemSnapshot::empty(Utc::now());
        snap.cpu_load_pct = Some(65.0);
        let out = ctx_eval(&snap, Mode::General, cpu_load);
        assert_eq!(out.findings.len(), 1);
        assert_eq!(out.findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_hogs_abstain_on_empty_process_table() {
        let snap = SystemSnapshot::empty(Utc::now());
        let out = ctx_eval(&snap, Mode::General, process_cpu_hogs);
        assert!(out.sub_score.is_none());
    }

    #[test]
    fn test_hog_detection() {
        let mut snap = SystemSnapshot::empty(Utc::now());
        snap.processes = vec![
            ProcessSample {
                name: "calm.exe".into(),
                pid: 1,
                cpu_pct: 3.0,
                memory_bytes: 50 << 20,
            },
            ProcessSample {
                name: "miner.exe".into(),
                pid: 2,
                cpu_pct: 72.0,
                memory_bytes: 80 << 20,
            },
        ];
        let out = ctx_eval(&snap, Mode::General, process_cpu_hogs);
        assert_eq!(out.sub_score, Some(65.0));
        assert_eq!(out.findings.len(), 1);
        assert!(out.findings[0].title.contains("miner.exe"));
        assert_eq!(out.findings[0].severity, Severity::Medium);
    }

    #[test]
    fn test_name_list_truncation() {
        let names = ["a", "b", "c", "d", "e"];
        let out = name_list(names.iter().copied(), names.len());
        assert_eq!(out, "a, b, c and 2 more");
    }
}
