//! Scoring rules
//!
//! Each rule is an independent, named pure function over a slice of the
//! normalized data, tagged with the category it scores. Rules never observe
//! each other's output within a run, so the set can be extended or reordered
//! without hidden coupling; new rules are added to the registry, never
//! subclassed.
//!
//! A rule returns a sub-score contribution in [0,100] plus zero or more
//! findings. When its required metric is unavailable the rule abstains:
//! no sub-score, no findings, and the aggregator renormalizes weights
//! instead of averaging in a phantom zero.
//!
//! Within a category, the worst contributing rule governs the sub-score.
//! A healthy average must not paper over one red signal.

mod cpu;
mod disk;
mod memory;
mod responsiveness;
mod startup;

use crate::models::{Category, Finding};
use crate::normalize::NormalizedMetrics;
use crate::policy::ModePolicy;
use crate::snapshot::{ProcessSample, StartupItem};
use std::collections::BTreeMap;
use tracing::debug;

/// Read-only view of everything a rule may consult
pub struct RuleCtx<'a> {
    pub metrics: &'a NormalizedMetrics,
    pub startup: &'a [StartupItem],
    pub processes: &'a [ProcessSample],
    /// Total machine RAM, for rules with thresholds relative to it
    pub machine_total_memory: Option<u64>,
}

/// What one rule produced for one run
#[derive(Debug, Clone, Default)]
pub struct RuleOutcome {
    /// Sub-score contribution in [0,100]; None is an abstention
    pub sub_score: Option<f64>,
    pub findings: Vec<Finding>,
}

impl RuleOutcome {
    /// The rule's required metric was unavailable; contribute nothing.
    pub fn abstain() -> Self {
        Self::default()
    }

    pub fn score(sub_score: f64) -> Self {
        Self {
            sub_score: Some(sub_score.clamp(0.0, 100.0)),
            findings: Vec::new(),
        }
    }

    pub fn with_findings(mut self, findings: Vec<Finding>) -> Self {
        self.findings = findings;
        self
    }
}

/// A registered rule: id, scored category, and the evaluation function
pub struct Rule {
    pub id: &'static str,
    pub category: Category,
    pub eval: fn(&RuleCtx<'_>, &ModePolicy) -> RuleOutcome,
}

/// The fixed rule set, in registry order.
///
/// Ordering here never affects output: each rule is independent and the
/// prioritizer re-sorts findings deterministically.
pub const REGISTRY: &[Rule] = &[
    Rule {
        id: "cpu-load",
        category: Category::Cpu,
        eval: cpu::cpu_load,
    },
    Rule {
        id: "process-cpu-hogs",
        category: Category::Cpu,
        eval: cpu::process_cpu_hogs,
    },
    Rule {
        id: "memory-pressure",
        category: Category::Memory,
        eval: memory::memory_pressure,
    },
    Rule {
        id: "process-memory-hogs",
        category: Category::Memory,
        eval: memory::process_memory_hogs,
    },
    Rule {
        id: "disk-space",
        category: Category::Disk,
        eval: disk::disk_space,
    },
    Rule {
        id: "disk-latency",
        category: Category::Disk,
        eval: disk::disk_latency,
    },
    Rule {
        id: "startup-volume",
        category: Category::Startup,
        eval: startup::startup_volume,
    },
    Rule {
        id: "startup-heavy-hitters",
        category: Category::Startup,
        eval: startup::startup_heavy_hitters,
    },
    Rule {
        id: "input-path",
        category: Category::Responsiveness,
        eval: responsiveness::input_path,
    },
];

/// Per-category sub-scores plus the raw findings of one evaluation pass
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// One entry per category active in the mode. None = every enabled rule
    /// for the category abstained.
    pub categories: BTreeMap<Category, Option<f64>>,
    pub findings: Vec<Finding>,
}

/// Run every enabled rule over the normalized data.
pub fn evaluate(ctx: &RuleCtx<'_>, policy: &ModePolicy) -> Evaluation {
    let mut contributions: BTreeMap<Category, Vec<f64>> = policy
        .active_categories()
        .into_iter()
        .map(|c| (c, Vec::new()))
        .collect();
    let mut findings = Vec::new();

    for rule in REGISTRY {
        if !policy.rule_enabled(rule.id) {
            continue;
        }
        let outcome = (rule.eval)(ctx, policy);
        match outcome.sub_score {
            Some(score) => {
                contributions
                    .entry(rule.category)
                    .or_default()
                    .push(score.clamp(0.0, 100.0));
            }
            None => debug!(rule = rule.id, "rule abstained"),
        }
        findings.extend(outcome.findings);
    }

    let categories = contributions
        .into_iter()
        .map(|(category, scores)| {
            // Worst rule governs the category
            let sub = scores.into_iter().min_by(f64::total_cmp);
            (category, sub)
        })
        .collect();

    Evaluation {
        categories,
        findings,
    }
}

/// Piecewise-linear headroom score over a badness fraction in [0,1].
///
/// 100 at zero badness, 75 at the warn threshold, 30 at the bad threshold,
/// decaying to 0 as badness saturates.
pub(crate) fn headroom_score(badness: f64, warn: f64, bad: f64) -> f64 {
    let b = badness.clamp(0.0, 1.0);
    let score = if b <= warn {
        if warn <= 0.0 {
            75.0
        } else {
            100.0 - 25.0 * (b / warn)
        }
    } else if b <= bad {
        75.0 - 45.0 * (b - warn) / (bad - warn)
    } else if bad >= 1.0 {
        0.0
    } else {
        30.0 - 30.0 * (b - bad) / (1.0 - bad)
    };
    score.clamp(0.0, 100.0)
}

/// Impact of a badness value relative to its thresholds.
///
/// 0 below warn, rising through 1.0 at the bad threshold, up to 2.0 at full
/// saturation. Findings carry this as their tie-break key.
pub(crate) fn tier_impact(badness: f64, warn: f64, bad: f64) -> f64 {
    let b = badness.clamp(0.0, 1.0);
    if b >= bad {
        if bad >= 1.0 {
            1.0
        } else {
            1.0 + (b - bad) / (1.0 - bad)
        }
    } else if b >= warn && bad > warn {
        (b - warn) / (bad - warn)
    } else {
        0.0
    }
}
