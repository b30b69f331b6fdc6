//! Mode policy: thresholds, weights, and enabled rules per scan mode
//!
//! Exactly two modes exist: `general` and `gaming`. Gaming expects more
//! headroom, so every threshold tightens and the input-path rule switches
//! on. Policies are plain immutable structs resolved once per run and passed
//! explicitly into every rule and the aggregator; there is no process-wide
//! mode state.

use crate::config::ModeOverride;
use crate::error::ZeroLagError;
use crate::models::Category;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Scan mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    General,
    Gaming,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::General => write!(f, "general"),
            Mode::Gaming => write!(f, "gaming"),
        }
    }
}

impl FromStr for Mode {
    type Err = ZeroLagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(Mode::General),
            "gaming" => Ok(Mode::Gaming),
            other => Err(ZeroLagError::InvalidMode(other.to_string())),
        }
    }
}

/// Threshold table for one mode
///
/// `*_warn` / `*_bad` pairs bound the Medium and High severity tiers.
/// CPU, memory and latency thresholds are badness fractions in [0,1] over
/// the normalized metric; disk thresholds are free-space fractions (lower is
/// worse); startup thresholds are enabled-item counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub cpu_warn: f64,
    pub cpu_bad: f64,
    pub memory_warn: f64,
    pub memory_bad: f64,
    pub disk_free_warn: f64,
    pub disk_free_bad: f64,
    /// Raw latency thresholds in milliseconds, pre-normalization
    pub latency_warn_ms: f64,
    pub latency_bad_ms: f64,
    pub startup_warn: usize,
    pub startup_bad: usize,
    /// A single process at or above this CPU% is flagged as a hog
    pub process_cpu_hog_pct: f64,
    /// A single process holding at least this fraction of total RAM is
    /// flagged as a hog. Relative, so the rule abstains when total memory
    /// is unknown rather than guessing what "large" means.
    pub process_mem_hog_fraction: f64,
}

impl Thresholds {
    /// Default thresholds for everyday desktop use.
    pub fn general() -> Self {
        Self {
            cpu_warn: 0.60,
            cpu_bad: 0.85,
            memory_warn: 0.70,
            memory_bad: 0.85,
            disk_free_warn: 0.25,
            disk_free_bad: 0.15,
            latency_warn_ms: 50.0,
            latency_bad_ms: 150.0,
            startup_warn: 7,
            startup_bad: 12,
            process_cpu_hog_pct: 50.0,
            process_mem_hog_fraction: 0.25,
        }
    }

    /// Gaming thresholds: every cutoff demands more headroom.
    pub fn gaming() -> Self {
        Self {
            cpu_warn: 0.50,
            cpu_bad: 0.75,
            memory_warn: 0.60,
            memory_bad: 0.75,
            disk_free_warn: 0.30,
            disk_free_bad: 0.20,
            latency_warn_ms: 30.0,
            latency_bad_ms: 100.0,
            startup_warn: 6,
            startup_bad: 10,
            process_cpu_hog_pct: 40.0,
            process_mem_hog_fraction: 0.20,
        }
    }
}

/// Category weight table for one mode
///
/// Sums to 1.0 when every category is present. The aggregator renormalizes
/// over whatever categories actually scored, so abstentions shift weight
/// proportionally instead of dragging the score toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub startup: f64,
    pub responsiveness: f64,
}

impl Weights {
    pub fn general() -> Self {
        Self {
            cpu: 0.30,
            memory: 0.25,
            disk: 0.25,
            startup: 0.20,
            responsiveness: 0.0,
        }
    }

    pub fn gaming() -> Self {
        Self {
            cpu: 0.30,
            memory: 0.20,
            disk: 0.15,
            startup: 0.15,
            responsiveness: 0.20,
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Cpu => self.cpu,
            Category::Memory => self.memory,
            Category::Disk => self.disk,
            Category::Startup => self.startup,
            Category::Responsiveness => self.responsiveness,
        }
    }

    fn sum(&self) -> f64 {
        self.cpu + self.memory + self.disk + self.startup + self.responsiveness
    }
}

/// Rules enabled only in gaming mode
const GAMING_ONLY_RULES: &[&str] = &["input-path"];

/// Resolved policy bundle for one scan run
#[derive(Debug, Clone, PartialEq)]
pub struct ModePolicy {
    pub mode: Mode,
    pub thresholds: Thresholds,
    pub weights: Weights,
}

impl ModePolicy {
    /// Resolve a mode name into its policy bundle.
    ///
    /// Fails with `InvalidMode` for anything other than the two built-in
    /// modes; there is deliberately no fallback to `general`.
    pub fn resolve(name: &str) -> Result<Self, ZeroLagError> {
        let mode = Mode::from_str(name)?;
        Ok(Self::for_mode(mode))
    }

    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::General => Self {
                mode,
                thresholds: Thresholds::general(),
                weights: Weights::general(),
            },
            Mode::Gaming => Self {
                mode,
                thresholds: Thresholds::gaming(),
                weights: Weights::gaming(),
            },
        }
    }

    /// Apply user config overrides on top of the built-in tables.
    ///
    /// Overridden weights that stray from a 1.0 sum are renormalized; the
    /// aggregate must stay a weighted mean regardless of what the config says.
    pub fn with_overrides(mut self, overrides: Option<&ModeOverride>) -> Self {
        let Some(ov) = overrides else {
            return self;
        };
        if let Some(t) = &ov.thresholds {
            t.apply(&mut self.thresholds);
        }
        if let Some(w) = &ov.weights {
            w.apply(&mut self.weights);
            let sum = self.weights.sum();
            if sum > 0.0 && (sum - 1.0).abs() > 1e-6 {
                warn!("configured weights sum to {sum:.3}, renormalizing");
                self.weights.cpu /= sum;
                self.weights.memory /= sum;
                self.weights.disk /= sum;
                self.weights.startup /= sum;
                self.weights.responsiveness /= sum;
            }
        }
        self
    }

    /// Whether a rule participates in this mode.
    pub fn rule_enabled(&self, rule_id: &str) -> bool {
        match self.mode {
            Mode::Gaming => true,
            Mode::General => !GAMING_ONLY_RULES.contains(&rule_id),
        }
    }

    /// Categories that have at least one enabled rule in this mode.
    pub fn active_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| *c != Category::Responsiveness || self.mode == Mode::Gaming)
            .collect()
    }
}
