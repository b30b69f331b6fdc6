//! Core data models for ZeroLag
//!
//! These models are used throughout the codebase for representing
//! scan findings, score breakdowns, and the exported scan result.

use crate::policy::Mode;
use crate::snapshot::SystemSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Generate a deterministic finding ID based on content hash.
///
/// Findings get stable IDs across runs so identical scans produce
/// byte-identical exports and duplicate advice can be merged reliably.
///
/// The ID is a 16-character hex string derived from hashing:
/// - rule id (which rule produced it)
/// - category (what part of the system it concerns)
/// - title (what the issue is)
pub fn deterministic_finding_id(rule: &str, category: Category, title: &str) -> String {
    let input = format!("{rule}\n{category}\n{title}");
    let digest = Sha256::digest(input.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..16].to_string()
}

/// Severity tiers for findings
///
/// Ordered so that `High > Medium > Low`, which the prioritizer relies on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Metric categories scored by the rule set
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Cpu,
    Memory,
    Disk,
    Startup,
    Responsiveness,
}

impl Category {
    /// All categories, in the order they appear in breakdowns.
    pub const ALL: [Category; 5] = [
        Category::Cpu,
        Category::Memory,
        Category::Disk,
        Category::Startup,
        Category::Responsiveness,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Memory => "Memory",
            Category::Disk => "Disk",
            Category::Startup => "Startup",
            Category::Responsiveness => "Responsiveness",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Cpu => write!(f, "cpu"),
            Category::Memory => write!(f, "memory"),
            Category::Disk => write!(f, "disk"),
            Category::Startup => write!(f, "startup"),
            Category::Responsiveness => write!(f, "responsiveness"),
        }
    }
}

/// A single detected performance issue
///
/// Findings are immutable facts produced once by a rule; the prioritizer
/// only filters and merges them, never edits them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Finding {
    #[serde(default)]
    pub id: String,
    /// Rule that produced this finding
    #[serde(default)]
    pub rule: String,
    #[serde(default)]
    pub severity: Severity,
    /// Metric category this finding concerns
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub title: String,
    /// Why the issue matters
    #[serde(default)]
    pub detail: String,
    /// Suggested remediation action id, shared across rules that point at
    /// the same fix so the prioritizer can merge redundant advice
    #[serde(default)]
    pub action: Option<String>,
    /// How far past the triggering threshold the metric was.
    /// Used as the secondary sort key within a severity tier.
    #[serde(default)]
    pub impact: f64,
}

impl Finding {
    /// Build a finding with a deterministic id.
    pub fn new(
        rule: &'static str,
        category: Category,
        severity: Severity,
        title: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            id: deterministic_finding_id(rule, category, &title),
            rule: rule.to_string(),
            severity,
            category,
            title,
            detail: detail.into(),
            action: None,
            impact: 0.0,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_impact(mut self, impact: f64) -> Self {
        self.impact = impact.max(0.0);
        self
    }
}

/// Count of findings per severity tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindingsSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total: usize,
}

impl FindingsSummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for f in findings {
            match f.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

/// Sub-score entry for one category
///
/// `sub_score: None` means the category abstained: its metrics were
/// unavailable, which is explicitly distinct from a score of zero. The
/// aggregator excludes such entries from the weighted sum entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    /// Sub-score in [0,100], or None when the category was not scored
    pub sub_score: Option<f64>,
    /// Mode weight this category carries when present
    pub weight: f64,
}

impl CategoryScore {
    pub fn is_scored(&self) -> bool {
        self.sub_score.is_some()
    }
}

/// Qualitative band for an aggregate score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Band {
    /// Band cutoffs: 85 / 70 / 55.
    pub fn from_score(score: f64) -> Band {
        if score >= 85.0 {
            Band::Excellent
        } else if score >= 70.0 {
            Band::Good
        } else if score >= 55.0 {
            Band::Fair
        } else {
            Band::Poor
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Band::Excellent => write!(f, "Excellent"),
            Band::Good => write!(f, "Good"),
            Band::Fair => write!(f, "Fair"),
            Band::Poor => write!(f, "Poor"),
        }
    }
}

/// Aggregate score plus the per-category breakdown it was computed from
///
/// Invariant: `score` is a deterministic function of the scored entries in
/// `categories` and the mode weights; recomputing from the same breakdown
/// always yields the same aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Aggregate performance score in [0,100]
    pub score: f64,
    pub band: Band,
    /// One entry per category active in the mode, scored or not
    pub categories: Vec<CategoryScore>,
}

/// The exported unit of a scan run
///
/// Immutable after creation; contains everything a report renderer needs,
/// so no renderer ever recomputes scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub mode: Mode,
    pub timestamp: DateTime<Utc>,
    /// Aggregate performance score in [0,100]
    pub score: f64,
    pub band: Band,
    pub breakdown: Vec<CategoryScore>,
    /// Ranked findings, High first
    pub findings: Vec<Finding>,
    pub findings_summary: FindingsSummary,
    pub snapshot: SystemSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_id_deterministic() {
        let a = deterministic_finding_id("cpu-load", Category::Cpu, "High CPU load");
        let b = deterministic_finding_id("cpu-load", Category::Cpu, "High CPU load");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);

        let c = deterministic_finding_id("cpu-load", Category::Cpu, "Different title");
        assert_ne!(a, c);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_findings_summary() {
        let findings = vec![
            Finding::new("a", Category::Cpu, Severity::High, "x", "y"),
            Finding::new("b", Category::Disk, Severity::Low, "x", "y"),
            Finding::new("c", Category::Memory, Severity::High, "x", "y"),
        ];
        let summary = FindingsSummary::from_findings(&findings);
        assert_eq!(summary.high, 2);
        assert_eq!(summary.low, 1);
        assert_eq!(summary.medium, 0);
        assert_eq!(summary.total, 3);
    }

    #[test]
    fn test_finding_round_trips_with_inexact_impact() {
        // Threshold arithmetic produces impacts with no short decimal form;
        // serialization must reproduce the exact bit pattern
        let impact = (0.55 - 0.50) / (0.75 - 0.50);
        let finding = Finding::new("cpu-load", Category::Cpu, Severity::Medium, "t", "d")
            .with_impact(impact);
        let json = serde_json::to_string(&finding).unwrap();
        let parsed: Finding = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, finding);
        assert_eq!(parsed.impact.to_bits(), impact.to_bits());
    }

    #[test]
    fn test_band_cutoffs() {
        assert_eq!(Band::from_score(92.0), Band::Excellent);
        assert_eq!(Band::from_score(85.0), Band::Excellent);
        assert_eq!(Band::from_score(70.0), Band::Good);
        assert_eq!(Band::from_score(55.0), Band::Fair);
        assert_eq!(Band::from_score(54.9), Band::Poor);
        assert_eq!(Band::from_score(0.0), Band::Poor);
    }
}
