//! Recommendation prioritizer
//!
//! Deduplicates and ranks raw rule findings into the ordered list users
//! see. Two rules pointing at the same category and the same suggested
//! action are one piece of advice, not two; the merged finding keeps the
//! higher severity and the stronger impact.
//!
//! Ordering is fully deterministic: severity tier first (High before
//! Medium before Low), then estimated impact descending, then rule id
//! ascending as the final tie-break.

use crate::models::Finding;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Dedupe and rank findings.
pub fn prioritize(findings: Vec<Finding>) -> Vec<Finding> {
    let mut merged: Vec<Finding> = Vec::with_capacity(findings.len());
    // (category, action) -> index into merged, for findings that carry an action
    let mut by_advice: HashMap<(String, String), usize> = HashMap::new();

    for finding in findings {
        let key = finding
            .action
            .as_ref()
            .map(|a| (finding.category.to_string(), a.clone()));

        match key.and_then(|k| by_advice.get(&k).copied()) {
            Some(idx) => {
                let existing = &mut merged[idx];
                *existing = merge(existing, &finding);
            }
            None => {
                if let Some(action) = &finding.action {
                    by_advice.insert(
                        (finding.category.to_string(), action.clone()),
                        merged.len(),
                    );
                }
                merged.push(finding);
            }
        }
    }

    merged.sort_by(compare);
    merged
}

/// Combine two findings that give the same advice.
///
/// The dominant finding (higher severity, then higher impact) keeps its
/// identity; the other's title is folded into the detail so no observed
/// signal disappears from the report.
fn merge(a: &Finding, b: &Finding) -> Finding {
    let (dominant, other) = match b.severity.cmp(&a.severity).then(b.impact.total_cmp(&a.impact)) {
        Ordering::Greater => (b, a),
        _ => (a, b),
    };
    let mut out = dominant.clone();
    out.impact = dominant.impact.max(other.impact);
    if !other.title.is_empty() && !out.detail.contains(&other.title) {
        out.detail = format!("{} Related: {}.", out.detail, other.title.trim_end_matches('.'));
    }
    out
}

fn compare(a: &Finding, b: &Finding) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| b.impact.total_cmp(&a.impact))
        .then_with(|| a.rule.cmp(&b.rule))
}
