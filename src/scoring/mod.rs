//! Score aggregation
//!
//! Combines per-category sub-scores into the single 0-100 Performance
//! Score. The aggregate is a weighted mean over the categories that
//! actually scored; abstained categories are excluded from both the
//! numerator and the denominator. That renormalization is the property
//! that keeps "no data" from masquerading as "bad score".

use crate::error::ZeroLagError;
use crate::models::{Band, CategoryScore, ScoreBreakdown};
use crate::policy::ModePolicy;
use crate::rules::Evaluation;
use tracing::{debug, info};

/// Aggregate an evaluation into the final breakdown.
///
/// Deterministic and side-effect free: the same evaluation and policy
/// always produce the same breakdown. Fails with `NoData` when every
/// category abstained; zero information must not become a score.
pub fn aggregate(eval: &Evaluation, policy: &ModePolicy) -> Result<ScoreBreakdown, ZeroLagError> {
    let mut categories = Vec::with_capacity(eval.categories.len());
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    // Fixed presentation order, independent of map iteration details
    for category in crate::models::Category::ALL {
        let Some(sub) = eval.categories.get(&category) else {
            continue;
        };
        let weight = policy.weights.get(category);
        if let Some(score) = sub {
            numerator += weight * score;
            denominator += weight;
        } else {
            debug!(%category, "category not scored, renormalizing weights");
        }
        categories.push(CategoryScore {
            category,
            sub_score: *sub,
            weight,
        });
    }

    if denominator <= 0.0 {
        return Err(ZeroLagError::NoData);
    }

    let score = (numerator / denominator).clamp(0.0, 100.0);
    let band = Band::from_score(score);
    info!(score = %format!("{score:.1}"), %band, "aggregated performance score");

    Ok(ScoreBreakdown {
        score,
        band,
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::policy::{Mode, ModePolicy};
    use std::collections::BTreeMap;

    fn eval_of(entries: &[(Category, Option<f64>)]) -> Evaluation {
        Evaluation {
            categories: entries.iter().cloned().collect::<BTreeMap<_, _>>(),
            findings: Vec::new(),
        }
    }

    #[test]
    fn test_weighted_mean_all_present() {
        let policy = ModePolicy::for_mode(Mode::General);
        let eval = eval_of(&[
            (Category::Cpu, Some(80.0)),
            (Category::Memory, Some(60.0)),
            (Category::Disk, Some(100.0)),
            (Category::Startup, Some(40.0)),
        ]);
        let breakdown = aggregate(&eval, &policy).unwrap();
        // 0.30*80 + 0.25*60 + 0.25*100 + 0.20*40 = 72
        assert!((breakdown.score - 72.0).abs() < 1e-9);
        assert_eq!(breakdown.band, Band::Good);
        assert_eq!(breakdown.categories.len(), 4);
    }

    #[test]
    fn test_abstained_category_excluded_not_zeroed() {
        let policy = ModePolicy::for_mode(Mode::General);
        let eval = eval_of(&[
            (Category::Cpu, Some(90.0)),
            (Category::Memory, None),
            (Category::Disk, Some(90.0)),
            (Category::Startup, Some(90.0)),
        ]);
        let breakdown = aggregate(&eval, &policy).unwrap();
        // Weighted mean over present categories only: exactly 90
        assert!((breakdown.score - 90.0).abs() < 1e-9);

        // The abstained category still appears, explicitly unscored
        let memory = breakdown
            .categories
            .iter()
            .find(|c| c.category == Category::Memory)
            .unwrap();
        assert_eq!(memory.sub_score, None);
    }

    #[test]
    fn test_all_abstained_is_no_data_not_a_score() {
        let policy = ModePolicy::for_mode(Mode::General);
        let eval = eval_of(&[
            (Category::Cpu, None),
            (Category::Memory, None),
            (Category::Disk, None),
            (Category::Startup, None),
        ]);
        assert!(matches!(
            aggregate(&eval, &policy),
            Err(ZeroLagError::NoData)
        ));
    }

    #[test]
    fn test_score_stays_in_range() {
        let policy = ModePolicy::for_mode(Mode::Gaming);
        for (lo, hi) in [(0.0, 0.0), (100.0, 100.0), (0.0, 100.0)] {
            let eval = eval_of(&[
                (Category::Cpu, Some(lo)),
                (Category::Memory, Some(hi)),
                (Category::Disk, Some(lo)),
                (Category::Startup, Some(hi)),
                (Category::Responsiveness, Some(lo)),
            ]);
            let breakdown = aggregate(&eval, &policy).unwrap();
            assert!((0.0..=100.0).contains(&breakdown.score));
        }
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let policy = ModePolicy::for_mode(Mode::General);
        let eval = eval_of(&[
            (Category::Cpu, Some(73.2)),
            (Category::Memory, Some(55.5)),
            (Category::Disk, None),
            (Category::Startup, Some(88.8)),
        ]);
        let a = aggregate(&eval, &policy).unwrap();
        let b = aggregate(&eval, &policy).unwrap();
        assert_eq!(a, b);
    }
}
