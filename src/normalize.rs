//! Metric normalizer
//!
//! Converts raw snapshot fields into a canonical metric set where every
//! value is a badness-or-health fraction in [0,1], or an explicit
//! `Unavailable` marker. The distinction between "no data" and "measured
//! zero" is the central subtlety of the whole scoring pipeline, so metrics
//! are a tagged type rather than a bare number: downstream code is forced to
//! handle both arms.
//!
//! Normalization never fails. Malformed or out-of-range raw values are
//! clamped into range and flagged as degraded.

use crate::snapshot::SystemSnapshot;
use serde::{Deserialize, Serialize};

/// Half-saturation point of the latency curve: a 100ms sample normalizes
/// to 0.5, and the curve approaches 1.0 asymptotically from there.
const LATENCY_HALF_MS: f64 = 100.0;

/// A normalized metric value, or its explicit absence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Metric {
    Present {
        /// Value in [0,1]
        value: f64,
        /// Set when the raw input was out of range and had to be clamped
        degraded: bool,
    },
    Unavailable,
}

impl Metric {
    fn present(value: f64) -> Self {
        Metric::Present {
            value,
            degraded: false,
        }
    }

    /// Clamp into [0,1], flagging degraded input when clamping changed it.
    fn clamped(raw: f64) -> Self {
        if raw.is_nan() {
            return Metric::Unavailable;
        }
        let value = raw.clamp(0.0, 1.0);
        Metric::Present {
            value,
            degraded: value != raw,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Present { value, .. } => Some(*value),
            Metric::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Metric::Present { .. })
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Metric::Present { degraded: true, .. })
    }
}

/// Canonical metric set derived from one snapshot
///
/// All transforms are monotonic in the underlying raw value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    /// CPU load fraction; 1.0 = fully loaded
    pub cpu_load: Metric,
    /// Memory used / total; 1.0 = exhausted
    pub memory_pressure: Metric,
    /// Worst-disk free fraction; 0.0 = full disk
    pub disk_free: Metric,
    /// Saturating latency badness; 1.0 = pathologically slow
    pub disk_latency: Metric,
}

/// Normalize a snapshot. Pure; never errors on malformed input.
pub fn normalize(snapshot: &SystemSnapshot) -> NormalizedMetrics {
    NormalizedMetrics {
        cpu_load: snapshot
            .cpu_load_pct
            .map(|pct| Metric::clamped(pct / 100.0))
            .unwrap_or(Metric::Unavailable),
        memory_pressure: normalize_memory(snapshot),
        disk_free: normalize_disk_free(snapshot),
        disk_latency: snapshot
            .disk_latency_ms
            .map(normalize_latency)
            .unwrap_or(Metric::Unavailable),
    }
}

fn normalize_memory(snapshot: &SystemSnapshot) -> Metric {
    match (snapshot.memory_used_bytes, snapshot.memory_total_bytes) {
        (Some(used), Some(total)) if total > 0 => Metric::clamped(used as f64 / total as f64),
        _ => Metric::Unavailable,
    }
}

/// The worst disk governs: one full volume slows the machine regardless of
/// how roomy the others are.
fn normalize_disk_free(snapshot: &SystemSnapshot) -> Metric {
    let worst = snapshot
        .disks
        .iter()
        .filter_map(|d| d.free_fraction())
        .min_by(f64::total_cmp);
    match worst {
        Some(fraction) => Metric::clamped(fraction),
        None => Metric::Unavailable,
    }
}

/// Badness of a raw latency value under the same curve `normalize` applies.
///
/// Rules use this to project their millisecond thresholds into normalized
/// space, so thresholds and metric stay on one scale.
pub fn latency_badness(ms: f64) -> f64 {
    let ms = ms.max(0.0);
    ms / (ms + LATENCY_HALF_MS)
}

/// Inverse saturating curve: ms / (ms + 100).
///
/// Very high latency asymptotically approaches 1.0 "bad" instead of growing
/// unbounded, so a pathological 10s sample cannot dominate the score any
/// more than a merely terrible 1s one.
fn normalize_latency(ms: f64) -> Metric {
    if ms.is_nan() {
        return Metric::Unavailable;
    }
    if ms < 0.0 {
        return Metric::Present {
            value: 0.0,
            degraded: true,
        };
    }
    Metric::present(ms / (ms + LATENCY_HALF_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::DiskUsage;
    use chrono::Utc;

    fn snapshot() -> SystemSnapshot {
        SystemSnapshot::empty(Utc::now())
    }

    #[test]
    fn test_cpu_load_normalizes() {
        let mut snap = snapshot();
        snap.cpu_load_pct = Some(42.0);
        let m = normalize(&snap);
        assert_eq!(m.cpu_load.value(), Some(0.42));
        assert!(!m.cpu_load.is_degraded());
    }

    #[test]
    fn test_out_of_range_clamps_and_flags_degraded() {
        let mut snap = snapshot();
        snap.cpu_load_pct = Some(130.0);
        let m = normalize(&snap);
        assert_eq!(m.cpu_load.value(), Some(1.0));
        assert!(m.cpu_load.is_degraded());

        snap.cpu_load_pct = Some(-5.0);
        let m = normalize(&snap);
        assert_eq!(m.cpu_load.value(), Some(0.0));
        assert!(m.cpu_load.is_degraded());
    }

    #[test]
    fn test_missing_fields_are_unavailable_not_zero() {
        let m = normalize(&snapshot());
        assert_eq!(m.cpu_load, Metric::Unavailable);
        assert_eq!(m.memory_pressure, Metric::Unavailable);
        assert_eq!(m.disk_free, Metric::Unavailable);
        assert_eq!(m.disk_latency, Metric::Unavailable);
    }

    #[test]
    fn test_memory_pressure() {
        let mut snap = snapshot();
        snap.memory_used_bytes = Some(6 * 1024);
        snap.memory_total_bytes = Some(8 * 1024);
        let m = normalize(&snap);
        assert_eq!(m.memory_pressure.value(), Some(0.75));

        // used > total clamps rather than erroring
        snap.memory_used_bytes = Some(10 * 1024);
        let m = normalize(&snap);
        assert_eq!(m.memory_pressure.value(), Some(1.0));
        assert!(m.memory_pressure.is_degraded());

        // zero total is unavailable, not infinity
        snap.memory_total_bytes = Some(0);
        let m = normalize(&snap);
        assert_eq!(m.memory_pressure, Metric::Unavailable);
    }

    #[test]
    fn test_worst_disk_governs() {
        let mut snap = snapshot();
        snap.disks = vec![
            DiskUsage {
                mount: "C:".into(),
                fs: "NTFS".into(),
                total_bytes: 1000,
                free_bytes: 500,
            },
            DiskUsage {
                mount: "D:".into(),
                fs: "NTFS".into(),
                total_bytes: 1000,
                free_bytes: 100,
            },
        ];
        let m = normalize(&snap);
        assert_eq!(m.disk_free.value(), Some(0.1));
    }

    #[test]
    fn test_latency_curve_saturates_monotonically() {
        let lo = normalize_latency(5.0).value().unwrap();
        let mid = normalize_latency(100.0).value().unwrap();
        let hi = normalize_latency(1000.0).value().unwrap();
        let extreme = normalize_latency(100_000.0).value().unwrap();

        assert!(lo < mid && mid < hi && hi < extreme);
        assert!((mid - 0.5).abs() < 1e-9);
        assert!(extreme < 1.0);
    }

    #[test]
    fn test_negative_latency_clamps_degraded() {
        let m = normalize_latency(-10.0);
        assert_eq!(m.value(), Some(0.0));
        assert!(m.is_degraded());
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let mut snap = snapshot();
        snap.cpu_load_pct = Some(55.0);
        snap.disk_latency_ms = Some(20.0);
        assert_eq!(normalize(&snap), normalize(&snap));
    }
}
