//! Point-in-time system snapshots
//!
//! A `SystemSnapshot` is one read-only capture of machine state, produced by
//! a `SnapshotProvider` and owned by a single scan run. Every field the OS
//! may decline to report is an `Option`; the normalizer turns missing fields
//! into explicit metric abstentions, never silent zeros.

mod live;

pub use live::LiveProvider;

use crate::error::ZeroLagError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source of snapshots; the only seam through which the OS is observed.
///
/// Implementations may block (the live provider samples CPU over ~600ms).
/// A failed capture is a `Collection` error — the core treats it as "no
/// snapshot", never as a degraded one.
pub trait SnapshotProvider {
    fn capture(&mut self) -> Result<SystemSnapshot, ZeroLagError>;
}

/// Static host identity carried through to reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostInfo {
    pub hostname: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub cpu_brand: Option<String>,
    pub physical_cores: Option<usize>,
    pub logical_cores: Option<usize>,
}

/// Usage of a single mounted filesystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub mount: String,
    pub fs: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
}

impl DiskUsage {
    /// Free fraction in [0,1], or None for a zero-sized volume.
    pub fn free_fraction(&self) -> Option<f64> {
        if self.total_bytes == 0 {
            None
        } else {
            Some(self.free_bytes as f64 / self.total_bytes as f64)
        }
    }
}

/// Estimated boot impact of a startup entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BootImpact {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
}

/// One startup entry
///
/// Identity is the (name, path) pair; duplicate names are allowed and each
/// entry is evaluated independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupItem {
    pub name: String,
    pub path: String,
    pub enabled: bool,
    pub boot_impact: BootImpact,
}

/// One process observed at sample time
///
/// Multiple samples of the same process name are kept as-is; any
/// aggregation by name is a rule decision, not a data-model invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    pub name: String,
    pub pid: u32,
    /// CPU% across all cores at sample time
    pub cpu_pct: f64,
    pub memory_bytes: u64,
}

/// Immutable point-in-time record of machine state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub captured_at: DateTime<Utc>,
    pub host: HostInfo,
    /// System-wide CPU load in percent [0,100]
    pub cpu_load_pct: Option<f64>,
    pub memory_used_bytes: Option<u64>,
    pub memory_total_bytes: Option<u64>,
    pub disks: Vec<DiskUsage>,
    /// Small-write latency sample against the system temp directory
    pub disk_latency_ms: Option<f64>,
    pub startup_items: Vec<StartupItem>,
    pub processes: Vec<ProcessSample>,
}

impl SystemSnapshot {
    /// An empty snapshot with every field unavailable.
    ///
    /// Scoring one abstains on every metric-backed category; only the
    /// startup rules still score, since an empty startup list is a
    /// measurement rather than missing data.
    pub fn empty(captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            host: HostInfo::default(),
            cpu_load_pct: None,
            memory_used_bytes: None,
            memory_total_bytes: None,
            disks: Vec::new(),
            disk_latency_ms: None,
            startup_items: Vec::new(),
            processes: Vec::new(),
        }
    }

    /// Enabled startup items only; disabled entries cost nothing at boot.
    pub fn enabled_startup_items(&self) -> impl Iterator<Item = &StartupItem> {
        self.startup_items.iter().filter(|s| s.enabled)
    }
}
