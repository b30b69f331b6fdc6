//! Live snapshot provider backed by sysinfo
//!
//! The only module in the crate that talks to the operating system. It is
//! strictly read-only apart from one throwaway temp file used to sample disk
//! write latency. Fields the OS declines to report stay `None`; the provider
//! never invents values.

use crate::error::ZeroLagError;
use crate::snapshot::{
    BootImpact, DiskUsage, HostInfo, ProcessSample, SnapshotProvider, StartupItem, SystemSnapshot,
};
use chrono::Utc;
use std::io::Write;
use std::time::{Duration, Instant};
use sysinfo::{CpuExt, DiskExt, PidExt, ProcessExt, System, SystemExt};
use tracing::{debug, warn};

/// Delay between the two CPU refreshes that bracket the load sample
const CPU_SAMPLE_INTERVAL: Duration = Duration::from_millis(600);

/// Processes kept in the snapshot, sorted by CPU then memory
const TOP_PROCESS_LIMIT: usize = 16;

/// Bytes written for the disk latency probe
const LATENCY_PROBE_BYTES: usize = 256 * 1024;

/// Captures live snapshots of the local machine.
pub struct LiveProvider {
    system: System,
}

impl LiveProvider {
    pub fn new() -> Self {
        Self {
            system: System::new_all(),
        }
    }
}

impl Default for LiveProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotProvider for LiveProvider {
    fn capture(&mut self) -> Result<SystemSnapshot, ZeroLagError> {
        let system = &mut self.system;

        // CPU usage needs two refreshes with a delay in between
        system.refresh_cpu();
        std::thread::sleep(CPU_SAMPLE_INTERVAL);
        system.refresh_cpu();
        system.refresh_memory();
        system.refresh_processes();
        system.refresh_disks_list();
        system.refresh_disks();

        if system.cpus().is_empty() && system.total_memory() == 0 {
            return Err(ZeroLagError::Collection(
                "OS reported neither CPUs nor memory".to_string(),
            ));
        }

        let logical_cores = system.cpus().len();
        let cpu_load_pct = if logical_cores == 0 {
            None
        } else {
            let sum: f32 = system.cpus().iter().map(|c| c.cpu_usage()).sum();
            Some((sum / logical_cores as f32) as f64)
        };

        // sysinfo 0.29 reports memory in KiB
        let memory_total_bytes = match system.total_memory() {
            0 => None,
            kb => Some(kb * 1024),
        };
        let memory_used_bytes = memory_total_bytes.map(|_| system.used_memory() * 1024);

        let disks: Vec<DiskUsage> = system
            .disks()
            .iter()
            .filter(|d| d.total_space() > 0)
            .map(|d| DiskUsage {
                mount: d.mount_point().to_string_lossy().to_string(),
                fs: String::from_utf8_lossy(d.file_system()).to_string(),
                total_bytes: d.total_space(),
                free_bytes: d.available_space(),
            })
            .collect();

        let mut processes: Vec<ProcessSample> = system
            .processes()
            .iter()
            .map(|(pid, p)| ProcessSample {
                name: p.name().to_string(),
                pid: pid.as_u32(),
                // sysinfo reports per-core percent; scale to whole-machine
                cpu_pct: p.cpu_usage() as f64 / logical_cores.max(1) as f64,
                memory_bytes: p.memory() * 1024,
            })
            .collect();
        processes.sort_by(|a, b| {
            b.cpu_pct
                .total_cmp(&a.cpu_pct)
                .then(b.memory_bytes.cmp(&a.memory_bytes))
        });
        processes.truncate(TOP_PROCESS_LIMIT);

        let host = HostInfo {
            hostname: system.host_name(),
            os_name: system.name(),
            os_version: system.os_version(),
            cpu_brand: system.cpus().first().map(|c| c.brand().to_string()),
            physical_cores: system.physical_core_count(),
            logical_cores: Some(logical_cores).filter(|n| *n > 0),
        };

        let disk_latency_ms = sample_disk_latency();
        let startup_items = read_startup_items();
        debug!(
            processes = processes.len(),
            disks = disks.len(),
            startup_items = startup_items.len(),
            "captured live snapshot"
        );

        Ok(SystemSnapshot {
            captured_at: Utc::now(),
            host,
            cpu_load_pct,
            memory_used_bytes,
            memory_total_bytes,
            disks,
            disk_latency_ms,
            startup_items,
            processes,
        })
    }
}

/// Time a small write + sync against the system temp directory.
///
/// A coarse proxy for storage responsiveness, not a benchmark. Any failure
/// leaves the metric unavailable.
fn sample_disk_latency() -> Option<f64> {
    let path = std::env::temp_dir().join(format!("zerolag-probe-{}.tmp", std::process::id()));
    let payload = vec![0u8; LATENCY_PROBE_BYTES];

    let started = Instant::now();
    let result = std::fs::File::create(&path).and_then(|mut f| {
        f.write_all(&payload)?;
        f.sync_all()
    });
    let elapsed = started.elapsed();
    let _ = std::fs::remove_file(&path);

    match result {
        Ok(()) => Some(elapsed.as_secs_f64() * 1000.0),
        Err(e) => {
            warn!("disk latency probe failed: {e}");
            None
        }
    }
}

/// Read startup entries from the common Run registry locations.
#[cfg(windows)]
fn read_startup_items() -> Vec<StartupItem> {
    use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};
    use winreg::RegKey;

    let locations = [
        (
            RegKey::predef(HKEY_CURRENT_USER),
            r"Software\Microsoft\Windows\CurrentVersion\Run",
        ),
        (
            RegKey::predef(HKEY_LOCAL_MACHINE),
            r"Software\Microsoft\Windows\CurrentVersion\Run",
        ),
        (
            RegKey::predef(HKEY_LOCAL_MACHINE),
            r"Software\Wow6432Node\Microsoft\Windows\CurrentVersion\Run",
        ),
    ];

    let mut items = Vec::new();
    for (root, path) in locations {
        let Ok(key) = root.open_subkey(path) else {
            continue;
        };
        for (name, value) in key.enum_values().flatten() {
            items.push(StartupItem {
                name,
                path: format!("{value}"),
                enabled: true,
                boot_impact: BootImpact::Unknown,
            });
        }
    }
    items
}

/// Startup entries are a Windows registry concept; elsewhere the list is
/// empty and scores as zero enabled entries.
#[cfg(not(windows))]
fn read_startup_items() -> Vec<StartupItem> {
    Vec::new()
}
