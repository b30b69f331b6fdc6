//! Markdown reporter
//!
//! Full shareable report: score, breakdown table, snapshot details,
//! storage and startup inventories, and the prioritized recommendations.

use crate::models::{ScanResult, Severity};
use crate::reporters::human_bytes;
use anyhow::Result;
use std::fmt::Write;

pub fn render(result: &ScanResult) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "# ZeroLag Performance Report")?;
    writeln!(out)?;
    writeln!(
        out,
        "*Generated {} in **{}** mode*",
        result.timestamp.format("%Y-%m-%d %H:%M UTC"),
        result.mode
    )?;
    writeln!(out)?;

    writeln!(out, "## Score")?;
    writeln!(out)?;
    writeln!(
        out,
        "**{:.0} / 100** ({})",
        result.score, result.band
    )?;
    writeln!(out)?;

    writeln!(out, "## Category Breakdown")?;
    writeln!(out)?;
    writeln!(out, "| Category | Sub-score | Weight |")?;
    writeln!(out, "|----------|-----------|--------|")?;
    for entry in &result.breakdown {
        let sub = match entry.sub_score {
            Some(s) => format!("{s:.1}"),
            None => "n/a (no data)".to_string(),
        };
        writeln!(
            out,
            "| {} | {} | {:.0}% |",
            entry.category.label(),
            sub,
            entry.weight * 100.0
        )?;
    }
    writeln!(out)?;

    let snap = &result.snapshot;
    writeln!(out, "## System Snapshot")?;
    writeln!(out)?;
    if let Some(hostname) = &snap.host.hostname {
        let os = match (&snap.host.os_name, &snap.host.os_version) {
            (Some(name), Some(version)) => format!("{name} {version}"),
            (Some(name), None) => name.clone(),
            _ => "unknown OS".to_string(),
        };
        writeln!(out, "- Host: {hostname} ({os})")?;
    }
    if let Some(cpu_brand) = &snap.host.cpu_brand {
        let cores = match (snap.host.physical_cores, snap.host.logical_cores) {
            (Some(p), Some(l)) => format!(", {p} cores / {l} threads"),
            (_, Some(l)) => format!(", {l} threads"),
            _ => String::new(),
        };
        writeln!(out, "- CPU: {cpu_brand}{cores}")?;
    }
    match snap.cpu_load_pct {
        Some(cpu) => writeln!(out, "- CPU load: {cpu:.0}%")?,
        None => writeln!(out, "- CPU load: unavailable")?,
    }
    match (snap.memory_used_bytes, snap.memory_total_bytes) {
        (Some(used), Some(total)) => writeln!(
            out,
            "- Memory: {} of {} in use",
            human_bytes(used),
            human_bytes(total)
        )?,
        _ => writeln!(out, "- Memory: unavailable")?,
    }
    match snap.disk_latency_ms {
        Some(ms) => writeln!(out, "- Disk write latency: {ms:.1} ms")?,
        None => writeln!(out, "- Disk write latency: unavailable")?,
    }
    writeln!(out)?;

    if !snap.disks.is_empty() {
        writeln!(out, "## Storage")?;
        writeln!(out)?;
        writeln!(out, "| Mount | Filesystem | Free | Total |")?;
        writeln!(out, "|-------|------------|------|-------|")?;
        for disk in &snap.disks {
            let free_pct = disk
                .free_fraction()
                .map(|f| format!(" ({:.0}%)", f * 100.0))
                .unwrap_or_default();
            writeln!(
                out,
                "| {} | {} | {}{free_pct} | {} |",
                disk.mount,
                disk.fs,
                human_bytes(disk.free_bytes),
                human_bytes(disk.total_bytes)
            )?;
        }
        writeln!(out)?;
    }

    if !snap.startup_items.is_empty() {
        let enabled = snap.enabled_startup_items().count();
        writeln!(out, "## Startup Items ({enabled} enabled)")?;
        writeln!(out)?;
        for item in &snap.startup_items {
            let state = if item.enabled { "enabled" } else { "disabled" };
            let impact = format!("{:?}", item.boot_impact).to_lowercase();
            writeln!(out, "- {} ({state}, boot impact: {impact})", item.name)?;
        }
        writeln!(out)?;
    }

    if !snap.processes.is_empty() {
        writeln!(out, "## Top Processes")?;
        writeln!(out)?;
        writeln!(out, "| Process | PID | CPU | Memory |")?;
        writeln!(out, "|---------|-----|-----|--------|")?;
        for proc in &snap.processes {
            writeln!(
                out,
                "| {} | {} | {:.1}% | {} |",
                proc.name,
                proc.pid,
                proc.cpu_pct,
                human_bytes(proc.memory_bytes)
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Recommendations")?;
    writeln!(out)?;
    if result.findings.is_empty() {
        writeln!(out, "No issues found. The system looks healthy.")?;
    } else {
        for (i, finding) in result.findings.iter().enumerate() {
            let severity = match finding.severity {
                Severity::High => "🔴 High",
                Severity::Medium => "🟡 Medium",
                Severity::Low => "⚪ Low",
            };
            writeln!(out, "### {}. {} ({severity})", i + 1, finding.title)?;
            writeln!(out)?;
            writeln!(out, "{}", finding.detail)?;
            writeln!(out)?;
        }
    }

    writeln!(out, "---")?;
    writeln!(
        out,
        "*Read-only diagnostic. No settings were changed on this machine.*"
    )?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_result;

    #[test]
    fn test_markdown_has_all_sections() {
        let rendered = render(&test_result()).unwrap();
        for heading in [
            "# ZeroLag Performance Report",
            "## Score",
            "## Category Breakdown",
            "## System Snapshot",
            "## Storage",
            "## Top Processes",
            "## Recommendations",
        ] {
            assert!(rendered.contains(heading), "missing section {heading}");
        }
    }

    #[test]
    fn test_markdown_breakdown_marks_missing_data() {
        let rendered = render(&test_result()).unwrap();
        assert!(rendered.contains("n/a (no data)"));
    }

    #[test]
    fn test_markdown_orders_recommendations_by_priority() {
        let rendered = render(&test_result()).unwrap();
        let high = rendered.find("High CPU load").unwrap();
        let medium = rendered.find("RAM pressure").unwrap();
        assert!(high < medium);
    }

    #[test]
    fn test_markdown_notes_read_only_posture() {
        let rendered = render(&test_result()).unwrap();
        assert!(rendered.contains("No settings were changed"));
    }
}
