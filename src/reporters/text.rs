//! Terminal text reporter with ANSI colors
//!
//! Compact summary for interactive use: the score and band up top,
//! category breakdown, then the prioritized recommendations. Colors key
//! off the band and severity so a glance tells the story.

use crate::models::{Band, ScanResult, Severity};
use crate::reporters::human_bytes;
use anyhow::Result;
use console::style;
use std::fmt::Write;

pub fn render(result: &ScanResult) -> Result<String> {
    let mut out = String::new();

    writeln!(out)?;
    writeln!(
        out,
        "{}",
        style(format!("  ZeroLag Scan ({} mode)", result.mode)).bold()
    )?;
    writeln!(
        out,
        "  {}",
        style(result.timestamp.format("%Y-%m-%d %H:%M UTC")).dim()
    )?;
    writeln!(out)?;

    let score_text = format!("{:.0} / 100", result.score);
    let score_styled = match result.band {
        Band::Excellent => style(score_text).green().bold(),
        Band::Good => style(score_text).green(),
        Band::Fair => style(score_text).yellow().bold(),
        Band::Poor => style(score_text).red().bold(),
    };
    writeln!(out, "  Performance Score: {score_styled}  ({})", result.band)?;
    writeln!(out)?;

    writeln!(out, "  {}", style("Category breakdown").bold())?;
    for entry in &result.breakdown {
        let label = format!("{:<16}", entry.category.label());
        match entry.sub_score {
            Some(sub) => {
                let bar = score_bar(sub);
                writeln!(
                    out,
                    "    {label} {bar} {:>5.1}  (weight {:.0}%)",
                    sub,
                    entry.weight * 100.0
                )?;
            }
            None => {
                writeln!(out, "    {label} {}", style("not scored (no data)").dim())?;
            }
        }
    }
    writeln!(out)?;

    if result.findings.is_empty() {
        writeln!(out, "  {}", style("No issues found.").green())?;
    } else {
        let summary = &result.findings_summary;
        writeln!(
            out,
            "  {} ({} high, {} medium, {} low)",
            style("Recommendations").bold(),
            summary.high,
            summary.medium,
            summary.low
        )?;
        for (i, finding) in result.findings.iter().enumerate() {
            let severity = match finding.severity {
                Severity::High => style("HIGH  ").red().bold(),
                Severity::Medium => style("MEDIUM").yellow(),
                Severity::Low => style("LOW   ").dim(),
            };
            writeln!(out, "    {}. [{severity}] {}", i + 1, finding.title)?;
            writeln!(out, "       {}", style(&finding.detail).dim())?;
        }
    }
    writeln!(out)?;

    if let Some(total) = result.snapshot.memory_total_bytes {
        let used = result.snapshot.memory_used_bytes.unwrap_or(0);
        writeln!(
            out,
            "  {} {} of {} RAM in use",
            style("Snapshot:").dim(),
            human_bytes(used),
            human_bytes(total)
        )?;
    }

    Ok(out)
}

/// Ten-slot bar, filled proportionally to the sub-score
fn score_bar(score: f64) -> String {
    let filled = ((score / 10.0).round() as usize).min(10);
    let bar: String = "█".repeat(filled) + &"░".repeat(10 - filled);
    match Band::from_score(score) {
        Band::Excellent | Band::Good => style(bar).green().to_string(),
        Band::Fair => style(bar).yellow().to_string(),
        Band::Poor => style(bar).red().to_string(),
    }
}
