//! The `scan` command: capture, score, report

use crate::config::UserConfig;
use crate::pipeline::run_scan;
use crate::policy::ModePolicy;
use crate::reporters::{self, file_extension, OutputFormat};
use crate::snapshot::{LiveProvider, SnapshotProvider};
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Config file picked up from the working directory when --config is absent
const DEFAULT_CONFIG_FILE: &str = "zerolag.toml";

pub fn run(
    mode: &str,
    format: &str,
    out: &Path,
    config_path: Option<&Path>,
    no_export: bool,
) -> Result<()> {
    // Fail on bad arguments before touching the system
    let output_format = OutputFormat::from_str(format)?;
    let config = match config_path {
        Some(path) => UserConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => UserConfig::load(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    let policy = ModePolicy::resolve(mode)?;
    let overrides = config.for_mode(policy.mode);
    let policy = policy.with_overrides(overrides);
    info!(mode = %policy.mode, "starting scan");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Capturing system snapshot...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let mut provider = LiveProvider::new();
    let snapshot = provider.capture();
    spinner.finish_and_clear();
    let snapshot = snapshot.context("Failed to capture a system snapshot")?;

    let result = run_scan(snapshot, &policy)?;

    print!("{}", reporters::report_with_format(&result, output_format)?);

    if !no_export {
        std::fs::create_dir_all(out)
            .with_context(|| format!("Failed to create output directory {}", out.display()))?;

        let json_path = out.join(format!("scan.{}", file_extension(OutputFormat::Json)));
        std::fs::write(
            &json_path,
            reporters::report_with_format(&result, OutputFormat::Json)?,
        )
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

        let md_path = out.join(format!("report.{}", file_extension(OutputFormat::Markdown)));
        std::fs::write(
            &md_path,
            reporters::report_with_format(&result, OutputFormat::Markdown)?,
        )
        .with_context(|| format!("Failed to write {}", md_path.display()))?;

        eprintln!(
            "{}",
            style(format!(
                "Saved {} and {}",
                json_path.display(),
                md_path.display()
            ))
            .dim()
        );
    }

    Ok(())
}
