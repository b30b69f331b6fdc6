//! CLI command definitions and handlers

mod scan;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ZeroLag - Windows PC performance diagnostic
///
/// READ-ONLY - Scans never change settings, kill processes, or edit the
/// registry. They only read and report.
#[derive(Parser, Debug)]
#[command(name = "zerolag")]
#[command(
    version,
    about = "Diagnose why a PC feels slow: one 0-100 score, a category breakdown, and prioritized fixes",
    long_about = "ZeroLag takes a point-in-time snapshot of CPU load, memory pressure, disk \
space and latency, startup programs, and running processes, then scores the \
machine 0-100 with per-category sub-scores and a ranked list of recommendations.\n\n\
READ-ONLY - Nothing on the machine is modified. You decide what to act on.",
    after_help = "\
Examples:
  zerolag scan                         Scan in general mode
  zerolag scan --mode gaming           Stricter thresholds, input-path checks
  zerolag scan --format json           JSON on stdout for scripting
  zerolag scan --out C:\\reports        Write scan.json + report.md there"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan this machine and report a performance score
    Scan {
        /// Scan mode: general or gaming
        #[arg(long, short = 'm', default_value = "general")]
        mode: String,

        /// Stdout format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Directory for the scan.json and report.md exports
        #[arg(long, short = 'o', default_value = "reports")]
        out: PathBuf,

        /// Path to a zerolag.toml with threshold/weight overrides
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Skip the file exports, print to stdout only
        #[arg(long)]
        no_export: bool,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Scan {
            mode,
            format,
            out,
            config,
            no_export,
        }) => scan::run(&mode, &format, &out, config.as_deref(), no_export),
        // Bare `zerolag` scans with defaults
        None => scan::run("general", "text", std::path::Path::new("reports"), None, false),
    }
}
