//! ZeroLag - Windows PC performance diagnostic CLI
//!
//! A read-only scanner that scores a machine 0-100 and explains what is
//! slowing it down. Nothing on the system is ever modified.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zerolag::cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging; RUST_LOG wins over --log-level when set
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone())),
        )
        .init();

    cli::run(cli)
}
