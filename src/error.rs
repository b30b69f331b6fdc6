//! Error taxonomy for ZeroLag
//!
//! Three failures are fatal to a run: an unknown mode, a failed snapshot
//! capture, and aggregation over zero scored categories. Individual
//! unavailable metrics are *not* errors; they surface as abstentions in the
//! score breakdown and the run continues.

use thiserror::Error;

/// Errors that can occur during a scan run
#[derive(Error, Debug)]
pub enum ZeroLagError {
    /// Unknown mode string. Never silently substituted with a default.
    #[error("unknown mode '{0}' (expected 'general' or 'gaming')")]
    InvalidMode(String),

    /// The snapshot provider failed. The core never fabricates data in
    /// response; the caller decides whether to abort or retry.
    #[error("snapshot collection failed: {0}")]
    Collection(String),

    /// Every category abstained, so there is no data to score.
    /// Returning 0 or 100 here would be a lie.
    #[error("no scored categories: every metric was unavailable")]
    NoData,

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ZeroLagError>;
