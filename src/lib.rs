//! ZeroLag - Windows PC performance diagnostic
//!
//! Takes a read-only snapshot of a machine (CPU, memory, disks, startup
//! programs, processes), scores it 0-100 under a mode policy, and emits
//! prioritized recommendations. The scan never modifies the system.
//!
//! The pipeline is pure over its inputs: `snapshot` captures, `normalize`
//! turns raw readings into 0-1 badness metrics with explicit absence,
//! `rules` evaluate per-category sub-scores and findings, `scoring`
//! aggregates the weighted mean, `prioritize` ranks the advice, and
//! `reporters` render without recomputing anything.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod policy;
pub mod prioritize;
pub mod reporters;
pub mod rules;
pub mod scoring;
pub mod snapshot;
