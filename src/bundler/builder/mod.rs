//! Packaging run orchestration and results.
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - [`Packer`], which runs the platform handlers
//! - [`outcome`] - per-platform results and the run report

mod checksum;
mod orchestrator;
mod outcome;

pub use checksum::calculate_sha256;
pub use orchestrator::Packer;
pub use outcome::{PackReport, PackedArtifact, PlatformOutcome};
