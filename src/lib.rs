//! Packages a built Java application into deployable bundles.
//!
//! This library provides the packaging pipeline for:
//! - Windows service packages (.zip, WinSW)
//! - Linux script-controlled packages (.tar.gz)
//! - Docker images
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;
pub mod source;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
