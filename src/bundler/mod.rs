//! Packaging pipeline.
//!
//! Turns a runnable jar into platform deployables:
//! - Windows: `.zip` with a WinSW service descriptor and control scripts
//! - Linux: `.tar.gz` with start/stop/restart shell scripts
//! - Docker: a container image, optionally pushed and saved
//!
//! Build a [`PackInfo`] with [`PackInfoBuilder`], hand it to a [`Packer`] and
//! inspect the returned [`PackReport`].
//!
//! # Module Organization
//!
//! - [`builder`] - the [`Packer`] orchestrator and its results
//! - [`error`] - error types
//! - [`platform`] - per-platform handlers
//! - [`resources`] - embedded default documents and templates
//! - [`settings`] - the packaging request and its builder
//! - [`utils`] - archives, filesystem, HTTP and templating helpers

pub mod builder;
pub mod error;
pub mod platform;
pub mod resources;
pub mod settings;
pub mod utils;

pub use builder::{PackReport, PackedArtifact, Packer, PlatformOutcome};
pub use error::{Context, Error, ErrorExt, Result};
pub use platform::{PackContext, PackHandler};
pub use resources::ResourceSet;
pub use settings::{
    CopyResource, DockerSettings, PackInfo, PackInfoBuilder, Platform, WindowsSettings,
};
