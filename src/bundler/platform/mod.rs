//! Platform handlers.
//!
//! Each platform implements [`PackHandler`]. Shared scaffolding (working
//! directory, default resources, custom resources, archiving) lives in
//! [`WorkDir`] and is composed into the handlers rather than inherited.
//!
//! # Module Organization
//!
//! - `workdir` - working directory lifecycle shared by every platform
//! - `linux` - `.tar.gz` package with start/stop/restart scripts
//! - `windows` - `.zip` package with a WinSW service descriptor
//! - `docker` - container image built by the container CLI

mod docker;
mod linux;
mod windows;
mod workdir;

pub use docker::DockerHandler;
pub use linux::LinuxHandler;
pub use windows::WindowsHandler;
pub use workdir::WorkDir;

use crate::bundler::{
    PackInfo, Platform, PlatformOutcome,
    resources::ResourceSet,
    utils::{
        http::Fetcher,
        template::{TemplateContext, TemplateRenderer},
    },
};
use serde_json::Value;

/// Everything a handler needs for one packaging run.
///
/// Borrowed from the [`Packer`](crate::bundler::Packer) for the duration of
/// the run; handlers never mutate it.
#[derive(Debug, Clone, Copy)]
pub struct PackContext<'a> {
    /// The packaging request.
    pub info: &'a PackInfo,
    /// Default resources and templates.
    pub resources: &'a ResourceSet,
    /// Template renderer.
    pub renderer: &'a TemplateRenderer,
    /// Remote resource fetcher.
    pub fetcher: &'a Fetcher,
}

/// Produces the deployable for one platform.
///
/// Failures never escape `pack`; they are recorded in the returned
/// [`PlatformOutcome`] so the next platform can still run.
#[allow(async_fn_in_trait)]
pub trait PackHandler {
    /// Platform this handler packs for.
    fn platform(&self) -> Platform;

    /// Runs the full packaging sequence.
    async fn pack(&self, ctx: &PackContext<'_>) -> PlatformOutcome;
}

/// Substitution context shared by every platform's scripts.
///
/// Unset JVM options and program arguments render as empty strings.
pub fn script_context(info: &PackInfo) -> TemplateContext {
    let mut context = TemplateContext::new();
    context.insert("name".into(), Value::from(info.name()));
    context.insert("groupId".into(), Value::from(info.group_id().unwrap_or_default()));
    context.insert("jarName".into(), Value::from(info.jar_name()));
    context.insert("vmOptions".into(), Value::from(info.vm_options().unwrap_or_default()));
    context.insert(
        "programArgs".into(),
        Value::from(info.program_args().unwrap_or_default()),
    );
    context.insert("version".into(), Value::from(info.version()));
    context.insert("description".into(), Value::from(info.description()));
    context
}
