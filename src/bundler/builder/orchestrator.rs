//! Packaging run orchestration.
//!
//! This module provides the [`Packer`] that runs every enabled platform
//! handler for one [`PackInfo`] and collects their outcomes.

use crate::bundler::{
    PackInfo, PackReport, Platform, PlatformOutcome, Result,
    platform::{DockerHandler, LinuxHandler, PackContext, PackHandler, WindowsHandler},
    resources::ResourceSet,
    utils::{http::Fetcher, template::TemplateRenderer},
};

/// Packaging run orchestrator.
///
/// Owns the resources shared by every handler of one run: the request, the
/// template lookup, the renderer and the HTTP client.
///
/// # Examples
///
/// ```no_run
/// use jpack::bundler::{PackInfoBuilder, Packer, Platform};
///
/// # async fn example() -> jpack::bundler::Result<()> {
/// let info = PackInfoBuilder::new()
///     .artifact_id("demo")
///     .version("1.0.0")
///     .target_dir("target")
///     .platforms(vec![Platform::Linux, Platform::Windows])
///     .build()?;
///
/// let report = Packer::new(info)?.pack().await;
/// for outcome in report.outcomes() {
///     if let Some(artifact) = outcome.artifact() {
///         println!("{}: {:?}", outcome.platform(), artifact.path());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Packer {
    info: PackInfo,
    resources: ResourceSet,
    renderer: TemplateRenderer,
    fetcher: Fetcher,
}

impl Packer {
    /// Creates a packer for `info`.
    ///
    /// Templates are looked up in `info.templates_dir()` first when set.
    pub fn new(info: PackInfo) -> Result<Self> {
        let resources = match info.templates_dir() {
            Some(dir) => ResourceSet::with_override_dir(dir),
            None => ResourceSet::embedded(),
        };
        let fetcher = Fetcher::new(info.fetch_timeout())?;

        Ok(Self {
            info,
            resources,
            renderer: TemplateRenderer::new(),
            fetcher,
        })
    }

    /// Packs every platform enabled in the request, in order.
    pub async fn pack(&self) -> PackReport {
        self.pack_platforms(self.info.platforms()).await
    }

    /// Packs the given platforms, in order.
    ///
    /// Platforms run one after another; a failed platform never stops the
    /// next one.
    pub async fn pack_platforms(&self, platforms: &[Platform]) -> PackReport {
        let ctx = PackContext {
            info: &self.info,
            resources: &self.resources,
            renderer: &self.renderer,
            fetcher: &self.fetcher,
        };

        let mut report = PackReport::default();
        for &platform in platforms {
            if !self.info.is_enabled(platform) {
                log::debug!("{platform} is not in the configured platforms, packing it anyway");
            }
            log::info!("Packing {} for {platform}", self.info.name());
            let outcome = match platform {
                Platform::Windows => run(&WindowsHandler, &ctx).await,
                Platform::Linux => run(&LinuxHandler, &ctx).await,
                Platform::Docker => run(&DockerHandler, &ctx).await,
            };
            report.push(outcome);
        }
        report
    }

    /// Returns the packaging request.
    pub fn info(&self) -> &PackInfo {
        &self.info
    }
}

async fn run(handler: &impl PackHandler, ctx: &PackContext<'_>) -> PlatformOutcome {
    let outcome = handler.pack(ctx).await;
    match outcome.artifact() {
        Some(artifact) if outcome.is_clean() => {
            log::info!("[{}] Done: {}", handler.platform(), describe(artifact));
        }
        Some(artifact) => log::warn!(
            "[{}] Done with {} error(s): {}",
            handler.platform(),
            outcome.errors().len(),
            describe(artifact)
        ),
        None => log::error!("[{}] Failed", handler.platform()),
    }
    outcome
}

fn describe(artifact: &crate::bundler::PackedArtifact) -> String {
    match (&artifact.image, artifact.path()) {
        (Some(image), _) => image.clone(),
        (None, Some(path)) => path.display().to_string(),
        (None, None) => String::new(),
    }
}
