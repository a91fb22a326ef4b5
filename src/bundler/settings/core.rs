//! Core PackInfo struct and implementations.

use super::{CopyResource, DockerSettings, Platform, WindowsSettings};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Name of the shared home directory under the target directory.
pub const DEFAULT_HOME_DIR_NAME: &str = "jpack";

/// Timeout for a single remote resource fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Description of one packaging request.
///
/// Constructed once via [`PackInfoBuilder`](super::PackInfoBuilder), which
/// validates it, and read-only afterwards. Every platform handler of a run
/// shares the same instance.
///
/// # Examples
///
/// ```no_run
/// use jpack::bundler::{PackInfoBuilder, Platform};
///
/// # fn example() -> jpack::bundler::Result<()> {
/// let info = PackInfoBuilder::new()
///     .artifact_id("demo")
///     .version("1.0.0")
///     .target_dir("target")
///     .vm_options("-Xmx512m")
///     .platforms(vec![Platform::Linux])
///     .build()?;
/// assert_eq!(info.jar_name(), "demo-1.0.0.jar");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct PackInfo {
    pub(super) name: String,
    pub(super) group_id: Option<String>,
    pub(super) artifact_id: String,
    pub(super) version: String,
    pub(super) description: String,
    pub(super) target_dir: PathBuf,
    pub(super) jar_name: String,
    pub(super) pack_name: String,
    pub(super) vm_options: Option<String>,
    pub(super) program_args: Option<String>,
    pub(super) copy_resources: Vec<CopyResource>,
    pub(super) platforms: Vec<Platform>,
    pub(super) home_dir_name: String,
    pub(super) templates_dir: Option<PathBuf>,
    pub(super) fetch_timeout: Duration,
    pub(super) windows: WindowsSettings,
    pub(super) docker: DockerSettings,
}

impl PackInfo {
    /// Application name used in scripts and service ids.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional group coordinate.
    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    /// Artifact coordinate.
    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// Artifact version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Absolute build output directory.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Full artifact file name, e.g. `demo-1.0.0.jar`.
    pub fn jar_name(&self) -> &str {
        &self.jar_name
    }

    /// Path of the built artifact.
    pub fn jar_path(&self) -> PathBuf {
        self.target_dir.join(&self.jar_name)
    }

    /// Archive base name.
    pub fn pack_name(&self) -> &str {
        &self.pack_name
    }

    /// JVM options, `None` when unset or blank.
    pub fn vm_options(&self) -> Option<&str> {
        self.vm_options.as_deref()
    }

    /// Program arguments, `None` when unset or blank.
    pub fn program_args(&self) -> Option<&str> {
        self.program_args.as_deref()
    }

    /// User-declared resources copied into every platform bundle.
    pub fn copy_resources(&self) -> &[CopyResource] {
        &self.copy_resources
    }

    /// Enabled platforms, in packing order.
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Returns `true` if the platform is enabled.
    pub fn is_enabled(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }

    /// Shared home directory: `<target_dir>/<home_dir_name>`.
    ///
    /// Platform working directories and the final archives live here.
    pub fn home_dir(&self) -> PathBuf {
        self.target_dir.join(&self.home_dir_name)
    }

    /// Working directory for one platform: `<home>/<platform-code>`.
    pub fn platform_dir(&self, platform: Platform) -> PathBuf {
        self.home_dir().join(platform.code())
    }

    /// Directory whose files shadow the embedded templates.
    pub fn templates_dir(&self) -> Option<&Path> {
        self.templates_dir.as_deref()
    }

    /// Timeout for a single remote resource fetch.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Windows settings.
    pub fn windows(&self) -> &WindowsSettings {
        &self.windows
    }

    /// Container settings.
    pub fn docker(&self) -> &DockerSettings {
        &self.docker
    }

    /// Container image reference for this request.
    pub fn image_reference(&self) -> String {
        self.docker.image_reference(&self.name, &self.version)
    }
}
