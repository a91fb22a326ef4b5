//! Builder for constructing PackInfo.

use super::{
    CopyResource, DockerSettings, PackInfo, Platform, WindowsSettings,
    core::{DEFAULT_FETCH_TIMEOUT, DEFAULT_HOME_DIR_NAME},
};
use crate::bundler::{Error, Result};
use path_absolutize::Absolutize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Builder for constructing [`PackInfo`].
///
/// Provides a fluent API; [`build`](Self::build) fills in defaults and
/// validates the request.
///
/// # Required
///
/// `artifact_id`, `version` and `target_dir`. The built artifact
/// (`target_dir/jar_name`) must exist.
///
/// # See Also
///
/// - [`PackInfo`] - The built request
#[derive(Debug, Default)]
pub struct PackInfoBuilder {
    name: Option<String>,
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    description: Option<String>,
    target_dir: Option<PathBuf>,
    jar_name: Option<String>,
    pack_name: Option<String>,
    vm_options: Option<String>,
    program_args: Option<String>,
    copy_resources: Vec<CopyResource>,
    platforms: Option<Vec<Platform>>,
    home_dir_name: Option<String>,
    templates_dir: Option<PathBuf>,
    fetch_timeout: Option<Duration>,
    windows: WindowsSettings,
    docker: DockerSettings,
}

impl PackInfoBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the application name.
    ///
    /// Default: the artifact id
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the group coordinate.
    pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Sets the artifact coordinate.
    pub fn artifact_id(mut self, artifact_id: impl Into<String>) -> Self {
        self.artifact_id = Some(artifact_id.into());
        self
    }

    /// Sets the artifact version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the build output directory. Relative paths are absolutized
    /// against the current directory.
    pub fn target_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.target_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the artifact file name.
    ///
    /// Default: `<artifact_id>-<version>.jar`
    pub fn jar_name(mut self, jar_name: impl Into<String>) -> Self {
        self.jar_name = Some(jar_name.into());
        self
    }

    /// Sets the archive base name.
    ///
    /// Default: the application name
    pub fn pack_name(mut self, pack_name: impl Into<String>) -> Self {
        self.pack_name = Some(pack_name.into());
        self
    }

    /// Sets the JVM options.
    pub fn vm_options(mut self, vm_options: impl Into<String>) -> Self {
        self.vm_options = Some(vm_options.into());
        self
    }

    /// Sets the program arguments.
    pub fn program_args(mut self, program_args: impl Into<String>) -> Self {
        self.program_args = Some(program_args.into());
        self
    }

    /// Sets the custom resources.
    pub fn copy_resources(mut self, resources: Vec<CopyResource>) -> Self {
        self.copy_resources = resources;
        self
    }

    /// Appends one custom resource.
    pub fn copy_resource(mut self, resource: CopyResource) -> Self {
        self.copy_resources.push(resource);
        self
    }

    /// Sets the enabled platforms. Duplicates are dropped, order is kept.
    ///
    /// Default: Windows and Linux
    pub fn platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = Some(platforms);
        self
    }

    /// Sets the name of the home directory under `target_dir`.
    ///
    /// Default: `jpack`
    pub fn home_dir_name(mut self, name: impl Into<String>) -> Self {
        self.home_dir_name = Some(name.into());
        self
    }

    /// Sets a directory whose files shadow the embedded templates.
    pub fn templates_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.templates_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the remote fetch timeout.
    ///
    /// Default: 60 seconds
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Sets the Windows settings.
    pub fn windows(mut self, settings: WindowsSettings) -> Self {
        self.windows = settings;
        self
    }

    /// Sets the container settings.
    pub fn docker(mut self, settings: DockerSettings) -> Self {
        self.docker = settings;
        self
    }

    /// Builds and validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPackInfo`] if a required field is missing or
    /// blank, or if the artifact does not exist.
    pub fn build(self) -> Result<PackInfo> {
        let artifact_id = required(self.artifact_id, "artifact_id")?;
        let version = required(self.version, "version")?;
        let target_dir = self
            .target_dir
            .ok_or_else(|| Error::InvalidPackInfo("target_dir is required".into()))?;
        let target_dir = target_dir
            .absolutize()
            .map_err(|e| {
                Error::InvalidPackInfo(format!(
                    "cannot resolve target_dir {}: {e}",
                    target_dir.display()
                ))
            })?
            .into_owned();

        let name = non_blank(self.name).unwrap_or_else(|| artifact_id.clone());
        let pack_name = non_blank(self.pack_name).unwrap_or_else(|| name.clone());
        let jar_name =
            non_blank(self.jar_name).unwrap_or_else(|| format!("{artifact_id}-{version}.jar"));

        let jar_path = target_dir.join(&jar_name);
        if !jar_path.is_file() {
            return Err(Error::InvalidPackInfo(format!(
                "artifact {} does not exist, build the project first",
                jar_path.display()
            )));
        }

        let mut platforms = Vec::new();
        for platform in self
            .platforms
            .unwrap_or_else(|| vec![Platform::Windows, Platform::Linux])
        {
            if !platforms.contains(&platform) {
                platforms.push(platform);
            }
        }

        Ok(PackInfo {
            name,
            group_id: non_blank(self.group_id),
            artifact_id,
            version,
            description: self.description.unwrap_or_default(),
            target_dir,
            jar_name,
            pack_name,
            vm_options: non_blank(self.vm_options),
            program_args: non_blank(self.program_args),
            copy_resources: self.copy_resources,
            platforms,
            home_dir_name: non_blank(self.home_dir_name)
                .unwrap_or_else(|| DEFAULT_HOME_DIR_NAME.to_string()),
            templates_dir: self.templates_dir,
            fetch_timeout: self.fetch_timeout.unwrap_or(DEFAULT_FETCH_TIMEOUT),
            windows: self.windows,
            docker: self.docker,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    non_blank(value).ok_or_else(|| Error::InvalidPackInfo(format!("{field} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target_with_jar(jar: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(jar), b"PK").unwrap();
        dir
    }

    #[test]
    fn fills_in_defaults() {
        let target = target_with_jar("demo-1.0.0.jar");
        let info = PackInfoBuilder::new()
            .artifact_id("demo")
            .version("1.0.0")
            .target_dir(target.path())
            .vm_options("   ")
            .build()
            .unwrap();

        assert_eq!(info.name(), "demo");
        assert_eq!(info.pack_name(), "demo");
        assert_eq!(info.jar_name(), "demo-1.0.0.jar");
        assert_eq!(info.vm_options(), None);
        assert_eq!(info.platforms(), &[Platform::Windows, Platform::Linux]);
        assert_eq!(info.platform_dir(Platform::Linux), target.path().join("jpack/linux"));
    }

    #[test]
    fn rejects_missing_artifact() {
        let target = tempfile::tempdir().unwrap();
        let err = PackInfoBuilder::new()
            .artifact_id("demo")
            .version("1.0.0")
            .target_dir(target.path())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPackInfo(msg) if msg.contains("demo-1.0.0.jar")));
    }

    #[test]
    fn rejects_blank_pack_name_source() {
        let target = target_with_jar("x.jar");
        let err = PackInfoBuilder::new()
            .artifact_id(" ")
            .version("1.0.0")
            .target_dir(target.path())
            .jar_name("x.jar")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPackInfo(msg) if msg.contains("artifact_id")));
    }

    #[test]
    fn deduplicates_platforms_keeping_order() {
        let target = target_with_jar("demo-1.0.0.jar");
        let info = PackInfoBuilder::new()
            .artifact_id("demo")
            .version("1.0.0")
            .target_dir(target.path())
            .platforms(vec![Platform::Docker, Platform::Linux, Platform::Docker])
            .build()
            .unwrap();
        assert_eq!(info.platforms(), &[Platform::Docker, Platform::Linux]);
        assert!(!info.is_enabled(Platform::Windows));
    }
}
