//! Packaging request loaded from a `jpack.toml` file.
//!
//! Keys mirror [`PackInfo`](crate::bundler::PackInfo) in snake_case. Relative
//! paths (`target_dir`, `templates_dir`, local resource sources, the wrapper
//! executable and a user Dockerfile) are resolved against the directory that
//! holds the config file.
//!
//! ```toml
//! artifact_id = "demo"
//! version = "1.0.0"
//! target_dir = "target"
//! vm_options = "-Xmx512m"
//! platforms = ["linux", "docker"]
//!
//! [[copy_resources]]
//! from = "config/application.yml"
//! to = "config"
//! ```

use crate::bundler::{
    CopyResource, DockerSettings, PackInfoBuilder, Platform, WindowsSettings,
};
use crate::error::{BundlerError, CliError, Result};
use crate::source::ResourceSource;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Contents of a config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Application name
    pub name: Option<String>,
    /// Group coordinate
    pub group_id: Option<String>,
    /// Artifact coordinate
    pub artifact_id: Option<String>,
    /// Artifact version
    pub version: Option<String>,
    /// Free text description
    pub description: Option<String>,
    /// Build output directory
    pub target_dir: Option<PathBuf>,
    /// Jar file name inside `target_dir`
    pub jar_name: Option<String>,
    /// Archive base name
    pub pack_name: Option<String>,
    /// JVM options
    pub vm_options: Option<String>,
    /// Program arguments
    pub program_args: Option<String>,
    /// Custom resources
    pub copy_resources: Vec<CopyResource>,
    /// Enabled platforms
    pub platforms: Option<Vec<Platform>>,
    /// Home directory name under `target_dir`
    pub home_dir_name: Option<String>,
    /// Template override directory
    pub templates_dir: Option<PathBuf>,
    /// Remote fetch timeout in seconds
    pub fetch_timeout_secs: Option<u64>,
    /// `[windows]` table
    pub windows: WindowsSettings,
    /// `[docker]` table
    pub docker: DockerSettings,
}

/// Reads and parses a config file.
///
/// Relative paths inside are resolved against the file's directory before
/// this returns.
pub fn load_config(path: &Path) -> Result<PackConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        BundlerError::Cli(CliError::ExecutionFailed {
            command: "read_config".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    let mut config: PackConfig = toml::from_str(&text)?;
    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    config.resolve_paths(base);
    Ok(config)
}

impl PackConfig {
    /// Resolves every relative path against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &Path| -> PathBuf {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base.join(path)
            }
        };

        self.target_dir = Some(resolve(self.target_dir.as_deref().unwrap_or(Path::new("."))));
        self.templates_dir = self.templates_dir.as_deref().map(resolve);
        self.docker.dockerfile = self.docker.dockerfile.as_deref().map(resolve);

        if let Some(wrapper) = self.windows.wrapper.take() {
            self.windows.wrapper = Some(resolve_source(&wrapper, &resolve));
        }
        for resource in &mut self.copy_resources {
            if !resource.is_blank() {
                resource.from = resolve_source(&resource.from, &resolve);
            }
        }
    }

    /// Turns the config into a request builder.
    pub fn into_builder(self) -> PackInfoBuilder {
        let mut builder = PackInfoBuilder::new()
            .copy_resources(self.copy_resources)
            .windows(self.windows)
            .docker(self.docker);

        if let Some(name) = self.name {
            builder = builder.name(name);
        }
        if let Some(group_id) = self.group_id {
            builder = builder.group_id(group_id);
        }
        if let Some(artifact_id) = self.artifact_id {
            builder = builder.artifact_id(artifact_id);
        }
        if let Some(version) = self.version {
            builder = builder.version(version);
        }
        if let Some(description) = self.description {
            builder = builder.description(description);
        }
        if let Some(target_dir) = self.target_dir {
            builder = builder.target_dir(target_dir);
        }
        if let Some(jar_name) = self.jar_name {
            builder = builder.jar_name(jar_name);
        }
        if let Some(pack_name) = self.pack_name {
            builder = builder.pack_name(pack_name);
        }
        if let Some(vm_options) = self.vm_options {
            builder = builder.vm_options(vm_options);
        }
        if let Some(program_args) = self.program_args {
            builder = builder.program_args(program_args);
        }
        if let Some(platforms) = self.platforms {
            builder = builder.platforms(platforms);
        }
        if let Some(home_dir_name) = self.home_dir_name {
            builder = builder.home_dir_name(home_dir_name);
        }
        if let Some(templates_dir) = self.templates_dir {
            builder = builder.templates_dir(templates_dir);
        }
        if let Some(secs) = self.fetch_timeout_secs {
            builder = builder.fetch_timeout(Duration::from_secs(secs));
        }
        builder
    }
}

/// URLs and blank values pass through unchanged.
fn resolve_source(source: &str, resolve: &impl Fn(&Path) -> PathBuf) -> String {
    match ResourceSource::parse(source) {
        Ok(ResourceSource::Local(path)) => resolve(&path).to_string_lossy().into_owned(),
        _ => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config: PackConfig = toml::from_str(
            r#"
            artifact_id = "demo"
            version = "1.0.0"
            vm_options = "-Xmx512m"
            platforms = ["linux", "docker"]
            fetch_timeout_secs = 5

            [[copy_resources]]
            from = "conf/app.yml"
            to = "conf"

            [windows]
            wrapper = "https://example.com/WinSW-x64.exe"

            [docker]
            expose = ["8080"]
            build_timeout_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.artifact_id.as_deref(), Some("demo"));
        assert_eq!(config.platforms, Some(vec![Platform::Linux, Platform::Docker]));
        assert_eq!(config.copy_resources, vec![CopyResource::new("conf/app.yml", "conf")]);
        assert_eq!(config.docker.build_timeout, Duration::from_secs(60));
        assert_eq!(config.docker.expose, vec!["8080".to_string()]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<PackConfig>("artifact = \"demo\"").is_err());
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let mut config: PackConfig = toml::from_str(
            r#"
            target_dir = "target"
            [[copy_resources]]
            from = "conf/app.yml"
            to = "conf"
            [[copy_resources]]
            from = "https://example.com/logo.png"
            to = "assets"
            [windows]
            wrapper = "tools/winsw.exe"
            "#,
        )
        .unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.target_dir, Some(PathBuf::from("/project/target")));
        assert_eq!(
            PathBuf::from(&config.copy_resources[0].from),
            PathBuf::from("/project/conf/app.yml")
        );
        assert_eq!(config.copy_resources[1].from, "https://example.com/logo.png");
        assert_eq!(
            config.windows.wrapper.map(PathBuf::from),
            Some(PathBuf::from("/project/tools/winsw.exe"))
        );
    }

    #[test]
    fn load_config_builds_pack_info() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("target")).unwrap();
        std::fs::write(tmp.path().join("target/demo-1.0.0.jar"), b"jar").unwrap();
        let config_path = tmp.path().join("jpack.toml");
        std::fs::write(
            &config_path,
            "artifact_id = \"demo\"\nversion = \"1.0.0\"\ntarget_dir = \"target\"\n",
        )
        .unwrap();

        let info = load_config(&config_path).unwrap().into_builder().build().unwrap();
        assert_eq!(info.jar_path(), tmp.path().join("target/demo-1.0.0.jar"));
        assert_eq!(info.platforms(), &[Platform::Windows, Platform::Linux]);
    }
}
