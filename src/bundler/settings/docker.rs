//! Container image settings.

use std::{path::PathBuf, time::Duration};

/// Default base image for generated Dockerfiles.
pub const DEFAULT_FROM_IMAGE: &str = "openjdk:8-jdk-alpine";

/// Default container CLI.
pub const DEFAULT_DOCKER_BINARY: &str = "docker";

/// Timeout for image build, push and save operations (30 minutes)
/// Image builds can take a long time due to base image downloads.
pub const DEFAULT_BUILD_TIMEOUT: Duration = Duration::from_secs(1800);

/// Container image configuration.
///
/// # Configuration
///
/// ```toml
/// [docker]
/// repo = "registry.example.com/team"
/// image_name = "demo"
/// tag = "1.0.0"
/// from_image = "eclipse-temurin:17-jre"
/// expose = ["8080"]
/// volumes = ["/demo/logs"]
/// extra_commands = ["ENV TZ=UTC"]
/// push = false
/// save = true
/// ```
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct DockerSettings {
    /// Image name. Default: lower-cased application name.
    pub image_name: Option<String>,

    /// Registry or namespace prefix, e.g. `registry.example.com/team`.
    pub repo: Option<String>,

    /// Image tag. Default: the artifact version.
    pub tag: Option<String>,

    /// Base image for the generated Dockerfile.
    pub from_image: String,

    /// User-supplied Dockerfile. When set, no Dockerfile is generated.
    pub dockerfile: Option<PathBuf>,

    /// Ports to `EXPOSE`.
    pub expose: Vec<String>,

    /// Paths to declare as `VOLUME`.
    pub volumes: Vec<String>,

    /// Raw Dockerfile instructions inserted before the entrypoint.
    pub extra_commands: Vec<String>,

    /// Push the image after a successful build.
    pub push: bool,

    /// Export the image with `docker save` next to the other archives.
    pub save: bool,

    /// Container CLI used for `info`, `build`, `push` and `save`.
    pub binary: String,

    /// Time budget for each container command, in seconds.
    #[serde(rename = "build_timeout_secs", with = "secs")]
    pub build_timeout: Duration,
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            image_name: None,
            repo: None,
            tag: None,
            from_image: DEFAULT_FROM_IMAGE.to_string(),
            dockerfile: None,
            expose: Vec::new(),
            volumes: Vec::new(),
            extra_commands: Vec::new(),
            push: false,
            save: false,
            binary: DEFAULT_DOCKER_BINARY.to_string(),
            build_timeout: DEFAULT_BUILD_TIMEOUT,
        }
    }
}

impl DockerSettings {
    /// Full image reference: `[<repo>/]<image_name>:<tag>`.
    ///
    /// Container engines reject upper-case repository names, so the name part
    /// is lower-cased.
    pub fn image_reference(&self, default_name: &str, default_tag: &str) -> String {
        let name = self
            .image_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(default_name)
            .to_ascii_lowercase();
        let tag = self
            .tag
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(default_tag);

        match self.repo.as_deref().map(|r| r.trim_end_matches('/')) {
            Some(repo) if !repo.is_empty() => format!("{repo}/{name}:{tag}"),
            _ => format!("{name}:{tag}"),
        }
    }
}

mod secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
