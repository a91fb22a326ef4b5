//! Target platforms a package can be produced for.

use std::{fmt, str::FromStr};

/// Deployable bundle shape.
///
/// The string code doubles as the name of the platform's working directory
/// under the pack home (`<target>/jpack/<code>`).
///
/// # Examples
///
/// ```
/// use jpack::bundler::Platform;
///
/// let platform: Platform = "linux".parse().unwrap();
/// assert_eq!(platform.code(), "linux");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Windows service package (`.zip`) wrapped by WinSW
    Windows,
    /// Linux package (`.tar.gz`) controlled by shell scripts
    Linux,
    /// Container image
    Docker,
}

impl Platform {
    /// All platforms, in the order they are packed by default.
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Linux, Platform::Docker];

    /// Lower-case platform code.
    pub fn code(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Docker => "docker",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "docker" => Ok(Platform::Docker),
            other => {
                let valid: Vec<_> = Platform::ALL.iter().map(|p| p.code()).collect();
                Err(format!(
                    "Invalid platform: {other}. Valid platforms: {}",
                    valid.join(", ")
                ))
            }
        }
    }
}
