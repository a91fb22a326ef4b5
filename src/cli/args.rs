//! Command line argument parsing and validation.

use crate::bundler::Platform;
use clap::Parser;
use std::path::PathBuf;

/// Packages a built Java application for Windows, Linux and Docker
#[derive(Parser, Debug)]
#[command(
    name = "jpack",
    version,
    about = "Packages a built Java application for Windows, Linux and Docker",
    long_about = "Packages a runnable jar into deployable bundles.

Reads the packaging request from a TOML config file and produces, under
<target_dir>/jpack/:
  windows  <pack_name>.zip     WinSW service descriptor and control scripts
  linux    <pack_name>.tar.gz  start/stop/restart shell scripts
  docker   container image     built with the docker CLI

Usage:
  jpack
  jpack --config app/jpack.toml --platform linux --platform docker
  jpack --target-dir build/libs --pack-name demo-bundle

Exit code 0 = every enabled platform produced its deployable."
)]
pub struct Args {
    /// Config file
    #[arg(short, long, value_name = "FILE", default_value = "jpack.toml", env = "JPACK_CONFIG")]
    pub config: PathBuf,

    /// Platform to pack: windows, linux, docker (repeatable, overrides the config)
    #[arg(short, long = "platform", value_name = "PLATFORM")]
    pub platforms: Vec<Platform>,

    /// Build output directory holding the jar (overrides the config)
    #[arg(short, long, value_name = "DIR")]
    pub target_dir: Option<PathBuf>,

    /// Archive base name (overrides the config)
    #[arg(long, value_name = "NAME")]
    pub pack_name: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.config.as_os_str().is_empty() {
            return Err("Config path cannot be empty".to_string());
        }

        if let Some(name) = &self.pack_name
            && name.trim().is_empty()
        {
            return Err("Pack name cannot be blank".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_platforms_are_collected() {
        let args = Args::try_parse_from(["jpack", "-p", "linux", "--platform", "Docker"]).unwrap();
        assert_eq!(args.platforms, vec![Platform::Linux, Platform::Docker]);
        assert_eq!(args.config, PathBuf::from("jpack.toml"));
    }

    #[test]
    fn unknown_platform_is_rejected() {
        assert!(Args::try_parse_from(["jpack", "--platform", "solaris"]).is_err());
    }

    #[test]
    fn blank_pack_name_fails_validation() {
        let args = Args::try_parse_from(["jpack", "--pack-name", " "]).unwrap();
        assert!(args.validate().is_err());
    }
}
