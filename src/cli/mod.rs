//! Command line interface for jpack.
//!
//! Parses arguments, loads the config file, runs the [`Packer`] and prints
//! one summary line per platform.

mod args;

pub use args::Args;

use crate::bundler::{PackReport, Packer};
use crate::error::{CliError, Result};
use crate::metadata::load_config;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    run_with(args).await
}

/// Runs one packaging invocation for already parsed arguments.
///
/// Returns `0` when every enabled platform produced its deployable, `1`
/// otherwise.
pub async fn run_with(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    log::debug!("Loading {}", args.config.display());
    let mut builder = load_config(&args.config)?.into_builder();
    if !args.platforms.is_empty() {
        builder = builder.platforms(args.platforms);
    }
    if let Some(target_dir) = args.target_dir {
        builder = builder.target_dir(target_dir);
    }
    if let Some(pack_name) = args.pack_name {
        builder = builder.pack_name(pack_name);
    }

    let packer = Packer::new(builder.build()?)?;
    let report = packer.pack().await;
    print_summary(&report);

    Ok(if report.is_success() { 0 } else { 1 })
}

fn print_summary(report: &PackReport) {
    for outcome in report.outcomes() {
        let status = match outcome.artifact() {
            Some(_) if outcome.is_clean() => "ok",
            Some(_) => "ok (with errors)",
            None => "FAILED",
        };
        println!("{:<8} {status}", outcome.platform());

        if let Some(artifact) = outcome.artifact() {
            if let Some(image) = &artifact.image {
                println!("  image    {image}");
            }
            for path in &artifact.paths {
                println!("  file     {}", path.display());
            }
            if let Some(checksum) = &artifact.checksum {
                println!("  sha256   {checksum} ({} bytes)", artifact.size);
            }
        }
        for error in outcome.errors() {
            println!("  [{}] {error}", error.kind());
        }
    }
}
