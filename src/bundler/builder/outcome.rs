//! Per-platform packaging results.

use super::checksum::calculate_sha256;
use crate::bundler::{Error, Platform, Result, error::ErrorExt};
use std::path::{Path, PathBuf};

/// A deployable produced for one platform.
#[derive(Debug, Clone)]
pub struct PackedArtifact {
    /// Platform the artifact was produced for.
    pub platform: Platform,
    /// Files produced (the archive, or the saved image for Docker).
    pub paths: Vec<PathBuf>,
    /// Container image reference, for Docker.
    pub image: Option<String>,
    /// Combined size of `paths` in bytes.
    pub size: u64,
    /// SHA-256 of the first path, if any.
    pub checksum: Option<String>,
}

impl PackedArtifact {
    /// Describes the produced files, reading their size and checksum.
    pub async fn describe(
        platform: Platform,
        paths: Vec<PathBuf>,
        image: Option<String>,
    ) -> Result<Self> {
        let mut size = 0u64;
        for p in &paths {
            let metadata = tokio::fs::metadata(p)
                .await
                .fs_context("reading artifact metadata", p)?;
            size += metadata.len();
        }

        let checksum = match paths.first() {
            Some(first) => Some(calculate_sha256(first).await?),
            None => None,
        };

        Ok(Self {
            platform,
            paths,
            image,
            size,
            checksum,
        })
    }

    /// First produced file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }
}

/// Result of running one platform handler.
///
/// `artifact` is set once the deployable has been produced. `errors` holds
/// every failure recorded along the way, fatal or not.
#[derive(Debug)]
pub struct PlatformOutcome {
    platform: Platform,
    artifact: Option<PackedArtifact>,
    errors: Vec<Error>,
}

impl PlatformOutcome {
    /// Empty outcome for `platform`.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            artifact: None,
            errors: Vec::new(),
        }
    }

    /// Platform this outcome belongs to.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The produced deployable, if any.
    pub fn artifact(&self) -> Option<&PackedArtifact> {
        self.artifact.as_ref()
    }

    /// Every failure recorded for this platform.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// `true` when the deployable was produced.
    pub fn is_success(&self) -> bool {
        self.artifact.is_some()
    }

    /// `true` when the deployable was produced without any recorded failure.
    pub fn is_clean(&self) -> bool {
        self.is_success() && self.errors.is_empty()
    }

    /// Records the error of a failed step and returns the value of a
    /// successful one.
    pub fn record<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.push(e);
                None
            }
        }
    }

    /// Records one failure.
    pub fn push(&mut self, error: Error) {
        log::error!("[{}] {}", self.platform, error);
        self.errors.push(error);
    }

    /// Records several failures.
    pub fn extend(&mut self, errors: impl IntoIterator<Item = Error>) {
        for error in errors {
            self.push(error);
        }
    }

    pub(crate) fn set_artifact(&mut self, artifact: PackedArtifact) {
        self.artifact = Some(artifact);
    }
}

/// Results of one packaging run, in platform order.
#[derive(Debug, Default)]
pub struct PackReport {
    outcomes: Vec<PlatformOutcome>,
}

impl PackReport {
    /// All outcomes.
    pub fn outcomes(&self) -> &[PlatformOutcome] {
        &self.outcomes
    }

    /// Outcome for one platform, if it ran.
    pub fn outcome(&self, platform: Platform) -> Option<&PlatformOutcome> {
        self.outcomes.iter().find(|o| o.platform() == platform)
    }

    /// `true` when every platform produced its deployable.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(PlatformOutcome::is_success)
    }

    /// Platforms that did not produce a deployable.
    pub fn failed(&self) -> impl Iterator<Item = Platform> + '_ {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(PlatformOutcome::platform)
    }

    pub(crate) fn push(&mut self, outcome: PlatformOutcome) {
        self.outcomes.push(outcome);
    }
}
