//! Error types for the packaging pipeline.
//!
//! Every failure a platform handler can hit maps onto one of the variants
//! below. Handlers never propagate them past their own boundary; they are
//! collected into a [`PlatformOutcome`](crate::bundler::PlatformOutcome).

use std::{
    fmt::Display,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// Result type alias for packaging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while producing a platform bundle.
#[derive(Debug, Error)]
pub enum Error {
    /// The platform working directory or one of its subfolders could not be
    /// created or cleared. Aborts that platform only.
    #[error("failed to prepare working directory {}: {source}", .path.display())]
    DirectoryFailure {
        /// Directory that could not be prepared
        path: PathBuf,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },

    /// A default or custom resource could not be copied or fetched.
    #[error("failed to copy resource {from} to {}: {reason}", .to.display())]
    ResourceCopyFailure {
        /// Resource source (path or URL)
        from: String,
        /// Destination inside the working directory
        to: PathBuf,
        /// Human readable cause
        reason: String,
    },

    /// A template could not be read, rendered or written.
    #[error("failed to render template {template}: {reason}")]
    RenderFailure {
        /// Template identifier
        template: String,
        /// Human readable cause
        reason: String,
    },

    /// Compression or post-archive cleanup failed.
    #[error("failed to archive {}: {reason}", .path.display())]
    ArchiveFailure {
        /// Directory being archived
        path: PathBuf,
        /// Human readable cause
        reason: String,
    },

    /// The container image could not be built, pushed or saved.
    #[error("container step `{command}` failed: {reason}")]
    ImageBuildFailure {
        /// Command that failed
        command: String,
        /// Human readable cause
        reason: String,
    },

    /// A blocking external step exceeded its time budget.
    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout {
        /// Operation that timed out
        operation: String,
        /// Time budget that was exceeded
        after: Duration,
    },

    /// A bundled resource id could not be resolved.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// The packaging request failed validation.
    #[error("invalid pack info: {0}")]
    InvalidPackInfo(String),

    /// An external command could not be spawned.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command that failed
        command: String,
        /// Spawn error
        error: std::io::Error,
    },

    /// Filesystem error with context.
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        error: std::io::Error,
    },

    /// IO errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// Directory walk errors
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Zip archive errors
    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    /// Path prefix errors
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

/// Adds path context to filesystem errors.
pub trait ErrorExt<T> {
    /// Wraps the error with the action being performed and the path involved.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Converts options and foreign errors into [`Error::GenericError`] with a message.
pub trait Context<T> {
    /// Attaches a message describing what was expected.
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}

impl Error {
    /// Short, stable name of the error kind, used in summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::DirectoryFailure { .. } => "directory",
            Error::ResourceCopyFailure { .. } | Error::ResourceNotFound(_) => "resource",
            Error::RenderFailure { .. } => "render",
            Error::ArchiveFailure { .. } => "archive",
            Error::ImageBuildFailure { .. } | Error::CommandFailed { .. } => "image",
            Error::Timeout { .. } => "timeout",
            Error::InvalidPackInfo(_) => "config",
            _ => "io",
        }
    }

    /// Builds a [`Error::ResourceCopyFailure`] from any displayable cause.
    pub(crate) fn resource_copy(from: impl Into<String>, to: &Path, reason: impl Display) -> Self {
        Error::ResourceCopyFailure {
            from: from.into(),
            to: to.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
