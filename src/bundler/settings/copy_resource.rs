//! User-declared resource copy instructions.

/// A single `(from, to)` resource copy instruction.
///
/// `from` is either a local path (file or directory) or an `http://` /
/// `https://` URL. `to` is a directory relative to the platform working
/// directory.
///
/// # Configuration
///
/// ```toml
/// [[copy_resources]]
/// from = "config/application.yml"
/// to = "config"
///
/// [[copy_resources]]
/// from = "https://example.com/assets/logo.png"
/// to = "assets/"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct CopyResource {
    /// Local path or remote URL.
    #[serde(default)]
    pub from: String,

    /// Destination directory relative to the working directory.
    #[serde(default)]
    pub to: String,
}

impl CopyResource {
    /// Creates a new copy instruction.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns `true` when there is nothing to copy.
    pub fn is_blank(&self) -> bool {
        self.from.trim().is_empty()
    }
}
