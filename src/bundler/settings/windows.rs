//! Windows platform-specific settings.

/// Windows service package configuration.
///
/// # Configuration
///
/// ```toml
/// [windows]
/// wrapper = "https://github.com/winsw/winsw/releases/download/v2.12.0/WinSW-x64.exe"
/// ```
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct WindowsSettings {
    /// Service wrapper executable (local path or URL).
    ///
    /// Copied to `bin/<name>.exe` next to the rendered `bin/<name>.xml`
    /// descriptor. When unset the package ships without the wrapper and the
    /// README tells the operator where to put it.
    ///
    /// Default: None
    #[serde(default)]
    pub wrapper: Option<String>,
}
