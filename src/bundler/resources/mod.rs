//! Bundled default resources and script templates.
//!
//! Resources are compiled into the binary and addressed by id
//! (`linux/bin/start.sh`, `windows/README.md`, ...). A [`ResourceSet`] can be
//! pointed at an override directory; a file at `<dir>/<id>` then wins over
//! the embedded copy.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

const EMBEDDED: &[(&str, &str)] = &[
    ("linux/README.md", include_str!("templates/linux/README.md")),
    ("linux/bin/start.sh", include_str!("templates/linux/bin/start.sh")),
    ("linux/bin/stop.sh", include_str!("templates/linux/bin/stop.sh")),
    ("linux/bin/restart.sh", include_str!("templates/linux/bin/restart.sh")),
    ("windows/README.md", include_str!("templates/windows/README.md")),
    ("windows/bin/winsw.xml", include_str!("templates/windows/bin/winsw.xml")),
    ("windows/bin/install.bat", include_str!("templates/windows/bin/install.bat")),
    ("windows/bin/uninstall.bat", include_str!("templates/windows/bin/uninstall.bat")),
    ("windows/bin/start.bat", include_str!("templates/windows/bin/start.bat")),
    ("windows/bin/stop.bat", include_str!("templates/windows/bin/stop.bat")),
    ("windows/bin/restart.bat", include_str!("templates/windows/bin/restart.bat")),
    ("windows/bin/console.bat", include_str!("templates/windows/bin/console.bat")),
    ("docker/README.md", include_str!("templates/docker/README.md")),
    ("docker/Dockerfile", include_str!("templates/docker/Dockerfile")),
];

/// Read-only resource lookup for one packaging run.
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    override_dir: Option<PathBuf>,
}

impl ResourceSet {
    /// Resource set backed by the embedded resources only.
    pub fn embedded() -> Self {
        Self::default()
    }

    /// Resource set whose files in `dir` shadow the embedded ones.
    pub fn with_override_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }

    /// Ids of all embedded resources.
    pub fn ids() -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(id, _)| *id)
    }

    /// Loads the resource `id` as text.
    ///
    /// # Errors
    ///
    /// [`Error::ResourceNotFound`] when neither the override directory nor the
    /// embedded set has it, or a filesystem error when the override exists but
    /// cannot be read.
    pub async fn load(&self, id: &str) -> Result<Cow<'static, str>> {
        if let Some(path) = self.override_path(id) {
            log::debug!("Using override for {id}: {}", path.display());
            let text = tokio::fs::read_to_string(&path)
                .await
                .fs_context("reading resource override", &path)?;
            return Ok(Cow::Owned(text));
        }

        EMBEDDED
            .iter()
            .find(|(name, _)| *name == id)
            .map(|(_, text)| Cow::Borrowed(*text))
            .ok_or_else(|| Error::ResourceNotFound(id.to_string()))
    }

    fn override_path(&self, id: &str) -> Option<PathBuf> {
        let dir: &Path = self.override_dir.as_deref()?;
        let path = id.split('/').fold(dir.to_path_buf(), |p, part| p.join(part));
        path.is_file().then_some(path)
    }
}
