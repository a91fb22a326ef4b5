//! Resource source resolution: local path or remote URL.

use crate::bail;
use crate::bundler::{
    Context, Result,
    utils::{fs, http::Fetcher},
};
use std::path::{Path, PathBuf};
use url::Url;

/// Where a resource comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSource {
    /// File or directory on the local filesystem
    Local(PathBuf),
    /// `http://` or `https://` URL
    Remote(Url),
}

impl ResourceSource {
    /// Parses a `from` value. Anything starting with `http://` or `https://`
    /// is a URL; everything else is a local path.
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.trim();
        if source.is_empty() {
            bail!("resource source is blank");
        }

        if source.starts_with("http://") || source.starts_with("https://") {
            let url = Url::parse(source).context(format!("invalid URL {source}"))?;
            return Ok(Self::Remote(url));
        }

        Ok(Self::Local(PathBuf::from(source)))
    }

    /// Returns `true` for URL sources.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// File name the resource gets when copied into a directory.
    ///
    /// For URLs this is the last `/`-separated path segment; `None` when the
    /// URL path ends in `/`.
    pub fn file_name(&self) -> Option<String> {
        match self {
            Self::Local(path) => path.file_name().map(|n| n.to_string_lossy().into_owned()),
            Self::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|segment| !segment.is_empty())
                .map(String::from),
        }
    }

    /// Copies or fetches the resource into `dir`, creating it, and returns
    /// the destination path.
    pub async fn copy_into(&self, dir: &Path, fetcher: &Fetcher) -> Result<PathBuf> {
        match self {
            Self::Local(path) => fs::copy_into_dir(path, dir).await,
            Self::Remote(url) => {
                let name = self
                    .file_name()
                    .context(format!("cannot derive a file name from {url}"))?;
                fs::create_dir_all(dir, false).await?;
                let dest = dir.join(name);
                fetcher.download(url, &dest).await?;
                Ok(dest)
            }
        }
    }

    /// Copies or fetches the resource to exactly `dest`.
    pub async fn copy_to(&self, dest: &Path, fetcher: &Fetcher) -> Result<()> {
        match self {
            Self::Local(path) => fs::copy_file(path, dest).await,
            Self::Remote(url) => {
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent, false).await?;
                }
                fetcher.download(url, dest).await.map(|_| ())
            }
        }
    }
}

impl std::fmt::Display for ResourceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}
