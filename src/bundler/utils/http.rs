//! HTTP utilities for fetching remote resources.

use crate::bundler::error::{Context, Error, ErrorExt, Result};
use std::{path::Path, time::Duration};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Downloads remote resources with a per-request timeout.
///
/// One `Fetcher` is created per packaging run and shared by every handler.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("jpack/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, timeout })
    }

    /// Streams `url` into the file at `dest`, returning the number of bytes
    /// written. A partially written file is removed on failure.
    pub async fn download(&self, url: &Url, dest: &Path) -> Result<u64> {
        log::info!("Downloading {url}");

        let result = self.download_inner(url, dest).await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(dest).await;
        }
        result
    }

    async fn download_inner(&self, url: &Url, dest: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.map_err(url, e))?;

        let mut file = tokio::fs::File::create(dest)
            .await
            .fs_context("creating download target", dest)?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_err(url, e))? {
            file.write_all(&chunk)
                .await
                .fs_context("writing download to", dest)?;
            written += chunk.len() as u64;
        }
        file.flush().await.fs_context("flushing download", dest)?;

        log::debug!("Downloaded {written} bytes to {}", dest.display());
        Ok(written)
    }

    fn map_err(&self, url: &Url, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                operation: format!("GET {url}"),
                after: self.timeout,
            }
        } else {
            Error::GenericError(format!("Download failed: {e}"))
        }
    }
}
