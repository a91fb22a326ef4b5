//! Working directory shared by the platform handlers.

use super::PackContext;
use crate::{
    bail,
    bundler::{
        Error, PackedArtifact, Platform, PlatformOutcome, Result,
        error::ErrorExt,
        utils::{
            compress::{self, ArchiveFormat},
            fs,
            template::TemplateContext,
        },
    },
    source::ResourceSource,
};
use std::path::{Path, PathBuf};

/// Subfolders every platform directory starts with.
const LAYOUT: &[&str] = &["bin", "docs", "logs"];

/// `<home>/<platform-code>`, freshly created for one packaging run.
#[derive(Debug)]
pub struct WorkDir {
    platform: Platform,
    root: PathBuf,
}

impl WorkDir {
    /// Removes any stale directory, recreates the standard layout and copies
    /// the application jar into the root.
    ///
    /// # Errors
    ///
    /// Every failure is reported as [`Error::DirectoryFailure`].
    pub async fn create(ctx: &PackContext<'_>, platform: Platform) -> Result<Self> {
        let root = ctx.info.platform_dir(platform);
        log::info!("[{platform}] Preparing {}", root.display());

        let directory_failure = |e: Error| Error::DirectoryFailure {
            path: root.clone(),
            source: Box::new(e),
        };

        fs::create_dir_all(&root, true).await.map_err(directory_failure)?;
        for sub in LAYOUT {
            fs::create_dir_all(&root.join(sub), false)
                .await
                .map_err(directory_failure)?;
        }

        let jar = ctx.info.jar_path();
        fs::copy_file(&jar, &root.join(ctx.info.jar_name()))
            .await
            .map_err(directory_failure)?;

        Ok(Self { platform, root })
    }

    /// Platform directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `bin/` inside the platform directory.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Resolves a `/`-separated path relative to the root.
    ///
    /// Fails on `..` segments: the result always stays inside the root.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for part in relative.split(['/', '\\']) {
            match part {
                "" | "." => {}
                ".." => bail!("{relative} leaves the working directory"),
                _ => path.push(part),
            }
        }
        Ok(path)
    }

    /// Copies the bundled resource `resource_id` verbatim to `destination`.
    pub async fn copy_default(
        &self,
        ctx: &PackContext<'_>,
        resource_id: &str,
        destination: &str,
    ) -> Result<PathBuf> {
        let dest = self
            .resolve(destination)
            .map_err(|e| Error::resource_copy(resource_id, &self.root, e))?;
        let text = ctx
            .resources
            .load(resource_id)
            .await
            .map_err(|e| Error::resource_copy(resource_id, &dest, e))?;

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent, false)
                .await
                .map_err(|e| Error::resource_copy(resource_id, &dest, e))?;
        }
        tokio::fs::write(&dest, text.as_bytes())
            .await
            .fs_context("writing resource", &dest)
            .map_err(|e| Error::resource_copy(resource_id, &dest, e))?;

        log::debug!("[{}] Copied {resource_id}", self.platform);
        Ok(dest)
    }

    /// Renders `template_id` to `destination`.
    pub async fn render(
        &self,
        ctx: &PackContext<'_>,
        template_id: &str,
        context: &TemplateContext,
        destination: &str,
    ) -> Result<PathBuf> {
        let dest = self.resolve(destination).map_err(|e| Error::RenderFailure {
            template: template_id.to_string(),
            reason: e.to_string(),
        })?;
        ctx.renderer
            .render_file(ctx.resources, template_id, context, &dest)
            .await?;
        Ok(dest)
    }

    /// Renders a shell script and marks it executable.
    pub async fn render_script(
        &self,
        ctx: &PackContext<'_>,
        template_id: &str,
        context: &TemplateContext,
        destination: &str,
    ) -> Result<PathBuf> {
        let dest = self.render(ctx, template_id, context, destination).await?;
        fs::set_executable(&dest).await.map_err(|e| Error::RenderFailure {
            template: template_id.to_string(),
            reason: e.to_string(),
        })?;
        Ok(dest)
    }

    /// Copies every declared custom resource into the working directory.
    ///
    /// Entries with a blank `from` are skipped. Failures are returned, one per
    /// resource, and never stop the remaining copies.
    pub async fn copy_custom_resources(&self, ctx: &PackContext<'_>) -> Vec<Error> {
        let mut errors = Vec::new();

        for resource in ctx.info.copy_resources() {
            if resource.is_blank() {
                log::debug!("[{}] Skipping resource with blank source", self.platform);
                continue;
            }

            let dir = match self.resolve(&resource.to) {
                Ok(dir) => dir,
                Err(e) => {
                    let to = self.root.join(&resource.to);
                    errors.push(Error::resource_copy(resource.from.as_str(), &to, e));
                    continue;
                }
            };
            let (verb, copied) = match ResourceSource::parse(&resource.from) {
                Ok(source) if source.is_remote() => {
                    ("Fetched", source.copy_into(&dir, ctx.fetcher).await)
                }
                Ok(source) => ("Copied", source.copy_into(&dir, ctx.fetcher).await),
                Err(e) => ("Copied", Err(e)),
            };

            match copied {
                Ok(dest) => log::info!(
                    "[{}] {verb} {} to {}",
                    self.platform,
                    resource.from,
                    dest.display()
                ),
                Err(e @ Error::Timeout { .. }) => errors.push(e),
                Err(e) => errors.push(Error::resource_copy(resource.from.as_str(), &dir, e)),
            }
        }

        errors
    }

    /// Archives the working directory to `<home>/<pack_name>.<ext>` and
    /// removes it.
    ///
    /// A compression failure keeps the directory. A cleanup failure after a
    /// successful archive is recorded but the archive is still reported.
    pub async fn archive(
        self,
        ctx: &PackContext<'_>,
        format: ArchiveFormat,
        outcome: &mut PlatformOutcome,
    ) {
        let output = compress::sibling_archive_path(&self.root, ctx.info.pack_name(), format);
        log::info!("[{}] Writing {}", self.platform, output.display());

        if let Err(e) = compress::compress(format, &self.root, &output).await {
            outcome.push(Error::ArchiveFailure {
                path: self.root.clone(),
                reason: e.to_string(),
            });
            return;
        }

        match PackedArtifact::describe(self.platform, vec![output], None).await {
            Ok(artifact) => outcome.set_artifact(artifact),
            Err(e) => {
                outcome.push(Error::ArchiveFailure {
                    path: self.root.clone(),
                    reason: e.to_string(),
                });
                return;
            }
        }

        let root = self.root.clone();
        if let Err(e) = self.remove().await {
            outcome.push(Error::ArchiveFailure {
                path: root,
                reason: e.to_string(),
            });
        }
    }

    /// Deletes the working directory.
    pub async fn remove(self) -> Result<()> {
        log::debug!("[{}] Removing {}", self.platform, self.root.display());
        fs::remove_dir_all(&self.root).await
    }
}
