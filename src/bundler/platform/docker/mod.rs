//! Container image built from the application jar.
//!
//! Unlike the archive platforms the working directory is a build context:
//! the jar, a `Dockerfile` and any custom resources are handed to
//! `<binary> build`, then the image is optionally pushed and saved.

mod availability;
mod image;

use super::{PackContext, PackHandler, WorkDir, script_context};
use crate::bundler::{
    Error, PackInfo, PackedArtifact, Platform, PlatformOutcome, Result,
    utils::{fs, template::TemplateContext},
};
use availability::check_available;
use image::ContainerCli;
use serde_json::Value;
use std::path::PathBuf;

/// Builds, and optionally pushes and saves, the application image.
#[derive(Debug, Default, Clone, Copy)]
pub struct DockerHandler;

/// Render context for the Dockerfile template.
pub fn dockerfile_context(info: &PackInfo) -> TemplateContext {
    let docker = info.docker();
    let mut context = script_context(info);
    context.insert("fromImage".into(), Value::from(docker.from_image.as_str()));
    context.insert("imageName".into(), Value::from(info.image_reference()));
    context.insert("expose".into(), Value::from(docker.expose.clone()));
    context.insert("volumes".into(), Value::from(docker.volumes.clone()));
    context.insert("extraCommands".into(), Value::from(docker.extra_commands.clone()));
    context
}

impl DockerHandler {
    /// Writes `Dockerfile`: the user's own file when configured, otherwise
    /// the rendered template.
    async fn write_dockerfile(&self, ctx: &PackContext<'_>, dir: &WorkDir) -> Result<PathBuf> {
        let dest = dir.root().join("Dockerfile");
        match ctx.info.docker().dockerfile.as_deref() {
            Some(user_file) => {
                fs::copy_file(user_file, &dest).await.map_err(|e| {
                    Error::resource_copy(user_file.display().to_string(), &dest, e)
                })?;
                Ok(dest)
            }
            None => {
                dir.render(ctx, "docker/Dockerfile", &dockerfile_context(ctx.info), "Dockerfile")
                    .await
            }
        }
    }

    /// Runs build, push and save. Returns the saved image file, if any.
    async fn build_image(
        &self,
        ctx: &PackContext<'_>,
        dir: &WorkDir,
        cli: &ContainerCli,
        image: &str,
        outcome: &mut PlatformOutcome,
    ) -> Option<Vec<PathBuf>> {
        outcome.record(cli.build(image, dir.root()).await)?;
        log::info!("[docker] Built image {image}");

        let docker = ctx.info.docker();
        let mut complete = true;

        if docker.push {
            match outcome.record(cli.push(image).await) {
                Some(()) => log::info!("[docker] Pushed {image}"),
                None => complete = false,
            }
        }

        let mut files = Vec::new();
        if docker.save {
            let output = ctx
                .info
                .home_dir()
                .join(format!("{}-docker.tar", ctx.info.pack_name()));
            match outcome.record(cli.save(image, &output).await) {
                Some(()) => files.push(output),
                None => complete = false,
            }
        }

        complete.then_some(files)
    }
}

impl PackHandler for DockerHandler {
    fn platform(&self) -> Platform {
        Platform::Docker
    }

    async fn pack(&self, ctx: &PackContext<'_>) -> PlatformOutcome {
        let mut outcome = PlatformOutcome::new(Platform::Docker);
        let docker = ctx.info.docker();

        let Some(binary) = outcome.record(check_available(&docker.binary).await) else {
            return outcome;
        };
        let Some(dir) = outcome.record(WorkDir::create(ctx, Platform::Docker).await) else {
            return outcome;
        };

        outcome.record(dir.copy_default(ctx, "docker/README.md", "README.md").await);
        if outcome.record(self.write_dockerfile(ctx, &dir).await).is_none() {
            return outcome;
        }
        outcome.extend(dir.copy_custom_resources(ctx).await);

        let image = ctx.info.image_reference();
        let cli = ContainerCli::new(binary, docker.build_timeout);
        let Some(files) = self.build_image(ctx, &dir, &cli, &image, &mut outcome).await else {
            log::warn!("[docker] Keeping build context at {}", dir.root().display());
            return outcome;
        };

        if let Some(artifact) = outcome
            .record(PackedArtifact::describe(Platform::Docker, files, Some(image)).await)
        {
            outcome.set_artifact(artifact);
        }
        outcome.record(dir.remove().await);
        outcome
    }
}
