//! Windows `.zip` package wrapping the jar in a WinSW service.

use super::{PackContext, PackHandler, WorkDir, script_context};
use crate::{
    bundler::{Error, Platform, PlatformOutcome, Result, utils::compress::ArchiveFormat},
    source::ResourceSource,
};
use std::path::PathBuf;

const SCRIPTS: &[&str] = &[
    "install.bat",
    "uninstall.bat",
    "start.bat",
    "stop.bat",
    "restart.bat",
    "console.bat",
];

/// Packs the WinSW descriptor `bin/<name>.xml` and the service control
/// batch files around the jar.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsHandler;

impl WindowsHandler {
    /// Copies or fetches the service wrapper executable to `bin/<name>.exe`.
    async fn copy_wrapper(
        &self,
        ctx: &PackContext<'_>,
        dir: &WorkDir,
        wrapper: &str,
    ) -> Result<PathBuf> {
        let dest = dir.bin_dir().join(format!("{}.exe", ctx.info.name()));
        let copied = match ResourceSource::parse(wrapper) {
            Ok(source) => source.copy_to(&dest, ctx.fetcher).await,
            Err(e) => Err(e),
        };

        match copied {
            Ok(()) => Ok(dest),
            Err(e @ Error::Timeout { .. }) => Err(e),
            Err(e) => Err(Error::resource_copy(wrapper, &dest, e)),
        }
    }
}

impl PackHandler for WindowsHandler {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    async fn pack(&self, ctx: &PackContext<'_>) -> PlatformOutcome {
        let mut outcome = PlatformOutcome::new(Platform::Windows);

        let Some(dir) = outcome.record(WorkDir::create(ctx, Platform::Windows).await) else {
            return outcome;
        };

        outcome.record(dir.copy_default(ctx, "windows/README.md", "README.md").await);

        let context = script_context(ctx.info);
        let descriptor = format!("bin/{}.xml", ctx.info.name());
        outcome.record(
            dir.render(ctx, "windows/bin/winsw.xml", &context, &descriptor)
                .await,
        );
        for script in SCRIPTS {
            let template_id = format!("windows/bin/{script}");
            outcome.record(
                dir.render(ctx, &template_id, &context, &format!("bin/{script}"))
                    .await,
            );
        }

        if let Some(wrapper) = ctx.info.windows().wrapper.as_deref() {
            outcome.record(self.copy_wrapper(ctx, &dir, wrapper).await);
        } else {
            log::warn!(
                "[windows] No service wrapper configured; bin/{}.exe must be added before install",
                ctx.info.name()
            );
        }

        outcome.extend(dir.copy_custom_resources(ctx).await);
        dir.archive(ctx, ArchiveFormat::Zip, &mut outcome).await;
        outcome
    }
}
