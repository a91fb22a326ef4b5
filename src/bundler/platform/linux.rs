//! Linux `.tar.gz` package controlled by shell scripts.

use super::{PackContext, PackHandler, WorkDir, script_context};
use crate::bundler::{Platform, PlatformOutcome, utils::compress::ArchiveFormat};

const SCRIPTS: &[&str] = &["start.sh", "stop.sh", "restart.sh"];

/// Packs `bin/{start,stop,restart}.sh` around the jar.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxHandler;

impl PackHandler for LinuxHandler {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    async fn pack(&self, ctx: &PackContext<'_>) -> PlatformOutcome {
        let mut outcome = PlatformOutcome::new(Platform::Linux);

        let Some(dir) = outcome.record(WorkDir::create(ctx, Platform::Linux).await) else {
            return outcome;
        };

        outcome.record(dir.copy_default(ctx, "linux/README.md", "README.md").await);

        let context = script_context(ctx.info);
        for script in SCRIPTS {
            let template_id = format!("linux/bin/{script}");
            outcome.record(
                dir.render_script(ctx, &template_id, &context, &format!("bin/{script}"))
                    .await,
            );
        }

        outcome.extend(dir.copy_custom_resources(ctx).await);
        dir.archive(ctx, ArchiveFormat::TarGz, &mut outcome).await;
        outcome
    }
}
