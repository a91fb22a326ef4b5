//! Container CLI availability checking.

use crate::bundler::{Error, Result};
use std::{path::PathBuf, process::Stdio, time::Duration};
use tokio::{process::Command, time::timeout};

/// Time allowed for `<binary> info` to answer.
pub const INFO_TIMEOUT: Duration = Duration::from_secs(5);

/// Checks that `binary` is installed and its daemon answers `info`.
///
/// # Returns
///
/// * `Ok(path)` - resolved path of the container CLI
/// * `Err` - the CLI is missing, not responding, or timed out
pub async fn check_available(binary: &str) -> Result<PathBuf> {
    let resolved = which::which(binary).map_err(|e| Error::ImageBuildFailure {
        command: format!("{binary} info"),
        reason: format!("{binary} not found on PATH: {e}"),
    })?;

    let status = timeout(
        INFO_TIMEOUT,
        Command::new(&resolved)
            .arg("info")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status(),
    )
    .await;

    match status {
        Err(_) => Err(Error::Timeout {
            operation: format!("{binary} info"),
            after: INFO_TIMEOUT,
        }),
        Ok(Ok(status)) if status.success() => {
            log::debug!("{} is available", resolved.display());
            Ok(resolved)
        }
        Ok(Ok(status)) => Err(Error::ImageBuildFailure {
            command: format!("{binary} info"),
            reason: format!(
                "daemon is not responding (exit code: {})",
                status.code().unwrap_or(-1)
            ),
        }),
        Ok(Err(error)) => Err(Error::CommandFailed {
            command: format!("{binary} info"),
            error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_reported() {
        let err = check_available("jpack-no-such-container-cli").await.unwrap_err();
        assert!(matches!(err, Error::ImageBuildFailure { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_info_is_reported() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let cli = tmp.path().join("fake-cli");
        std::fs::write(&cli, "#!/bin/sh\nexit 3\n").unwrap();
        std::fs::set_permissions(&cli, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = check_available(cli.to_str().unwrap()).await.unwrap_err();
        assert!(err.to_string().contains("exit code: 3"));
    }
}
