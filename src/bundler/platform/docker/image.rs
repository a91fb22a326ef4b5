//! Container image build, push and save.

use crate::bundler::{Error, Result};
use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};

/// Lines of stderr kept for the failure reason.
const STDERR_TAIL: usize = 20;

/// Grace period for a killed child to exit.
const KILL_GRACE: Duration = Duration::from_secs(10);

/// Drives the container CLI.
#[derive(Debug, Clone)]
pub struct ContainerCli {
    binary: PathBuf,
    timeout: Duration,
}

impl ContainerCli {
    /// CLI at `binary`, every invocation bounded by `timeout`.
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// `build -t <image> -f Dockerfile .` in `context_dir`.
    pub async fn build(&self, image: &str, context_dir: &Path) -> Result<()> {
        self.run(&["build", "-t", image, "-f", "Dockerfile", "."], Some(context_dir))
            .await
    }

    /// `push <image>`.
    pub async fn push(&self, image: &str) -> Result<()> {
        self.run(&["push", image], None).await
    }

    /// `save -o <output> <image>`.
    pub async fn save(&self, image: &str, output: &Path) -> Result<()> {
        let output = output.to_string_lossy();
        self.run(&["save", "-o", &output, image], None).await
    }

    async fn run(&self, args: &[&str], current_dir: Option<&Path>) -> Result<()> {
        let command = format!("{} {}", self.binary.display(), args.join(" "));
        log::info!("Running {command}");

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = current_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|error| Error::CommandFailed {
            command: command.clone(),
            error,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let finished = async {
            let ((), tail, status) = tokio::join!(
                stream_lines(stdout, |line| log::info!("  {line}")),
                collect_tail(stderr),
                child.wait()
            );
            (tail, status)
        };

        let result = tokio::time::timeout(self.timeout, finished).await;
        let (tail, status) = match result {
            Ok((tail, Ok(status))) => (tail, status),
            Ok((_, Err(error))) => return Err(Error::CommandFailed { command, error }),
            Err(_elapsed) => {
                log::warn!("{command} timed out, terminating process...");
                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill {command}: {e}");
                }
                let _ = tokio::time::timeout(KILL_GRACE, child.wait()).await;
                return Err(Error::Timeout {
                    operation: command,
                    after: self.timeout,
                });
            }
        };

        if !status.success() {
            let mut reason = format!("exit code: {}", status.code().unwrap_or(-1));
            if !tail.is_empty() {
                reason.push('\n');
                reason.push_str(&Vec::from(tail).join("\n"));
            }
            return Err(Error::ImageBuildFailure { command, reason });
        }

        Ok(())
    }
}

/// Reads `reader` to EOF, passing each line to `on_line`.
///
/// Lines are decoded lossily; the pipe is drained even after a read error so
/// the child never blocks or dies on a full or closed pipe.
async fn stream_lines<R: AsyncRead + Unpin>(reader: Option<R>, mut on_line: impl FnMut(&str)) {
    let Some(reader) = reader else {
        return;
    };
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                on_line(line.trim_end_matches(['\r', '\n']));
            }
            Err(e) => {
                log::debug!("Discarding unreadable output: {e}");
                let _ = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await;
                break;
            }
        }
    }
}

/// Logs stderr and keeps its last lines.
async fn collect_tail<R: AsyncRead + Unpin>(reader: Option<R>) -> VecDeque<String> {
    let mut tail = VecDeque::with_capacity(STDERR_TAIL);
    stream_lines(reader, |line| {
        log::warn!("  {line}");
        if tail.len() == STDERR_TAIL {
            tail.pop_front();
        }
        tail.push_back(line.to_string());
    })
    .await;
    tail
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-cli");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn build_runs_in_context_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = script(tmp.path(), "pwd > \"$(dirname \"$0\")/pwd.txt\"; echo \"$@\" >> \"$(dirname \"$0\")/args.txt\"");
        let context = tmp.path().join("ctx");
        std::fs::create_dir_all(&context).unwrap();

        ContainerCli::new(&cli, Duration::from_secs(10))
            .build("demo:1.0.0", &context)
            .await
            .unwrap();

        let args = std::fs::read_to_string(tmp.path().join("args.txt")).unwrap();
        assert_eq!(args.trim(), "build -t demo:1.0.0 -f Dockerfile .");
        let pwd = std::fs::read_to_string(tmp.path().join("pwd.txt")).unwrap();
        assert!(pwd.trim().ends_with("ctx"));
    }

    #[tokio::test]
    async fn failure_reason_carries_stderr_tail() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = script(tmp.path(), "echo 'no space left' >&2; exit 2");

        let err = ContainerCli::new(&cli, Duration::from_secs(10))
            .push("demo:1.0.0")
            .await
            .unwrap_err();
        match err {
            Error::ImageBuildFailure { reason, .. } => {
                assert!(reason.contains("exit code: 2"));
                assert!(reason.contains("no space left"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn non_utf8_output_does_not_abort_the_command() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = script(
            tmp.path(),
            "printf 'step \\377\\n'\n\
             i=0; while [ $i -lt 8000 ]; do echo 'layer output padding padding padding padding'; i=$((i+1)); done\n\
             printf 'warn \\377\\n' >&2\n\
             echo done > \"$(dirname \"$0\")/finished.txt\"",
        );

        ContainerCli::new(&cli, Duration::from_secs(30))
            .push("demo:1.0.0")
            .await
            .unwrap();
        assert!(tmp.path().join("finished.txt").is_file());
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = script(tmp.path(), "exec sleep 30");

        let err = ContainerCli::new(&cli, Duration::from_millis(200))
            .push("demo:1.0.0")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }
}
