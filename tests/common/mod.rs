#![allow(dead_code)]

use jpack::bundler::PackInfoBuilder;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

/// Project with `target/demo-1.0.0.jar` and a few resource files.
pub struct Project {
    pub dir: tempfile::TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("demo-1.0.0.jar"), b"PK\x03\x04demo").unwrap();

        std::fs::create_dir_all(dir.path().join("conf/extra")).unwrap();
        std::fs::write(dir.path().join("conf/app.yml"), b"server:\n  port: 8080\n").unwrap();
        std::fs::write(dir.path().join("conf/extra/log.xml"), b"<configuration/>").unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn target(&self) -> PathBuf {
        self.path().join("target")
    }

    pub fn home(&self) -> PathBuf {
        self.target().join("jpack")
    }

    pub fn file(&self, rel: &str) -> String {
        self.path().join(rel).display().to_string()
    }

    /// `demo` / `1.0.0` with `-Xmx512m` and `--port=8080`.
    pub fn builder(&self) -> PackInfoBuilder {
        PackInfoBuilder::new()
            .artifact_id("demo")
            .version("1.0.0")
            .description("Demo service")
            .target_dir(self.target())
            .vm_options("-Xmx512m")
            .program_args("--port=8080")
    }
}

pub fn unpack_tar_gz(archive: &Path, into: &Path) {
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(File::open(archive).unwrap()));
    archive.set_preserve_permissions(true);
    archive.unpack(into).unwrap();
}

pub fn zip_names(archive: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

pub fn zip_text(archive: &Path, name: &str) -> String {
    use std::io::Read;
    let mut archive = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut text = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut text).unwrap();
    text
}

/// Writes an executable shell script standing in for the container CLI.
///
/// Every invocation appends its arguments to `calls.log` next to the script.
/// `save -o <file>` writes `<file>`. `build` exits with `build_exit`.
#[cfg(unix)]
pub fn fake_container_cli(dir: &Path, build_exit: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-docker");
    let script = format!(
        r#"#!/bin/sh
LOG="$(dirname "$0")/calls.log"
echo "$@" >> "$LOG"
case "$1" in
  info) exit 0 ;;
  build)
    ls > "$(dirname "$0")/context.txt"
    echo "building $3"
    if [ {build_exit} -ne 0 ]; then echo "step failed" >&2; fi
    exit {build_exit} ;;
  push) exit 0 ;;
  save) echo image > "$3"; exit 0 ;;
esac
exit 0
"#
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
