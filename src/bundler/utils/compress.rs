//! Archive creation for platform working directories.
//!
//! Both formats walk the source tree in file-name order so the entry order is
//! reproducible for a given tree. Entry names are relative to the source
//! directory and always use `/` separators.

use crate::bail;
use crate::bundler::error::{Context, ErrorExt, Result};
use flate2::{Compression, write::GzEncoder};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use walkdir::{DirEntry, WalkDir};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Archive format of a platform bundle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArchiveFormat {
    /// `.zip`, Deflate compressed
    Zip,
    /// `.tar.gz`
    TarGz,
}

impl ArchiveFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }
}

/// Archives `source_dir` into `output` on the blocking thread pool.
///
/// The archive is written to `<output>.part` and renamed on success. A failed
/// run removes the partial file and leaves `output` untouched.
pub async fn compress(format: ArchiveFormat, source_dir: &Path, output: &Path) -> Result<()> {
    let source_dir = source_dir.to_path_buf();
    let output = output.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let partial = partial_path(&output);
        let written = match format {
            ArchiveFormat::Zip => zip(&source_dir, &partial),
            ArchiveFormat::TarGz => tar_gz(&source_dir, &partial),
        }
        .and_then(|()| {
            std::fs::rename(&partial, &output).fs_context("moving archive into place", &output)
        });

        if written.is_err() && partial.exists() {
            if let Err(e) = std::fs::remove_file(&partial) {
                log::warn!("Failed to remove {}: {e}", partial.display());
            }
        }
        written
    })
    .await
    .context("compression task panicked")?
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Writes a `.zip` of `source_dir` to `output`.
///
/// Directories get their own entries. On Unix the permission bits of every
/// entry are recorded.
pub fn zip(source_dir: &Path, output: &Path) -> Result<()> {
    let file = File::create(output).fs_context("creating archive", output)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));

    for (entry, name) in sorted_entries(source_dir)? {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(unix_mode(&entry)?);

        if entry.file_type().is_dir() {
            writer.add_directory(format!("{name}/"), options)?;
        } else {
            writer.start_file(name, options)?;
            let mut source = File::open(entry.path()).fs_context("opening file", entry.path())?;
            io::copy(&mut source, &mut writer).fs_context("compressing file", entry.path())?;
        }
    }

    writer
        .finish()?
        .flush()
        .fs_context("flushing archive", output)?;
    Ok(())
}

/// Writes a gzip-compressed tarball of `source_dir` to `output`.
///
/// Headers are written in deterministic mode: ownership and timestamps are
/// dropped, the executable bit is kept.
pub fn tar_gz(source_dir: &Path, output: &Path) -> Result<()> {
    let file = File::create(output).fs_context("creating archive", output)?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.mode(tar::HeaderMode::Deterministic);

    for (entry, name) in sorted_entries(source_dir)? {
        if entry.file_type().is_dir() {
            builder
                .append_dir(&name, entry.path())
                .fs_context("adding directory to archive", entry.path())?;
        } else {
            builder
                .append_path_with_name(entry.path(), &name)
                .fs_context("adding file to archive", entry.path())?;
        }
    }

    builder
        .into_inner()
        .and_then(|gz| gz.finish())
        .and_then(|mut out| out.flush())
        .fs_context("finishing archive", output)?;
    Ok(())
}

/// Collects every entry under `root` (excluding `root` itself) in file-name
/// order together with its archive name.
fn sorted_entries(root: &Path) -> Result<Vec<(DirEntry, String)>> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let name = archive_name(entry.path().strip_prefix(root)?);
        entries.push((entry, name));
    }
    Ok(entries)
}

fn archive_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn unix_mode(entry: &DirEntry) -> Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    let metadata = std::fs::metadata(entry.path()).fs_context("reading metadata", entry.path())?;
    Ok(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn unix_mode(entry: &DirEntry) -> Result<u32> {
    Ok(if entry.file_type().is_dir() { 0o755 } else { 0o644 })
}

/// Archive path next to `source_dir`: `<parent>/<name>.<ext>`.
pub fn sibling_archive_path(source_dir: &Path, name: &str, format: ArchiveFormat) -> PathBuf {
    let parent = source_dir.parent().unwrap_or(source_dir);
    parent.join(format!("{name}.{}", format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::BTreeMap, io::Read};

    /// Builds a small tree: bin/start.sh (0755), docs/, logs/, app.jar.
    fn sample_tree() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("linux");
        for dir in ["bin", "docs", "logs"] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
        }
        std::fs::write(root.join("bin/start.sh"), b"#!/bin/sh\necho start\n").unwrap();
        std::fs::write(root.join("app.jar"), [0u8, 1, 2, 3, 255]).unwrap();
        std::fs::write(root.join("docs/README.md"), b"# readme").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(
                root.join("bin/start.sh"),
                std::fs::Permissions::from_mode(0o755),
            )
            .unwrap();
        }
        tmp
    }

    fn read_tree(root: &Path) -> BTreeMap<String, Option<Vec<u8>>> {
        sorted_entries(root)
            .unwrap()
            .into_iter()
            .map(|(entry, name)| {
                let contents = entry
                    .file_type()
                    .is_file()
                    .then(|| std::fs::read(entry.path()).unwrap());
                (name, contents)
            })
            .collect()
    }

    #[test]
    fn tar_gz_round_trip_preserves_tree_and_exec_bit() {
        let tmp = sample_tree();
        let root = tmp.path().join("linux");
        let output = sibling_archive_path(&root, "demo", ArchiveFormat::TarGz);
        assert_eq!(output, tmp.path().join("demo.tar.gz"));

        tar_gz(&root, &output).unwrap();

        let extracted = tmp.path().join("extracted");
        let mut archive =
            tar::Archive::new(flate2::read::GzDecoder::new(File::open(&output).unwrap()));
        archive.set_preserve_permissions(true);
        archive.unpack(&extracted).unwrap();

        assert_eq!(read_tree(&root), read_tree(&extracted));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(extracted.join("bin/start.sh"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o111, 0o111);
            let jar_mode = std::fs::metadata(extracted.join("app.jar"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(jar_mode & 0o111, 0);
        }
    }

    #[test]
    fn zip_round_trip_preserves_tree() {
        let tmp = sample_tree();
        let root = tmp.path().join("linux");
        let output = tmp.path().join("demo.zip");

        zip(&root, &output).unwrap();

        let mut archive = ::zip::ZipArchive::new(File::open(&output).unwrap()).unwrap();
        let mut names = Vec::new();
        for i in 0..archive.len() {
            names.push(archive.by_index(i).unwrap().name().to_string());
        }
        assert_eq!(
            names,
            vec![
                "app.jar",
                "bin/",
                "bin/start.sh",
                "docs/",
                "docs/README.md",
                "logs/",
            ]
        );

        let mut jar = Vec::new();
        archive
            .by_name("app.jar")
            .unwrap()
            .read_to_end(&mut jar)
            .unwrap();
        assert_eq!(jar, vec![0u8, 1, 2, 3, 255]);

        #[cfg(unix)]
        {
            let mode = archive.by_name("bin/start.sh").unwrap().unix_mode().unwrap();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn entry_order_is_stable() {
        let tmp = sample_tree();
        let root = tmp.path().join("linux");
        let first: Vec<_> = sorted_entries(&root).unwrap().into_iter().map(|(_, n)| n).collect();
        let second: Vec<_> = sorted_entries(&root).unwrap().into_iter().map(|(_, n)| n).collect();
        assert_eq!(first, second);
        assert_eq!(first.first().map(String::as_str), Some("app.jar"));
    }

    #[test]
    fn missing_source_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(tar_gz(&tmp.path().join("nope"), &tmp.path().join("x.tar.gz")).is_err());
    }

    #[tokio::test]
    async fn failed_compression_leaves_no_partial_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("demo.zip");

        let result = compress(ArchiveFormat::Zip, &tmp.path().join("nope"), &output).await;
        assert!(result.is_err());
        assert!(!output.exists());
        assert!(!tmp.path().join("demo.zip.part").exists());
    }

    #[tokio::test]
    async fn compress_replaces_previous_archive() {
        let tmp = sample_tree();
        let root = tmp.path().join("linux");
        let output = tmp.path().join("demo.tar.gz");
        std::fs::write(&output, b"stale").unwrap();

        compress(ArchiveFormat::TarGz, &root, &output).await.unwrap();

        let mut archive =
            tar::Archive::new(flate2::read::GzDecoder::new(File::open(&output).unwrap()));
        assert!(archive.entries().unwrap().count() > 0);
        assert!(!tmp.path().join("demo.tar.gz.part").exists());
    }
}
