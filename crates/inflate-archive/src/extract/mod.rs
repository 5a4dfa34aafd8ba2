//! Per-entry materialization and the public `inflate*` entry points.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use inflate_fs::{
    create_dir_all_with_mode, ensure_parent, hard_link_with_placeholder, remove_symlink, symlink,
    write_file_from_reader,
};
use inflate_verify::HashingReader;
use tracing::{debug, warn};

use crate::entry::{ArchiveReport, Entry, EntryKind};
use crate::error::{Error, Result};
use crate::format::{ArchiveFormat, Compression};
use crate::options::InflateOptions;
use crate::sanitize::{confine_symlink_target, contain, parent_within_root};
use crate::source::Source;
use crate::workspace::stage;

#[cfg(feature = "tar")]
pub(crate) mod tar;
#[cfg(feature = "zip")]
pub(crate) mod zip;

/// Writes entries beneath a staging root, one at a time, in archive order.
pub(crate) struct Unpacker<'a> {
    root: &'a Path,
    options: &'a InflateOptions,
    report: ArchiveReport,
}

impl<'a> Unpacker<'a> {
    pub(crate) fn new(root: &'a Path, format: ArchiveFormat, options: &'a InflateOptions) -> Self {
        Self {
            root,
            options,
            report: ArchiveReport::new(format),
        }
    }

    #[cfg_attr(not(feature = "zip"), allow(dead_code))]
    pub(crate) fn spool_dir(&self) -> &Path {
        self.options.spool_dir_for(self.root)
    }

    /// Materialize one entry. `payload` is only read for regular files.
    pub(crate) fn unpack<R: Read + ?Sized>(&mut self, entry: Entry, payload: &mut R) -> Result<()> {
        let Some(path) = contain(self.root, &entry.name)? else {
            debug!(entry = %entry.name.display(), "entry resolves to the root, skipping");
            return Ok(());
        };
        self.check_parent(&path, || Error::ZipSlip {
            entry: entry.name.clone(),
            root: self.root.to_path_buf(),
        })?;
        debug!(entry = %entry.name.display(), kind = %entry.kind, mode = entry.mode, "extracting");

        match &entry.kind {
            EntryKind::Directory => create_dir_all_with_mode(&path, entry.mode)?,
            EntryKind::File => {
                ensure_parent(&path)?;
                remove_symlink(&path)?;
                let mut payload = TrackedReader::new(payload);
                self.report.total_bytes += match write_file_from_reader(&path, entry.mode, &mut payload) {
                    Ok(written) => written,
                    Err(inflate_fs::Error::Write { source, .. }) if payload.failed => {
                        return Err(Error::InvalidEntry {
                            entry: entry.name.clone(),
                            source,
                        });
                    }
                    Err(e) => return Err(e.into()),
                };
            }
            EntryKind::Symlink { target } => {
                if self.options.confine_symlinks {
                    confine_symlink_target(self.root, &path, target)?;
                }
                ensure_parent(&path)?;
                remove_symlink(&path)?;
                symlink(target, &path)?;
            }
            EntryKind::HardLink { target } => {
                let invalid = || Error::InvalidLinkTarget {
                    entry: entry.name.clone(),
                    target: target.clone(),
                };
                let target_path = contain(self.root, target)
                    .map_err(|_| invalid())?
                    .ok_or_else(invalid)?;
                self.check_parent(&target_path, invalid)?;
                ensure_parent(&path)?;
                ensure_parent(&target_path)?;
                hard_link_with_placeholder(&target_path, &path, entry.mode)?;
            }
        }

        self.report.entry_count += 1;
        Ok(())
    }

    /// Reject `path` when an existing symlink routes its parent out of the root.
    fn check_parent(&self, path: &Path, escape: impl FnOnce() -> Error) -> Result<()> {
        match parent_within_root(self.root, path) {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!(path = %path.display(), "parent directory resolves outside the extraction root");
                Err(escape())
            }
            Err(source) => Err(inflate_fs::Error::Resolve {
                path: path.to_path_buf(),
                source,
            }
            .into()),
        }
    }

    pub(crate) fn finish(self) -> ArchiveReport {
        self.report
    }
}

/// Remembers whether a read failed, so a broken payload is not reported as a
/// failed write.
struct TrackedReader<'r, R: ?Sized> {
    inner: &'r mut R,
    failed: bool,
}

impl<'r, R: Read + ?Sized> TrackedReader<'r, R> {
    fn new(inner: &'r mut R) -> Self {
        Self {
            inner,
            failed: false,
        }
    }
}

impl<R: Read + ?Sized> Read for TrackedReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).inspect_err(|_| self.failed = true)
    }
}

fn detect(name: &str) -> Result<ArchiveFormat> {
    ArchiveFormat::detect_from_name(name).ok_or_else(|| Error::UnknownFormat {
        name: name.to_owned(),
    })
}

/// Extract `source` into `destination`, picking the format from `name`.
///
/// `destination` only appears once every entry has been written; on error it
/// is left untouched.
pub fn inflate<S: Source>(name: &str, source: S, destination: impl AsRef<Path>) -> Result<ArchiveReport> {
    inflate_with(name, source, destination, &InflateOptions::default())
}

pub fn inflate_with<S: Source>(
    name: &str,
    source: S,
    destination: impl AsRef<Path>,
    options: &InflateOptions,
) -> Result<ArchiveReport> {
    stage(detect(name)?, source, destination, options)?.commit()
}

pub fn inflate_tar<S: Source>(source: S, destination: impl AsRef<Path>) -> Result<ArchiveReport> {
    inflate_tar_with(source, destination, &InflateOptions::default())
}

pub fn inflate_tar_with<S: Source>(
    source: S,
    destination: impl AsRef<Path>,
    options: &InflateOptions,
) -> Result<ArchiveReport> {
    stage(ArchiveFormat::Tar(Compression::None), source, destination, options)?.commit()
}

pub fn inflate_tar_gz<S: Source>(source: S, destination: impl AsRef<Path>) -> Result<ArchiveReport> {
    inflate_tar_gz_with(source, destination, &InflateOptions::default())
}

pub fn inflate_tar_gz_with<S: Source>(
    source: S,
    destination: impl AsRef<Path>,
    options: &InflateOptions,
) -> Result<ArchiveReport> {
    stage(ArchiveFormat::Tar(Compression::Gzip), source, destination, options)?.commit()
}

pub fn inflate_tar_xz<S: Source>(source: S, destination: impl AsRef<Path>) -> Result<ArchiveReport> {
    inflate_tar_xz_with(source, destination, &InflateOptions::default())
}

pub fn inflate_tar_xz_with<S: Source>(
    source: S,
    destination: impl AsRef<Path>,
    options: &InflateOptions,
) -> Result<ArchiveReport> {
    stage(ArchiveFormat::Tar(Compression::Xz), source, destination, options)?.commit()
}

pub fn inflate_zip<S: Source>(source: S, destination: impl AsRef<Path>) -> Result<ArchiveReport> {
    inflate_zip_with(source, destination, &InflateOptions::default())
}

pub fn inflate_zip_with<S: Source>(
    source: S,
    destination: impl AsRef<Path>,
    options: &InflateOptions,
) -> Result<ArchiveReport> {
    stage(ArchiveFormat::Zip, source, destination, options)?.commit()
}

/// Extract a local archive file, picking the format from its file name.
pub fn inflate_file(path: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<ArchiveReport> {
    inflate_file_with(path, destination, &InflateOptions::default())
}

pub fn inflate_file_with(
    path: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &InflateOptions,
) -> Result<ArchiveReport> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let format = detect(&name)?;
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    stage(format, file, destination, options)?.commit()
}

/// Extract `source` and check it against `checksum` (`"<algorithm>:<hex>"`)
/// before promoting.
///
/// The digest covers every byte of `source`, including anything past the
/// archive's logical end. On mismatch the staged tree is discarded and
/// `destination` never appears.
pub fn inflate_verified<R: Read>(
    name: &str,
    source: R,
    destination: impl AsRef<Path>,
    checksum: &str,
) -> Result<ArchiveReport> {
    inflate_verified_with(name, source, destination, checksum, &InflateOptions::default())
}

pub fn inflate_verified_with<R: Read>(
    name: &str,
    source: R,
    destination: impl AsRef<Path>,
    checksum: &str,
    options: &InflateOptions,
) -> Result<ArchiveReport> {
    let format = detect(name)?;
    let mut reader = HashingReader::new(source, checksum)?;
    let staged = stage(format, &mut reader, destination, options)?;
    reader.validate_checksum()?;
    staged.commit()
}
