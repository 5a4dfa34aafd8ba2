use std::fs::{self, DirBuilder, OpenOptions};
use std::io::{self, Read};
use std::path::Path;

use super::IMPLICIT_DIR_MODE;
use crate::{Error, Result};

/// Create `path` and any missing ancestors. An existing directory is not an error.
///
/// `mode` applies to every directory this call creates and is filtered by the
/// process umask. It is ignored on non-unix platforms.
pub fn create_dir_all_with_mode(path: impl AsRef<Path>, mode: u32) -> Result<()> {
    let path = path.as_ref();
    let mut builder = DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder.create(path).map_err(|e| Error::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Make sure the directory that will hold `path` exists.
pub fn ensure_parent(path: impl AsRef<Path>) -> Result<()> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            create_dir_all_with_mode(parent, IMPLICIT_DIR_MODE)
        }
        _ => Ok(()),
    }
}

/// Create (or truncate) `path` with `mode` and copy `reader` into it until EOF.
///
/// Returns the number of bytes written. The file handle is closed before
/// returning on every path.
pub fn write_file_from_reader<R: Read + ?Sized>(
    path: impl AsRef<Path>,
    mode: u32,
    reader: &mut R,
) -> Result<u64> {
    let path = path.as_ref();
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let write_err = |e: io::Error| Error::Write {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = options.open(path).map_err(write_err)?;
    let written = io::copy(reader, &mut file).map_err(write_err)?;
    drop(file);

    Ok(written)
}

/// Remove `path` if it is a symlink, so the next write replaces the link
/// instead of following it.
pub fn remove_symlink(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::remove_file(path).map_err(|e| Error::Write {
                path: path.to_path_buf(),
                source: e,
            })
        }
        _ => Ok(()),
    }
}

/// Remove a directory tree, treating an already missing tree as success.
pub(crate) fn remove_dir_all_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_dir_all_existing_is_ok() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/c");
        create_dir_all_with_mode(&path, 0o755).unwrap();
        create_dir_all_with_mode(&path, 0o755).unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn test_ensure_parent() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("x/y/file.txt");
        ensure_parent(&file).unwrap();
        assert!(dir.path().join("x/y").is_dir());
        assert!(!file.exists());
    }

    #[test]
    fn test_write_file_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "a much longer original").unwrap();

        let written = write_file_from_reader(&path, 0o644, &mut &b"short"[..]).unwrap();
        assert_eq!(written, 5);
        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_applies_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("tool");
        write_file_from_reader(&path, 0o700, &mut &b"#!/bin/sh"[..]).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_symlink_leaves_target_alone() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target.txt");
        let link = dir.path().join("link");
        fs::write(&target, "keep").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        remove_symlink(&link).unwrap();
        remove_symlink(&target).unwrap();
        assert!(fs::symlink_metadata(&link).is_err());
        assert_eq!(fs::read_to_string(&target).unwrap(), "keep");
    }

    #[test]
    fn test_write_file_missing_parent_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing/file.txt");
        let err = write_file_from_reader(&path, 0o644, &mut &b"x"[..]).unwrap_err();
        match err {
            Error::Write { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
