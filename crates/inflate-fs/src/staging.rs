use std::ffi::OsString;
use std::fs::{self, DirBuilder};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::primitives::rw::remove_dir_all_if_exists;
use crate::primitives::{IMPLICIT_DIR_MODE, create_dir_all_with_mode, promote};
use crate::{Error, Result};

pub const DEFAULT_STAGING_SUFFIX: &str = ".tmp";

/// Sibling path used to stage `destination`: the destination plus `suffix`.
///
/// Pure function of its inputs, so extractions into different destinations
/// never share a staging directory. Only meaningful when `destination` has a
/// final component; for `.`, `..` or `/` the result is not a sibling, which is
/// why [`Staging::begin`] refuses such destinations.
pub fn staging_path(destination: &Path, suffix: &str) -> PathBuf {
    // Collecting the components drops a trailing separator, so "out/" stages
    // into "out.tmp" rather than "out/.tmp".
    let normalized: PathBuf = destination.components().collect();
    let mut name: OsString = normalized.into_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// A private directory next to the final destination.
///
/// Unless [`Staging::commit`] succeeds, the directory tree is removed when the
/// value is dropped.
#[derive(Debug)]
pub struct Staging {
    path: PathBuf,
    root: PathBuf,
    destination: PathBuf,
    committed: bool,
}

impl Staging {
    /// Create a fresh staging directory for `destination`.
    ///
    /// A leftover directory from an interrupted run is removed first. The new
    /// directory is created with mode `0o700` and then canonicalized; the
    /// canonical path is what [`Staging::path`] returns and what every
    /// archive entry is checked against.
    ///
    /// Destinations without a final component (`.`, `..`, `/`) are rejected.
    pub fn begin(destination: impl AsRef<Path>, suffix: &str) -> Result<Self> {
        let destination = destination.as_ref().to_path_buf();
        if destination.file_name().is_none() {
            return Err(Error::InvalidDestination { path: destination });
        }
        let path = staging_path(&destination, suffix);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all_with_mode(parent, IMPLICIT_DIR_MODE)?;
        }

        if fs::symlink_metadata(&path).is_ok() {
            debug!(path = %path.display(), "removing stale staging directory");
            remove_dir_all_if_exists(&path).map_err(|e| Error::CreateDir {
                path: path.clone(),
                source: e,
            })?;
        }

        let mut builder = DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder.create(&path).map_err(|e| Error::CreateDir {
            path: path.clone(),
            source: e,
        })?;

        let root = match fs::canonicalize(&path) {
            Ok(root) => root,
            Err(e) => {
                let _ = remove_dir_all_if_exists(&path);
                return Err(Error::Resolve { path, source: e });
            }
        };
        debug!(staging = %root.display(), "created staging directory");

        Ok(Self {
            path,
            root,
            destination,
            committed: false,
        })
    }

    /// Canonical, symlink-free path of the staging directory.
    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Atomically rename the staging directory to the destination.
    pub fn commit(mut self) -> Result<()> {
        promote(&self.path, &self.destination)?;
        self.committed = true;
        debug!(destination = %self.destination.display(), "promoted staging directory");
        Ok(())
    }

    /// Discard everything written so far.
    pub fn abort(self) {
        drop(self);
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(e) = remove_dir_all_if_exists(&self.path) {
            warn!(
                staging = %self.path.display(),
                error = %e,
                "failed to remove staging directory",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_staging_path_appends_suffix() {
        assert_eq!(
            staging_path(Path::new("out/pkg"), ".tmp"),
            PathBuf::from("out/pkg.tmp")
        );
        assert_eq!(
            staging_path(Path::new("out/pkg/"), ".tmp"),
            PathBuf::from("out/pkg.tmp")
        );
    }

    #[test]
    fn test_destination_without_name_is_rejected() {
        for dest in [".", "..", "out/..", "/"] {
            let err = Staging::begin(dest, DEFAULT_STAGING_SUFFIX).unwrap_err();
            assert!(
                matches!(err, Error::InvalidDestination { ref path } if path == Path::new(dest)),
                "{dest}: {err}"
            );
        }
    }

    #[test]
    fn test_staging_is_canonical_sibling() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        let staging = Staging::begin(&dest, DEFAULT_STAGING_SUFFIX).unwrap();

        assert!(staging.path().is_absolute());
        assert!(staging.path().is_dir());
        assert_eq!(
            staging.path(),
            fs::canonicalize(dir.path().join("dest.tmp")).unwrap()
        );
        assert!(!dest.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_staging_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let staging = Staging::begin(dir.path().join("dest"), ".tmp").unwrap();
        let mode = fs::metadata(staging.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn test_commit_promotes() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        let staging = Staging::begin(&dest, ".tmp").unwrap();
        fs::write(staging.path().join("file.txt"), "data").unwrap();

        staging.commit().unwrap();
        assert_eq!(fs::read(dest.join("file.txt")).unwrap(), b"data");
        assert!(!dir.path().join("dest.tmp").exists());
    }

    #[test]
    fn test_drop_removes_staging() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        {
            let staging = Staging::begin(&dest, ".tmp").unwrap();
            fs::create_dir_all(staging.path().join("a/b")).unwrap();
            fs::write(staging.path().join("a/b/file.txt"), "data").unwrap();
        }
        assert!(!dir.path().join("dest.tmp").exists());
        assert!(!dest.exists());
    }

    #[test]
    fn test_stale_staging_is_replaced() {
        let dir = tempdir().unwrap();
        let stale = dir.path().join("dest.tmp");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("leftover.txt"), "old").unwrap();

        let staging = Staging::begin(dir.path().join("dest"), ".tmp").unwrap();
        assert!(!staging.path().join("leftover.txt").exists());
    }

    #[test]
    fn test_failed_commit_cleans_up() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("keep.txt"), "keep").unwrap();

        let staging = Staging::begin(&dest, ".tmp").unwrap();
        fs::write(staging.path().join("new.txt"), "new").unwrap();

        assert!(matches!(staging.commit(), Err(Error::Promote { .. })));
        assert!(!dir.path().join("dest.tmp").exists());
        assert_eq!(fs::read(dest.join("keep.txt")).unwrap(), b"keep");
        assert!(!dest.join("new.txt").exists());
    }
}
