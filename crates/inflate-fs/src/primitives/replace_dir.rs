use crate::{Error, Result};
use std::path::Path;

/// Rename the directory `src` to `dest`.
///
/// A single `rename(2)`: either the whole tree appears at `dest` or nothing
/// does. Fails if `dest` is a non-empty directory or lives on another device.
pub fn promote(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    std::fs::rename(src, dest).map_err(|e| Error::Promote {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_promote() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("file.txt"), "data").unwrap();

        promote(&src, &dest).unwrap();
        assert!(!src.exists());
        assert!(dest.join("file.txt").exists());
    }

    #[test]
    fn test_promote_onto_non_empty_dir_fails() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("keep.txt"), "keep").unwrap();

        assert!(matches!(promote(&src, &dest), Err(Error::Promote { .. })));
        assert_eq!(std::fs::read(dest.join("keep.txt")).unwrap(), b"keep");
    }
}
