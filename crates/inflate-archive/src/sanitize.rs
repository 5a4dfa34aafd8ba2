use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve an untrusted entry name beneath `root`.
///
/// The name is normalized lexically: `.` is dropped, `..` pops one level, and a
/// leading `/` (or drive prefix) is ignored, so absolute names land inside
/// `root` as well. A `..` that would climb above `root` is a zip-slip.
///
/// Returns `None` when the name resolves to `root` itself.
pub fn contain(root: &Path, entry: &Path) -> Result<Option<PathBuf>> {
    let relative = normalize(entry).ok_or_else(|| Error::ZipSlip {
        entry: entry.to_path_buf(),
        root: root.to_path_buf(),
    })?;

    if relative.as_os_str().is_empty() {
        return Ok(None);
    }
    Ok(Some(root.join(relative)))
}

/// Check that a symlink placed at `link` (already contained in `root`) points
/// somewhere inside `root`.
///
/// The target is interpreted relative to the link's parent directory, the same
/// way the kernel resolves it. Absolute targets are always rejected.
pub fn confine_symlink_target(root: &Path, link: &Path, target: &Path) -> Result<()> {
    let escape = || Error::SymlinkEscape {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
    };

    if target.has_root() {
        return Err(escape());
    }

    let parent = link
        .parent()
        .and_then(|p| p.strip_prefix(root).ok())
        .ok_or_else(escape)?;
    normalize(&parent.join(target)).map(drop).ok_or_else(escape)
}

/// Whether the directory that will hold `path` really lies inside `root`.
///
/// [`contain`] only looks at the name. A symlink written by an earlier entry
/// can still redirect a later write, so the deepest existing ancestor of
/// `path` is canonicalized and must stay under `root`, which has to be
/// canonical itself. A dangling symlink on the way counts as outside.
/// Directories below that ancestor do not exist yet and get created as real
/// directories.
pub fn parent_within_root(root: &Path, path: &Path) -> io::Result<bool> {
    let mut ancestor = path.parent();
    while let Some(dir) = ancestor {
        match fs::symlink_metadata(dir) {
            Ok(_) => {
                return match fs::canonicalize(dir) {
                    Ok(resolved) => Ok(resolved.starts_with(root)),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
                    Err(e) => Err(e),
                };
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => ancestor = dir.parent(),
            Err(e) => return Err(e),
        }
    }
    Ok(false)
}

/// Lexically clean `path` into a relative path, or `None` if it climbs out.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(out)
}
