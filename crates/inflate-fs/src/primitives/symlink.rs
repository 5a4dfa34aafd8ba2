use crate::{Error, Result};
use std::path::Path;

/// Create a symbolic link at `link` whose target is `target`, verbatim.
///
/// The target is not resolved or checked; it may dangle.
pub fn symlink(target: impl AsRef<Path>, link: impl AsRef<Path>) -> Result<()> {
    let target = target.as_ref();
    let link = link.as_ref();

    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(target, link);

    #[cfg(windows)]
    let result = {
        let resolved = link.parent().map(|p| p.join(target));
        if resolved.is_some_and(|p| p.is_dir()) {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    };

    result.map_err(|e| Error::Link {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
        source: e,
    })
}
