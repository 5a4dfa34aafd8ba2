use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use crate::{Error, Result};

/// Hard-link `link` to `target`, creating an empty placeholder at `target`
/// first if nothing is there yet.
///
/// Archives may list a hard link before the file it points to. The
/// placeholder shares its inode with the link, so when the target's own entry
/// is written later (opened with truncate, not replaced) both names see the
/// content.
pub fn hard_link_with_placeholder(
    target: impl AsRef<Path>,
    link: impl AsRef<Path>,
    mode: u32,
) -> Result<()> {
    let target = target.as_ref();
    let link = link.as_ref();

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    match options.open(target) {
        Ok(placeholder) => drop(placeholder),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
        Err(e) => {
            return Err(Error::Write {
                path: target.to_path_buf(),
                source: e,
            });
        }
    }

    std::fs::hard_link(target, link).map_err(|e| Error::Link {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
        source: e,
    })
}
