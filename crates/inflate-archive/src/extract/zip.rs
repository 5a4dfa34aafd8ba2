use std::io::Read;
use std::path::PathBuf;

use super::Unpacker;
use crate::entry::{Entry, EntryKind};
use crate::error::{Error, Result};
use crate::source::Source;

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

const DEFAULT_DIR_MODE: u32 = 0o755;
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Unpack a zip archive, walking its central directory in order.
pub(crate) fn unpack<S: Source + ?Sized>(source: &mut S, unpacker: &mut Unpacker<'_>) -> Result<()> {
    let spool_dir = unpacker.spool_dir().to_path_buf();
    let view = source
        .seekable_view(&spool_dir)
        .map_err(|source| Error::Spool { source })?;
    let mut archive = zip::ZipArchive::new(view)?;

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let name = PathBuf::from(file.name());
        let unix_mode = file.unix_mode();

        let kind = if file.is_dir() {
            EntryKind::Directory
        } else if unix_mode.is_some_and(|mode| mode & S_IFMT == S_IFLNK) {
            let mut target = String::new();
            file.read_to_string(&mut target)
                .map_err(|source| Error::InvalidEntry {
                    entry: name.clone(),
                    source,
                })?;
            EntryKind::Symlink {
                target: PathBuf::from(target),
            }
        } else {
            EntryKind::File
        };

        let mode = match unix_mode {
            Some(mode) => mode & 0o7777,
            None if kind == EntryKind::Directory => DEFAULT_DIR_MODE,
            None => DEFAULT_FILE_MODE,
        };

        unpacker.unpack(Entry::new(name, mode, kind), &mut file)?;
    }
    Ok(())
}
