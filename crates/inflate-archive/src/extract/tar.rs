use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tar::EntryType;
use tracing::debug;

use super::Unpacker;
use crate::codec::drain;
use crate::entry::{Entry, EntryKind};
use crate::error::{Error, Result};
use crate::format::Compression;

/// Name some writers give the pax global header when it is not typed as one.
const PAX_GLOBAL_HEADER: &str = "pax_global_header";

/// Decompress and unpack a tar stream, then consume whatever the decoder and
/// the tar reader left unread.
pub(crate) fn unpack<R: Read>(
    compression: Compression,
    reader: R,
    unpacker: &mut Unpacker<'_>,
) -> Result<()> {
    let mut archive = tar::Archive::new(compression.decoder(reader)?);

    for entry in archive.entries().map_err(Error::corrupted)? {
        let mut entry = entry.map_err(Error::corrupted)?;
        if let Some(parsed) = classify(&entry)? {
            unpacker.unpack(parsed, &mut entry)?;
        }
    }

    let mut decoder = archive.into_inner();
    let trailing = drain(&mut decoder).map_err(Error::corrupted)?;
    let mut raw = decoder.into_inner();
    let padding = drain(&mut raw)?;
    debug!(trailing, padding, "drained tar stream");
    Ok(())
}

fn classify<R: Read>(entry: &tar::Entry<'_, R>) -> Result<Option<Entry>> {
    let name = entry.path().map_err(Error::corrupted)?.into_owned();
    let header = entry.header();
    let entry_type = header.entry_type();

    if entry_type == EntryType::XGlobalHeader || name == Path::new(PAX_GLOBAL_HEADER) {
        debug!(entry = %name.display(), "skipping archive metadata entry");
        return Ok(None);
    }

    let mode = header.mode().map_err(Error::corrupted)? & 0o7777;
    let kind = match entry_type {
        EntryType::Directory => EntryKind::Directory,
        EntryType::Regular | EntryType::Continuous => EntryKind::File,
        EntryType::Symlink => EntryKind::Symlink {
            target: link_name(entry, &name)?,
        },
        EntryType::Link => EntryKind::HardLink {
            target: link_name(entry, &name)?,
        },
        other => {
            return Err(Error::UnsupportedEntry {
                kind: format!("{other:?}"),
                entry: name,
            });
        }
    };

    Ok(Some(Entry::new(name, mode, kind)))
}

fn link_name<R: Read>(entry: &tar::Entry<'_, R>, name: &Path) -> Result<PathBuf> {
    match entry.link_name() {
        Ok(Some(target)) => Ok(target.into_owned()),
        Ok(None) => Err(Error::InvalidEntry {
            entry: name.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, "link entry has no target"),
        }),
        Err(source) => Err(Error::InvalidEntry {
            entry: name.to_path_buf(),
            source,
        }),
    }
}
