use std::fmt;
use std::path::{Path, PathBuf};

use crate::format::ArchiveFormat;

/// One record read from an archive, before it is materialized.
///
/// `name` is untrusted: it goes through the containment guard before anything
/// touches the filesystem.
#[derive(Clone, Debug)]
pub struct Entry {
    pub name: PathBuf,
    pub mode: u32,
    pub kind: EntryKind,
}

impl Entry {
    pub fn new(name: PathBuf, mode: u32, kind: EntryKind) -> Self {
        Self { name, mode, kind }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    pub fn link_target(&self) -> Option<&Path> {
        match &self.kind {
            EntryKind::Symlink { target } | EntryKind::HardLink { target } => Some(target),
            _ => None,
        }
    }
}

/// The entry kinds that can be materialized. Anything else in an archive is
/// rejected with [`Error::UnsupportedEntry`](crate::Error::UnsupportedEntry).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink { target: PathBuf },
    HardLink { target: PathBuf },
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Directory => "directory",
            Self::File => "file",
            Self::Symlink { .. } => "symlink",
            Self::HardLink { .. } => "hard link",
        })
    }
}

/// Summary of a finished extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveReport {
    pub format: ArchiveFormat,
    pub entry_count: usize,
    /// Payload bytes written to regular files.
    pub total_bytes: u64,
}

impl ArchiveReport {
    pub(crate) fn new(format: ArchiveFormat) -> Self {
        Self {
            format,
            entry_count: 0,
            total_bytes: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_target_only_for_links() {
        let file = Entry::new(PathBuf::from("bin/tool"), 0o755, EntryKind::File);
        assert!(file.is_file());
        assert_eq!(file.link_target(), None);

        let link = Entry::new(
            PathBuf::from("lib/libz.so"),
            0o777,
            EntryKind::Symlink {
                target: PathBuf::from("libz.so.1"),
            },
        );
        assert_eq!(link.link_target(), Some(Path::new("libz.so.1")));

        let hard = Entry::new(
            PathBuf::from("bin/alias"),
            0o755,
            EntryKind::HardLink {
                target: PathBuf::from("bin/tool"),
            },
        );
        assert_eq!(hard.link_target(), Some(Path::new("bin/tool")));
    }

    #[test]
    fn kind_display() {
        assert_eq!(EntryKind::Directory.to_string(), "directory");
        assert_eq!(
            EntryKind::HardLink {
                target: PathBuf::from("a")
            }
            .to_string(),
            "hard link"
        );
    }
}
