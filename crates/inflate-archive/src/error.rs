use std::io;
use std::path::PathBuf;

use crate::format::Compression;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown archive format of {name}")]
    UnknownFormat { name: String },

    #[error("{format} support is not compiled in")]
    FormatDisabled { format: &'static str },

    #[error("failed to open archive '{path}': {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("malformed {compression} header: {source}")]
    MalformedHeader {
        compression: Compression,
        source: io::Error,
    },

    #[error("archive is corrupted: {source}")]
    Corrupted { source: io::Error },

    #[cfg(feature = "zip")]
    #[error("zip archive is corrupted: {0}")]
    CorruptedZip(#[from] zip::result::ZipError),

    #[error("zip-slip attack detected: entry '{entry}' is outside base directory '{root}'")]
    ZipSlip { entry: PathBuf, root: PathBuf },

    #[error("symlink target escapes base directory: '{link}' -> '{target}'")]
    SymlinkEscape { link: PathBuf, target: PathBuf },

    #[error("hard link '{entry}' has an invalid target '{target}'")]
    InvalidLinkTarget { entry: PathBuf, target: PathBuf },

    #[error("unsupported file type: {kind} for {entry}")]
    UnsupportedEntry { kind: String, entry: PathBuf },

    #[error("failed to read entry '{entry}': {source}")]
    InvalidEntry { entry: PathBuf, source: io::Error },

    #[error("failed to spool archive into a seekable file: {source}")]
    Spool { source: io::Error },

    #[error(transparent)]
    Fs(#[from] inflate_fs::Error),

    #[error(transparent)]
    Verification(#[from] inflate_verify::VerificationError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn corrupted(source: io::Error) -> Self {
        Self::Corrupted { source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
