use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("destination '{path}' has no final path component to stage next to")]
    InvalidDestination { path: PathBuf },

    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to link '{link}' to '{target}': {source}")]
    Link {
        link: PathBuf,
        target: PathBuf,
        source: io::Error,
    },

    #[error("failed to resolve '{path}': {source}")]
    Resolve { path: PathBuf, source: io::Error },

    #[error("failed to promote '{from}' to '{to}': {source}")]
    Promote {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl Error {
    /// The underlying I/O error, whichever operation failed.
    pub fn io(&self) -> Option<&io::Error> {
        match self {
            Self::InvalidDestination { .. } => None,
            Self::CreateDir { source, .. }
            | Self::Write { source, .. }
            | Self::Link { source, .. }
            | Self::Resolve { source, .. }
            | Self::Promote { source, .. } => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
