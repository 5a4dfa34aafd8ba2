//! Safe extraction of tar, tar.gz, tar.xz and zip archives.
//!
//! Every entry name is resolved against the staging root and rejected if it
//! would land outside it. Entries are written into a staging directory beside
//! the destination, which is renamed into place only after the whole archive
//! has been unpacked. Any error discards the staging directory, so the
//! destination either holds the complete tree or does not exist.
//!
//! ```no_run
//! use std::fs::File;
//!
//! let archive = File::open("release-1.2.0.tar.gz")?;
//! let report = inflate_archive::inflate_verified(
//!     "release-1.2.0.tar.gz",
//!     archive,
//!     "/opt/release-1.2.0",
//!     "sha256:0d5a0e3c1b0c8e2f0d7b0f6b5a3a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a",
//! )?;
//! println!("{} entries", report.entry_count);
//! # Ok::<(), inflate_archive::Error>(())
//! ```
//!
//! # Layout
//!
//! - `format` - suffix based format detection
//! - `codec` - decompression in front of tar, with trailing-byte drain
//! - `source` - sequential and seekable input, spooling for zip
//! - `sanitize` - containment checks for entry names and symlink targets
//! - `extract/` - per-entry materialization and per-format readers
//! - `workspace` - staged extraction and promotion

#[cfg(feature = "tar")]
mod codec;
pub mod entry;
mod error;
mod extract;
pub mod format;
mod options;
mod sanitize;
pub mod source;
mod workspace;

#[cfg(feature = "tar")]
pub use codec::{Decoder, drain};
pub use entry::{ArchiveReport, Entry, EntryKind};
pub use error::{Error, Result};
pub use extract::{
    inflate, inflate_file, inflate_file_with, inflate_tar, inflate_tar_gz, inflate_tar_gz_with,
    inflate_tar_with, inflate_tar_xz, inflate_tar_xz_with, inflate_verified,
    inflate_verified_with, inflate_with, inflate_zip, inflate_zip_with,
};
pub use format::{ArchiveFormat, Compression, is_archive};
pub use inflate_verify::{ChecksumSpec, HasherRegistry, HashingReader, VerificationError};
pub use options::InflateOptions;
pub use sanitize::{confine_symlink_target, contain};
pub use source::{SeekRead, SeekableView, Sequential, Source};
pub use workspace::{StagedExtraction, stage};
