use std::path::Path;

use inflate_fs::Staging;
use tracing::info;

use crate::entry::ArchiveReport;
use crate::error::{Error, Result};
use crate::extract::Unpacker;
use crate::format::{ArchiveFormat, Compression};
use crate::options::InflateOptions;
use crate::source::Source;

/// A fully unpacked archive that has not been promoted yet.
///
/// Dropping it (or calling [`StagedExtraction::abort`]) removes the staging
/// directory; nothing is ever written at the destination path.
#[derive(Debug)]
pub struct StagedExtraction {
    staging: Staging,
    report: ArchiveReport,
}

impl StagedExtraction {
    /// Rename the staging directory onto the destination.
    pub fn commit(self) -> Result<ArchiveReport> {
        let destination = self.staging.destination().to_path_buf();
        self.staging.commit()?;
        info!(
            destination = %destination.display(),
            format = %self.report.format,
            entries = self.report.entry_count,
            bytes = self.report.total_bytes,
            "archive extracted",
        );
        Ok(self.report)
    }

    pub fn abort(self) {
        self.staging.abort();
    }

    pub fn report(&self) -> &ArchiveReport {
        &self.report
    }

    /// Canonical path of the staged tree; also the containment root every
    /// entry was checked against.
    pub fn staging_path(&self) -> &Path {
        self.staging.path()
    }
}

/// Unpack `source` as `format` into a staging directory beside `destination`.
pub fn stage<S: Source>(
    format: ArchiveFormat,
    mut source: S,
    destination: impl AsRef<Path>,
    options: &InflateOptions,
) -> Result<StagedExtraction> {
    ensure_enabled(format)?;

    let staging = Staging::begin(destination, &options.staging_suffix)?;
    let mut unpacker = Unpacker::new(staging.path(), format, options);

    match format {
        #[cfg(feature = "tar")]
        ArchiveFormat::Tar(compression) => {
            crate::extract::tar::unpack(compression, &mut source, &mut unpacker)?
        }
        #[cfg(feature = "zip")]
        ArchiveFormat::Zip => crate::extract::zip::unpack(&mut source, &mut unpacker)?,
        #[allow(unreachable_patterns)]
        _ => unreachable!("disabled formats are rejected before staging"),
    }

    let report = unpacker.finish();
    Ok(StagedExtraction { staging, report })
}

fn ensure_enabled(format: ArchiveFormat) -> Result<()> {
    let enabled = match format {
        ArchiveFormat::Tar(Compression::Xz) => cfg!(feature = "xz"),
        ArchiveFormat::Tar(_) => cfg!(feature = "tar"),
        ArchiveFormat::Zip => cfg!(feature = "zip"),
    };
    if enabled {
        Ok(())
    } else {
        Err(Error::FormatDisabled {
            format: format.name(),
        })
    }
}
