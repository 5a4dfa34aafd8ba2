use std::path::{Path, PathBuf};

use inflate_fs::DEFAULT_STAGING_SUFFIX;

/// Knobs for a single extraction.
#[derive(Clone, Debug)]
pub struct InflateOptions {
    pub staging_suffix: String,
    pub confine_symlinks: bool,
    pub spool_dir: Option<PathBuf>,
}

impl Default for InflateOptions {
    fn default() -> Self {
        Self {
            staging_suffix: DEFAULT_STAGING_SUFFIX.to_owned(),
            confine_symlinks: false,
            spool_dir: None,
        }
    }
}

impl InflateOptions {
    /// Suffix appended to the destination to name the staging directory.
    pub fn staging_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.staging_suffix = suffix.into();
        self
    }

    /// Reject symlinks whose target resolves outside the extraction root.
    pub fn confine_symlinks(mut self, confine: bool) -> Self {
        self.confine_symlinks = confine;
        self
    }

    /// Directory for the temporary copy of non-seekable zip input.
    pub fn spool_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spool_dir = Some(dir.into());
        self
    }

    pub(crate) fn spool_dir_for<'a>(&'a self, staging_root: &'a Path) -> &'a Path {
        match &self.spool_dir {
            Some(dir) => dir,
            None => staging_root.parent().unwrap_or(staging_root),
        }
    }
}
