//! Filesystem side of archive extraction.
//!
//! Everything an unpacker writes goes through a [`Staging`] directory that
//! sits next to the final destination. The staging directory is promoted with
//! a single rename once every entry has been written, and removed otherwise,
//! so a half-written tree is never visible at the destination path.

mod error;
pub mod primitives;
mod staging;

pub use error::{Error, Result};
pub use primitives::{
    create_dir_all_with_mode, ensure_parent, hard_link_with_placeholder, promote, remove_symlink,
    symlink, write_file_from_reader,
};
pub use staging::{DEFAULT_STAGING_SUFFIX, Staging, staging_path};
