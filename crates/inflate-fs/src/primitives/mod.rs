pub mod hardlink;
pub mod replace_dir;
pub mod rw;
pub mod symlink;

pub use hardlink::hard_link_with_placeholder;
pub use replace_dir::promote;
pub use rw::{create_dir_all_with_mode, ensure_parent, remove_symlink, write_file_from_reader};
pub use symlink::symlink;

/// Mode used for parent directories that no archive entry describes.
pub const IMPLICIT_DIR_MODE: u32 = 0o755;
