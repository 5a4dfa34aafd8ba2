use std::fmt;

/// Archive container plus, for tar, its compression stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    Tar(Compression),
    Zip,
}

/// Compression codec wrapped around a tar stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compression {
    None,
    Gzip,
    Xz,
}

impl ArchiveFormat {
    /// Pick a format from the suffix of an archive name.
    ///
    /// Matching is case-sensitive and checks `.tar`, `.tar.gz`, `.tgz`,
    /// `.tar.xz` and `.zip`, in that order.
    pub fn detect_from_name(name: &str) -> Option<Self> {
        if name.ends_with(".tar") {
            Some(Self::Tar(Compression::None))
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::Tar(Compression::Gzip))
        } else if name.ends_with(".tar.xz") {
            Some(Self::Tar(Compression::Xz))
        } else if name.ends_with(".zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Tar(Compression::None) => "tar",
            Self::Tar(Compression::Gzip) => "tar.gz",
            Self::Tar(Compression::Xz) => "tar.xz",
            Self::Zip => "zip",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Tar(Compression::None) => &[".tar"],
            Self::Tar(Compression::Gzip) => &[".tar.gz", ".tgz"],
            Self::Tar(Compression::Xz) => &[".tar.xz"],
            Self::Zip => &[".zip"],
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Compression {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Xz => "xz",
        }
    }

    /// Leading bytes every stream of this codec starts with.
    pub fn magic(&self) -> &'static [u8] {
        match self {
            Self::None => &[],
            Self::Gzip => &[0x1F, 0x8B],
            Self::Xz => &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00],
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `name` carries one of the recognized archive suffixes.
pub fn is_archive(name: &str) -> bool {
    ArchiveFormat::detect_from_name(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_by_suffix() {
        let cases = [
            ("a.tar", Some(ArchiveFormat::Tar(Compression::None))),
            ("a.tar.gz", Some(ArchiveFormat::Tar(Compression::Gzip))),
            ("a.tgz", Some(ArchiveFormat::Tar(Compression::Gzip))),
            ("a.tar.xz", Some(ArchiveFormat::Tar(Compression::Xz))),
            ("a.zip", Some(ArchiveFormat::Zip)),
            ("a.rar", None),
        ];
        for (name, expected) in cases {
            assert_eq!(ArchiveFormat::detect_from_name(name), expected, "{name}");
        }
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        assert_eq!(ArchiveFormat::detect_from_name("A.TAR.GZ"), None);
        assert!(!is_archive("release.Zip"));
    }

    #[test]
    fn compressed_names_are_not_plain_tar() {
        assert_eq!(
            ArchiveFormat::detect_from_name("release-1.0.tar.xz"),
            Some(ArchiveFormat::Tar(Compression::Xz))
        );
        assert_eq!(ArchiveFormat::detect_from_name("notes.txt"), None);
    }

    #[test]
    fn extensions_round_trip_through_detection() {
        let formats = [
            ArchiveFormat::Tar(Compression::None),
            ArchiveFormat::Tar(Compression::Gzip),
            ArchiveFormat::Tar(Compression::Xz),
            ArchiveFormat::Zip,
        ];
        for format in formats {
            for ext in format.extensions() {
                let name = format!("pkg{ext}");
                assert_eq!(ArchiveFormat::detect_from_name(&name), Some(format));
            }
        }
    }
}
