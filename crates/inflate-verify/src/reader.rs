use std::io::{self, Read};

use crate::checksum::ChecksumSpec;
use crate::hasher::Hasher;
use crate::registry::HasherRegistry;
use crate::{Result, VerificationError};

/// Pass-through reader that feeds every byte it yields into a digest.
///
/// One instance covers exactly one stream. [`HashingReader::validate_checksum`]
/// consumes it, so the accumulator cannot be reused afterwards.
pub struct HashingReader<R> {
    reader: R,
    hasher: Box<dyn Hasher>,
    spec: ChecksumSpec,
}

impl<R: Read> HashingReader<R> {
    /// Wrap `reader`, expecting it to hash to `checksum` (`"sha256:<hex>"`).
    pub fn new(reader: R, checksum: &str) -> Result<Self> {
        Self::with_registry(reader, checksum, &HasherRegistry::default())
    }

    /// Like [`HashingReader::new`], resolving the algorithm in `registry`.
    pub fn with_registry(reader: R, checksum: &str, registry: &HasherRegistry) -> Result<Self> {
        let spec = ChecksumSpec::parse(checksum)?;
        let hasher = registry.create(spec.algorithm())?;
        Ok(Self {
            reader,
            hasher,
            spec,
        })
    }

    pub fn spec(&self) -> &ChecksumSpec {
        &self.spec
    }

    /// Drain whatever the consumer left unread, then compare digests.
    ///
    /// The digest therefore always covers the entire stream, however much of
    /// it the consumer actually read.
    pub fn validate_checksum(mut self) -> Result<()> {
        io::copy(&mut self, &mut io::sink())?;

        let actual = hex::encode(self.hasher.finalize());
        let expected = self.spec.digest();
        if actual != expected {
            return Err(VerificationError::Mismatch {
                expected: expected.to_string(),
                actual,
            });
        }
        Ok(())
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
        }
        Ok(n)
    }
}

#[cfg(all(test, feature = "sha256"))]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HELLO_WORLD: &str =
        "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn test_full_read_validates() {
        let mut reader = HashingReader::new(Cursor::new(b"hello world"), HELLO_WORLD).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"hello world");
        reader.validate_checksum().unwrap();
    }

    #[test]
    fn test_partial_read_is_drained() {
        let mut reader = HashingReader::new(Cursor::new(b"hello world"), HELLO_WORLD).unwrap();
        let mut buf = [0u8; 3];
        reader.read_exact(&mut buf).unwrap();
        reader.validate_checksum().unwrap();
    }

    #[test]
    fn test_flipped_digest_mismatches() {
        let flipped = HELLO_WORLD.replacen("b94d", "c94d", 1);
        let reader = HashingReader::new(Cursor::new(b"hello world"), &flipped).unwrap();
        match reader.validate_checksum() {
            Err(VerificationError::Mismatch { expected, actual }) => {
                assert!(expected.starts_with("c94d"));
                assert!(actual.starts_with("b94d"));
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_separator_fails_at_construction() {
        let truncated = HELLO_WORLD.replacen(':', "", 1);
        assert!(matches!(
            HashingReader::new(Cursor::new(b"hello world"), &truncated),
            Err(VerificationError::MalformedSpec { .. })
        ));
    }

    #[test]
    fn test_unknown_algorithm_fails_at_construction() {
        assert!(matches!(
            HashingReader::new(Cursor::new(b""), "md5:d41d8cd98f00b204e9800998ecf8427e"),
            Err(VerificationError::UnsupportedAlgorithm { .. })
        ));
    }

    #[test]
    fn test_read_errors_pass_through() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("connection reset"))
            }
        }

        let reader = HashingReader::new(Broken, HELLO_WORLD).unwrap();
        assert!(matches!(
            reader.validate_checksum(),
            Err(VerificationError::Io(_))
        ));
    }
}
