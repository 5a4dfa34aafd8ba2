use std::io::{self, Chain, Cursor, Read};

use crate::error::{Error, Result};
use crate::format::Compression;

/// The raw stream with its already-checked magic bytes put back in front.
pub type Peeked<R> = Chain<Cursor<Vec<u8>>, R>;

/// Decompression stage in front of a tar reader.
pub enum Decoder<R: Read> {
    Passthrough(Peeked<R>),
    Gzip(Box<flate2::read::GzDecoder<Peeked<R>>>),
    #[cfg(feature = "xz")]
    Xz(Box<xz2::read::XzDecoder<Peeked<R>>>),
}

impl Compression {
    /// Wrap `reader` in the decoder for this codec.
    ///
    /// The codec's magic bytes are read and checked up front, so a stream that
    /// is not gzip/xz at all fails here instead of somewhere inside the first
    /// tar header.
    pub fn decoder<R: Read>(self, mut reader: R) -> Result<Decoder<R>> {
        if cfg!(not(feature = "xz")) && self == Compression::Xz {
            return Err(Error::FormatDisabled { format: "tar.xz" });
        }

        let magic = self.magic();
        let mut head = vec![0u8; magic.len()];
        reader
            .read_exact(&mut head)
            .map_err(|source| Error::MalformedHeader {
                compression: self,
                source,
            })?;
        if head != magic {
            return Err(Error::MalformedHeader {
                compression: self,
                source: io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unexpected leading bytes {head:02x?}"),
                ),
            });
        }

        let reader = Cursor::new(head).chain(reader);
        Ok(match self {
            Self::None => Decoder::Passthrough(reader),
            Self::Gzip => Decoder::Gzip(Box::new(flate2::read::GzDecoder::new(reader))),
            #[cfg(feature = "xz")]
            Self::Xz => Decoder::Xz(Box::new(xz2::read::XzDecoder::new_multi_decoder(reader))),
            #[cfg(not(feature = "xz"))]
            Self::Xz => unreachable!("rejected above"),
        })
    }
}

impl<R: Read> Decoder<R> {
    /// Give back the compressed stream, positioned wherever the decoder
    /// stopped pulling from it.
    pub fn into_inner(self) -> Peeked<R> {
        match self {
            Self::Passthrough(r) => r,
            Self::Gzip(d) => (*d).into_inner(),
            #[cfg(feature = "xz")]
            Self::Xz(d) => (*d).into_inner(),
        }
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Passthrough(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
            #[cfg(feature = "xz")]
            Self::Xz(d) => d.read(buf),
        }
    }
}

/// Read `reader` to EOF, discarding the bytes.
///
/// Decoders may stop pulling from the underlying stream before its real end
/// (trailing padding, a second gzip member); anything hashing that stream
/// needs to see those bytes too.
pub fn drain<R: Read + ?Sized>(reader: &mut R) -> io::Result<u64> {
    io::copy(reader, &mut io::sink())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn passthrough_reads_everything() {
        let mut decoder = Compression::None.decoder(&b"plain bytes"[..]).unwrap();
        let mut out = String::new();
        decoder.read_to_string(&mut out).unwrap();
        assert_eq!(out, "plain bytes");
    }

    #[test]
    fn gzip_rejects_bad_magic() {
        let result = Compression::Gzip.decoder(&b"definitely not gzip"[..]);
        assert!(matches!(
            result,
            Err(Error::MalformedHeader {
                compression: Compression::Gzip,
                ..
            })
        ));
    }

    #[test]
    fn gzip_rejects_truncated_header() {
        let result = Compression::Gzip.decoder(&[0x1F][..]);
        assert!(matches!(result, Err(Error::MalformedHeader { .. })));
    }

    #[cfg(feature = "xz")]
    #[test]
    fn xz_rejects_gzip_stream() {
        let result = Compression::Xz.decoder(&[0x1F, 0x8B, 0, 0, 0, 0, 0][..]);
        assert!(matches!(
            result,
            Err(Error::MalformedHeader {
                compression: Compression::Xz,
                ..
            })
        ));
    }

    #[test]
    fn gzip_leaves_trailing_bytes_for_drain() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        encoder.write_all(b"payload").unwrap();
        let mut bytes = encoder.finish().unwrap();
        bytes.extend_from_slice(&[0u8; 64]);

        let mut cursor = Cursor::new(bytes.clone());
        let mut decoder = Compression::Gzip.decoder(&mut cursor).unwrap();
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"payload");

        let mut raw = decoder.into_inner();
        drain(&mut raw).unwrap();
        assert_eq!(cursor.position(), bytes.len() as u64);
    }
}
