use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom, Stdin};
use std::path::Path;

use inflate_verify::HashingReader;
use tempfile::NamedTempFile;
use tracing::debug;

/// Anything that can be both read and repositioned.
pub trait SeekRead: Read + Seek {}

impl<T: Read + Seek + ?Sized> SeekRead for T {}

/// Archive input.
///
/// Every source is a plain byte stream. Zip additionally needs random access,
/// which it gets through [`Source::seekable_view`]: seekable sources hand out
/// themselves, everything else is spooled into a temporary file first.
pub trait Source: Read {
    /// Acquire a seekable view of the remaining bytes of this source.
    ///
    /// The default spools into a temporary file inside `spool_dir`; the file
    /// is removed when the returned view is dropped.
    fn seekable_view(&mut self, spool_dir: &Path) -> io::Result<SeekableView<'_>> {
        spool(self, spool_dir)
    }
}

/// Random-access view handed to the zip reader.
pub enum SeekableView<'a> {
    Direct(&'a mut dyn SeekRead),
    Spooled(NamedTempFile),
}

impl SeekableView<'_> {
    pub fn is_spooled(&self) -> bool {
        matches!(self, Self::Spooled(_))
    }
}

impl Read for SeekableView<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Direct(inner) => inner.read(buf),
            Self::Spooled(file) => file.read(buf),
        }
    }
}

impl Seek for SeekableView<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::Direct(inner) => inner.seek(pos),
            Self::Spooled(file) => file.seek(pos),
        }
    }
}

fn spool<'a, R: Read + ?Sized>(reader: &mut R, dir: &Path) -> io::Result<SeekableView<'a>> {
    let mut file = tempfile::Builder::new()
        .prefix(".inflate-")
        .suffix(".spool")
        .tempfile_in(dir)?;
    let bytes = io::copy(reader, file.as_file_mut())?;
    file.as_file_mut().rewind()?;
    debug!(path = %file.path().display(), bytes, "spooled archive to disk");
    Ok(SeekableView::Spooled(file))
}

/// Treat any reader as a sequential source, even one that could seek.
#[derive(Debug)]
pub struct Sequential<R>(pub R);

impl<R> Sequential<R> {
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: Read> Read for Sequential<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: Read> Source for Sequential<R> {}

impl Source for File {
    fn seekable_view(&mut self, _spool_dir: &Path) -> io::Result<SeekableView<'_>> {
        Ok(SeekableView::Direct(self))
    }
}

impl Source for &File {
    fn seekable_view(&mut self, _spool_dir: &Path) -> io::Result<SeekableView<'_>> {
        Ok(SeekableView::Direct(self))
    }
}

impl<T: AsRef<[u8]>> Source for Cursor<T> {
    fn seekable_view(&mut self, _spool_dir: &Path) -> io::Result<SeekableView<'_>> {
        Ok(SeekableView::Direct(self))
    }
}

impl Source for &[u8] {}

impl Source for Stdin {}

impl<R: Read> Source for BufReader<R> {}

impl<R: Read> Source for HashingReader<R> {}

impl<S: Source + ?Sized> Source for &mut S {
    fn seekable_view(&mut self, spool_dir: &Path) -> io::Result<SeekableView<'_>> {
        (**self).seekable_view(spool_dir)
    }
}
