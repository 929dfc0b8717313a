//! Plain stream wrappers that forward to a native `Read + Seek` object.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

use crate::stream::{ByteStream, StreamKind};

/// Any boxed readable and seekable source.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

macro_rules! forward_read_seek {
    ($ty:ty, $field:ident) => {
        impl Read for $ty {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.$field.read(buf)
            }
        }

        impl Seek for $ty {
            fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
                self.$field.seek(pos)
            }
        }
    };
}

/// Stream over an open file.
#[derive(Debug)]
pub struct FileStream {
    file: File,
}

impl FileStream {
    pub fn new(file: File) -> Self {
        Self { file }
    }

    pub fn into_inner(self) -> File {
        self.file
    }
}

forward_read_seek!(FileStream, file);

impl ByteStream for FileStream {
    fn kind(&self) -> StreamKind {
        StreamKind::File
    }
}

/// Stream over an owned in-memory buffer.
#[derive(Debug, Clone)]
pub struct MemoryStream {
    cursor: Cursor<Vec<u8>>,
}

impl MemoryStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    pub fn get_ref(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

forward_read_seek!(MemoryStream, cursor);

impl ByteStream for MemoryStream {
    fn kind(&self) -> StreamKind {
        StreamKind::Memory
    }

    // The whole buffer is resident, so skip the zero-filled scratch vector.
    fn read_up_to(&mut self, n: usize) -> crate::Result<Vec<u8>> {
        let data = self.cursor.get_ref();
        let start = (self.cursor.position() as usize).min(data.len());
        let end = start.saturating_add(n).min(data.len());
        let out = data[start..end].to_vec();
        if end > start {
            self.cursor.set_position(end as u64);
        }
        Ok(out)
    }
}

/// Stream over any other `Read + Seek` value.
pub struct GenericStream<R> {
    inner: R,
}

impl<R: Read + Seek> GenericStream<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> Read for GenericStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Seek> Seek for GenericStream<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl<R: Read + Seek> ByteStream for GenericStream<R> {
    fn kind(&self) -> StreamKind {
        StreamKind::Generic
    }
}

/// Source handed to [`make_stream`].
pub enum StreamSource {
    File(File),
    Memory(Vec<u8>),
    Generic(Box<dyn ReadSeek>),
}

impl StreamSource {
    pub fn generic<R: Read + Seek + 'static>(inner: R) -> Self {
        StreamSource::Generic(Box::new(inner))
    }
}

impl From<File> for StreamSource {
    fn from(value: File) -> Self {
        StreamSource::File(value)
    }
}

impl From<Vec<u8>> for StreamSource {
    fn from(value: Vec<u8>) -> Self {
        StreamSource::Memory(value)
    }
}

impl From<&[u8]> for StreamSource {
    fn from(value: &[u8]) -> Self {
        StreamSource::Memory(value.to_vec())
    }
}

/// Wrap `source` in the stream type that fits it.
///
/// A memory source starts at offset 0. File and generic sources keep
/// their current position.
pub fn make_stream(source: impl Into<StreamSource>) -> Box<dyn ByteStream> {
    match source.into() {
        StreamSource::File(file) => Box::new(FileStream::new(file)),
        StreamSource::Memory(data) => Box::new(MemoryStream::new(data)),
        StreamSource::Generic(inner) => Box::new(GenericStream::new(inner)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_read_up_to_clamps_at_end() {
        let mut stream = MemoryStream::new(b"abcdef".to_vec());
        assert_eq!(stream.read_up_to(4).unwrap(), b"abcd");
        assert_eq!(stream.read_up_to(4).unwrap(), b"ef");
        assert!(stream.read_up_to(4).unwrap().is_empty());
        assert_eq!(stream.tell().unwrap(), 6);
    }

    #[test]
    fn memory_read_after_seek_past_end() {
        let mut stream = MemoryStream::new(b"abc".to_vec());
        stream.seek_whence(10, 0).unwrap();
        assert!(stream.read_up_to(2).unwrap().is_empty());
        assert_eq!(stream.tell().unwrap(), 10);
    }

    #[test]
    fn generic_wraps_cursor() {
        let mut stream = GenericStream::new(Cursor::new(b"xyz".to_vec()));
        assert_eq!(stream.kind(), StreamKind::Generic);
        assert_eq!(stream.read_remaining().unwrap(), b"xyz");
    }
}
