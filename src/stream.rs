//! Common interface shared by every stream kind.

use std::io::{self, Read, Seek, SeekFrom};

use crate::{Error, Result};

const INITIAL_READ_CAPACITY: usize = 64 * 1024;

/// Reference point for a seek, numbered the way C `fseek` numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start = 0,
    Current = 1,
    End = 2,
}

impl TryFrom<i32> for Whence {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Whence::Start),
            1 => Ok(Whence::Current),
            2 => Ok(Whence::End),
            other => Err(Error::InvalidWhence(other)),
        }
    }
}

impl Whence {
    pub fn seek_from(self, offset: i64) -> Result<SeekFrom> {
        match self {
            Whence::Start => u64::try_from(offset)
                .map(SeekFrom::Start)
                .map_err(|_| Error::InvalidSeek(format!("negative position {offset}"))),
            Whence::Current => Ok(SeekFrom::Current(offset)),
            Whence::End => Ok(SeekFrom::End(offset)),
        }
    }
}

/// Which wrapper backs a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    File,
    Memory,
    Generic,
    Zlib,
}

/// A readable, seekable byte stream.
///
/// All methods report failures as [`Error`]; a short or empty result from
/// [`read_up_to`](ByteStream::read_up_to) means end of stream.
pub trait ByteStream: Read + Seek {
    fn kind(&self) -> StreamKind;

    /// Read up to `n` bytes, stopping early only at end of stream.
    fn read_up_to(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(n.min(INITIAL_READ_CAPACITY));
        Read::take(&mut *self, n as u64).read_to_end(&mut out)?;
        Ok(out)
    }

    /// Read everything from the current position to the end.
    fn read_remaining(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.read_to_end(&mut out)?;
        Ok(out)
    }

    /// Seek with an integer `whence` (0 = start, 1 = current, 2 = end).
    fn seek_whence(&mut self, offset: i64, whence: i32) -> Result<u64> {
        let pos = Whence::try_from(whence)?.seek_from(offset)?;
        self.seek_to(pos)
    }

    fn seek_to(&mut self, pos: SeekFrom) -> Result<u64> {
        self.seek(pos).map_err(|err| match Error::from(err) {
            Error::Io(err) if err.kind() == io::ErrorKind::InvalidInput => {
                Error::InvalidSeek(err.to_string())
            }
            other => other,
        })
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(self.stream_position()?)
    }
}

/// Read exactly `n` bytes into a new buffer.
///
/// Fails with [`Error::ShortRead`] when the stream ends first; the bytes that
/// were available are consumed.
pub fn read_exact_bytes<S: ByteStream + ?Sized>(stream: &mut S, n: usize) -> Result<Vec<u8>> {
    let data = stream.read_up_to(n)?;
    if data.len() < n {
        return Err(Error::ShortRead {
            expected: n,
            actual: data.len(),
        });
    }
    Ok(data)
}

/// Read exactly `n` bytes into the front of `buf`.
pub fn read_into<S: ByteStream + ?Sized>(stream: &mut S, buf: &mut [u8], n: usize) -> Result<()> {
    if n > buf.len() {
        return Err(Error::BufferTooSmall {
            requested: n,
            capacity: buf.len(),
        });
    }
    let mut filled = 0;
    while filled < n {
        match stream.read(&mut buf[filled..n]) {
            Ok(0) => {
                return Err(Error::ShortRead {
                    expected: n,
                    actual: filled,
                })
            }
            Ok(len) => filled += len,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whence_from_int() {
        assert_eq!(Whence::try_from(0).unwrap(), Whence::Start);
        assert_eq!(Whence::try_from(1).unwrap(), Whence::Current);
        assert_eq!(Whence::try_from(2).unwrap(), Whence::End);
        assert!(matches!(Whence::try_from(123), Err(Error::InvalidWhence(123))));
        assert!(matches!(Whence::try_from(-1), Err(Error::InvalidWhence(-1))));
    }

    #[test]
    fn negative_absolute_seek_rejected() {
        assert!(matches!(
            Whence::Start.seek_from(-1),
            Err(Error::InvalidSeek(_))
        ));
        assert_eq!(Whence::Start.seek_from(5).unwrap(), SeekFrom::Start(5));
        assert_eq!(Whence::End.seek_from(-2).unwrap(), SeekFrom::End(-2));
    }
}
