use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },
    #[error("invalid seek: {0}")]
    InvalidSeek(String),
    #[error("invalid whence: {0} (expected 0, 1 or 2)")]
    InvalidWhence(i32),
    #[error("read of {requested} bytes does not fit buffer of {capacity} bytes")]
    BufferTooSmall { requested: usize, capacity: usize },
    #[error("decompression failed: {0}")]
    Decompression(#[source] flate2::DecompressError),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("io error: {0}")]
    Io(#[source] io::Error),
}

impl Error {
    /// True for errors that surface as I/O failures rather than bad arguments
    /// or corrupt payloads.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Error::ShortRead { .. }
                | Error::InvalidSeek(_)
                | Error::BufferTooSmall { .. }
                | Error::Io(_)
        )
    }

    fn io_kind(&self) -> io::ErrorKind {
        match self {
            Error::ShortRead { .. } => io::ErrorKind::UnexpectedEof,
            Error::InvalidSeek(_) | Error::InvalidWhence(_) | Error::InvalidConfig(_) => {
                io::ErrorKind::InvalidInput
            }
            Error::BufferTooSmall { .. } => io::ErrorKind::InvalidInput,
            Error::Decompression(_) => io::ErrorKind::InvalidData,
            Error::Io(err) => err.kind(),
        }
    }
}

impl From<flate2::DecompressError> for Error {
    fn from(value: flate2::DecompressError) -> Self {
        Error::Decompression(value)
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        // Errors raised by this crate inside a Read/Seek impl come back unchanged.
        let wrapped = value.get_ref().map_or(false, |inner| inner.is::<Error>());
        if !wrapped {
            return Error::Io(value);
        }
        let kind = value.kind();
        match value.into_inner().map(|inner| inner.downcast::<Error>()) {
            Some(Ok(err)) => *err,
            Some(Err(other)) => Error::Io(io::Error::new(kind, other)),
            None => Error::Io(io::Error::from(kind)),
        }
    }
}

impl From<Error> for io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Io(err) => err,
            other => io::Error::new(other.io_kind(), other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
