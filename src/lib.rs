//! Seekable byte streams for binary-format readers.
//!
//! Files, in-memory buffers and zlib payloads embedded in a larger file all
//! expose the same [`ByteStream`] interface. [`SeekableZlibStream`] adds
//! random access on top of a forward-only zlib decoder.

pub mod config;
pub mod error;
pub mod stream;
pub mod wrappers;
pub mod zlib;

pub use config::{HistoryLimit, StreamConfig, DEFAULT_BLOCK_SIZE};
pub use error::{Error, Result};
pub use stream::{read_exact_bytes, read_into, ByteStream, StreamKind, Whence};
pub use wrappers::{make_stream, FileStream, GenericStream, MemoryStream, ReadSeek, StreamSource};
pub use zlib::{CompressedRegion, DecompressionWindow, SeekableZlibStream, WindowState};
