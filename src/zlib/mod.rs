//! Random access over a zlib payload embedded in a larger source.
//!
//! # Key Components
//!
//! - `region`: the bounded byte range holding the compressed payload
//! - `window`: decoder state plus the buffer of decompressed bytes
//! - `stream`: [`SeekableZlibStream`], the `read`/`seek`/`tell` front end
//!
//! # Usage
//!
//! ```rust,ignore
//! use matstream::{ByteStream, SeekableZlibStream};
//!
//! // `file` is positioned at the first compressed byte.
//! let mut stream = SeekableZlibStream::new(file, compressed_len)?;
//! stream.seek_whence(128, 0)?;
//! let header = stream.read_up_to(16)?;
//! ```

mod region;
mod stream;
mod window;

pub use region::CompressedRegion;
pub use stream::SeekableZlibStream;
pub use window::{DecompressionWindow, WindowState};
