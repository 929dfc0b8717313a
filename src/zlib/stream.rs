use std::io::{self, Read, Seek, SeekFrom};

use log::debug;

use crate::config::StreamConfig;
use crate::stream::{ByteStream, StreamKind};
use crate::{Error, Result};

use super::{CompressedRegion, DecompressionWindow, WindowState};

/// Seekable reader over a zlib payload of known compressed length.
///
/// The source must be positioned on the first compressed byte when the stream
/// is built. From then on the stream is the only thing that moves the source
/// cursor, and it never reads past the end of the compressed region.
///
/// Backward seeks inside the retained history are served from memory; seeks
/// before it rewind the source and decode again from the start.
#[derive(Debug)]
pub struct SeekableZlibStream<R> {
    region: CompressedRegion<R>,
    window: DecompressionWindow,
    position: u64,
}

impl<R: Read + Seek> SeekableZlibStream<R> {
    pub fn new(source: R, compressed_len: u64) -> Result<Self> {
        Self::with_config(source, compressed_len, StreamConfig::default())
    }

    pub fn with_config(source: R, compressed_len: u64, config: StreamConfig) -> Result<Self> {
        config.validate()?;
        let region = CompressedRegion::new(source, compressed_len)?;
        debug!(
            "zlib stream over {} compressed bytes at offset {}",
            compressed_len,
            region.start_offset()
        );
        Ok(Self {
            region,
            window: DecompressionWindow::new(&config),
            position: 0,
        })
    }

    /// Current offset in the decompressed data.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// True once every compressed byte is decoded and the read position sits
    /// at the end of the decompressed data.
    pub fn all_data_read(&self) -> bool {
        self.window.is_exhausted() && self.position == self.window.buffer_end()
    }

    pub fn state(&self) -> WindowState {
        self.window.state()
    }

    pub fn compressed_consumed(&self) -> u64 {
        self.window.compressed_consumed()
    }

    pub fn region(&self) -> &CompressedRegion<R> {
        &self.region
    }

    pub fn into_inner(self) -> R {
        self.region.into_inner()
    }

    /// Copy decoded bytes at the current position into `buf`.
    pub fn read_decoded(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.ensure_retained(self.position)?;
        // One byte past the request so that a read ending on the last byte
        // also pulls the zlib trailer.
        let want_end = self.position.saturating_add(buf.len() as u64);
        self.window.fill_to(
            &mut self.region,
            Some(want_end.saturating_add(1)),
            Some(self.position),
        )?;

        let available = self.window.slice(self.position, buf.len());
        let n = available.len();
        buf[..n].copy_from_slice(available);
        self.position += n as u64;
        self.window.trim(self.position);
        Ok(n)
    }

    /// Move the read position, decoding as far as needed.
    ///
    /// Targets past the end of the data clamp to the end.
    pub fn reposition(&mut self, pos: SeekFrom) -> Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(offset) => i128::from(self.position) + i128::from(offset),
            SeekFrom::End(offset) => {
                self.window.fill_to(&mut self.region, None, None)?;
                i128::from(self.window.buffer_end()) + i128::from(offset)
            }
        };
        if target < 0 {
            return Err(Error::InvalidSeek(format!("negative position {target}")));
        }
        let target = u64::try_from(target).unwrap_or(u64::MAX);

        self.ensure_retained(target)?;
        // One byte past the target so that landing exactly on the end also
        // observes the end of the payload.
        self.window
            .fill_to(&mut self.region, Some(target.saturating_add(1)), Some(target))?;
        self.position = target.min(self.window.buffer_end());
        Ok(self.position)
    }

    fn ensure_retained(&mut self, target: u64) -> Result<()> {
        if target >= self.window.buffer_start() {
            return Ok(());
        }
        debug!(
            "offset {} precedes retained history at {}, decoding again from region start",
            target,
            self.window.buffer_start()
        );
        self.region.rewind()?;
        self.window.reset();
        Ok(())
    }
}

impl<R: Read + Seek> Read for SeekableZlibStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_decoded(buf)?)
    }
}

impl<R: Read + Seek> Seek for SeekableZlibStream<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(self.reposition(pos)?)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position)
    }
}

impl<R: Read + Seek> ByteStream for SeekableZlibStream<R> {
    fn kind(&self) -> StreamKind {
        StreamKind::Zlib
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(self.position)
    }
}
