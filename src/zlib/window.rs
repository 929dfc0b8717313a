//! Decoder state and the buffer of decompressed bytes behind a zlib stream.

use std::fmt;
use std::io::{Read, Seek};

use flate2::{Decompress, FlushDecompress, Status};
use log::{debug, trace, warn};

use crate::config::{HistoryLimit, StreamConfig};
use crate::Result;

use super::CompressedRegion;

/// Spare output capacity offered to the decoder per call.
const OUTPUT_CHUNK: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// No compressed bytes pulled yet.
    NotStarted,
    /// Decoding in progress; more output may follow.
    Streaming,
    /// The region is fully consumed and the decoder has nothing left to emit.
    Exhausted,
}

/// Decoder state plus the decompressed bytes produced so far.
///
/// `buffer[0]` sits at logical offset `buffer_start` of the decompressed
/// stream. With [`HistoryLimit::Bytes`] the front of the buffer is dropped as
/// the reader advances.
pub struct DecompressionWindow {
    decoder: Decompress,
    buffer: Vec<u8>,
    buffer_start: u64,
    consumed: u64,
    input: Vec<u8>,
    input_pos: usize,
    input_len: usize,
    input_finished: bool,
    state: WindowState,
    history: HistoryLimit,
}

impl fmt::Debug for DecompressionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecompressionWindow")
            .field("state", &self.state)
            .field("buffer_start", &self.buffer_start)
            .field("buffer_end", &self.buffer_end())
            .field("consumed", &self.consumed)
            .field("pending_input", &(self.input_len - self.input_pos))
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl DecompressionWindow {
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            decoder: Decompress::new(true),
            buffer: Vec::new(),
            buffer_start: 0,
            consumed: 0,
            input: vec![0u8; config.block_size],
            input_pos: 0,
            input_len: 0,
            input_finished: false,
            state: WindowState::NotStarted,
            history: config.history,
        }
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == WindowState::Exhausted
    }

    /// Compressed bytes pulled from the region so far.
    pub fn compressed_consumed(&self) -> u64 {
        self.consumed
    }

    pub fn buffer_start(&self) -> u64 {
        self.buffer_start
    }

    /// Logical offset one past the last decoded byte.
    pub fn buffer_end(&self) -> u64 {
        self.buffer_start + self.buffer.len() as u64
    }

    /// Drop all decoded data and start over with a fresh decoder.
    ///
    /// The caller rewinds the region to match.
    pub fn reset(&mut self) {
        self.decoder.reset(true);
        self.buffer.clear();
        self.buffer_start = 0;
        self.consumed = 0;
        self.input_pos = 0;
        self.input_len = 0;
        self.input_finished = false;
        self.state = WindowState::NotStarted;
    }

    /// Up to `len` decoded bytes starting at logical offset `position`.
    pub fn slice(&self, position: u64, len: usize) -> &[u8] {
        if position < self.buffer_start || position >= self.buffer_end() {
            return &[];
        }
        let start = (position - self.buffer_start) as usize;
        let end = start.saturating_add(len).min(self.buffer.len());
        &self.buffer[start..end]
    }

    /// Decode until `target` bytes of output exist or the payload ends.
    ///
    /// `target == None` decodes everything. History is trimmed relative to
    /// `keep_from` after every step, or relative to the decode frontier when
    /// `keep_from` is `None`.
    pub fn fill_to<R: Read + Seek>(
        &mut self,
        region: &mut CompressedRegion<R>,
        target: Option<u64>,
        keep_from: Option<u64>,
    ) -> Result<()> {
        while !self.is_exhausted() && target.map_or(true, |t| self.buffer_end() < t) {
            self.step(region)?;
            let keep = keep_from.unwrap_or_else(|| self.buffer_end());
            self.trim(keep);
        }
        Ok(())
    }

    /// Release history that a reader at `position` may no longer need.
    pub fn trim(&mut self, position: u64) {
        let Some(floor) = self.history.floor(position) else {
            return;
        };
        if floor <= self.buffer_start {
            return;
        }
        let drop = (floor - self.buffer_start).min(self.buffer.len() as u64) as usize;
        if drop == 0 {
            return;
        }
        self.buffer.drain(..drop);
        self.buffer_start += drop as u64;
        trace!("trimmed {drop} bytes of history, window now starts at {}", self.buffer_start);
    }

    fn step<R: Read + Seek>(&mut self, region: &mut CompressedRegion<R>) -> Result<()> {
        if self.input_pos == self.input_len && !self.input_finished {
            let n = region.read_block(self.consumed, &mut self.input)?;
            self.input_pos = 0;
            self.input_len = n;
            if n == 0 {
                self.input_finished = true;
            } else {
                self.consumed += n as u64;
                self.state = WindowState::Streaming;
                trace!("pulled {n} compressed bytes ({} total)", self.consumed);
            }
        }

        // Always FlushDecompress::None; under Finish a truncated payload is a
        // hard error on some backends and BufError on others.
        self.buffer.reserve(OUTPUT_CHUNK);
        let before_in = self.decoder.total_in();
        let before_out = self.decoder.total_out();
        let status = self.decoder.decompress_vec(
            &self.input[self.input_pos..self.input_len],
            &mut self.buffer,
            FlushDecompress::None,
        )?;
        let used = (self.decoder.total_in() - before_in) as usize;
        let produced = self.decoder.total_out() - before_out;
        self.input_pos += used;

        if status == Status::StreamEnd {
            return self.finish_stream(region);
        }
        // With input left and spare output, the decoder always makes progress
        // or fails, so a stall only happens once the region is used up.
        if used == 0 && produced == 0 && self.input_finished {
            warn!(
                "compressed region ended after {} bytes before the zlib stream trailer",
                self.consumed
            );
            self.state = WindowState::Exhausted;
        }
        Ok(())
    }

    /// Skip whatever the region holds after the zlib trailer so the source
    /// ends up exactly at the region boundary.
    fn finish_stream<R: Read + Seek>(&mut self, region: &mut CompressedRegion<R>) -> Result<()> {
        let mut trailing = (self.input_len - self.input_pos) as u64;
        loop {
            let n = region.read_block(self.consumed, &mut self.input)?;
            if n == 0 {
                break;
            }
            self.consumed += n as u64;
            trailing += n as u64;
        }
        if trailing > 0 {
            debug!("ignored {trailing} bytes after zlib stream end");
        }
        self.input_pos = 0;
        self.input_len = 0;
        self.input_finished = true;
        self.state = WindowState::Exhausted;
        Ok(())
    }
}
