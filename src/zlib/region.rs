use std::io::{self, Read, Seek, SeekFrom};

use crate::Result;

/// The byte range of a source that holds one compressed payload.
///
/// Reads never go past `start_offset + compressed_len`, whatever follows in
/// the source.
#[derive(Debug)]
pub struct CompressedRegion<R> {
    source: R,
    start_offset: u64,
    compressed_len: u64,
}

impl<R: Read + Seek> CompressedRegion<R> {
    /// Bind to the region starting at the source's current position.
    pub fn new(mut source: R, compressed_len: u64) -> Result<Self> {
        let start_offset = source.stream_position()?;
        Ok(Self {
            source,
            start_offset,
            compressed_len,
        })
    }

    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    pub fn compressed_len(&self) -> u64 {
        self.compressed_len
    }

    /// Fill `block` with the bytes that follow the first `consumed` bytes of
    /// the region. Returns 0 once the region (or the source) is exhausted.
    pub(crate) fn read_block(&mut self, consumed: u64, block: &mut [u8]) -> Result<usize> {
        let remaining = self.compressed_len.saturating_sub(consumed);
        let want = (block.len() as u64).min(remaining) as usize;
        let mut filled = 0;
        while filled < want {
            match self.source.read(&mut block[filled..want]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(filled)
    }

    /// Put the source cursor back on the first compressed byte.
    pub(crate) fn rewind(&mut self) -> Result<()> {
        self.source.seek(SeekFrom::Start(self.start_offset))?;
        Ok(())
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}
