//! Stream configuration.
//!
//! Controls how many compressed bytes are pulled per decode step and how much
//! decompressed history a zlib stream keeps for backward seeks.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Compressed bytes pulled from the source per decode step.
pub const DEFAULT_BLOCK_SIZE: usize = 128 * 1024;

/// Configuration for a [`SeekableZlibStream`](crate::SeekableZlibStream).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StreamConfig {
    /// Maximum compressed bytes read from the source in one step.
    /// Default: 128 KiB
    pub block_size: usize,

    /// Decompressed look-back kept in memory.
    /// Default: unbounded
    #[cfg_attr(feature = "serde", serde(default))]
    pub history: HistoryLimit,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            history: HistoryLimit::Unbounded,
        }
    }
}

impl StreamConfig {
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_history(mut self, history: HistoryLimit) -> Self {
        self.history = history;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::InvalidConfig("block_size must be > 0"));
        }
        Ok(())
    }
}

/// How much already-read decompressed data survives behind the read position.
///
/// Seeking before the retained window restarts decompression from the start
/// of the compressed region, so a small limit trades memory for replay cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum HistoryLimit {
    /// Keep everything decoded so far.
    #[default]
    Unbounded,
    /// Keep at most this many bytes behind the read position.
    Bytes { max: usize },
}

impl HistoryLimit {
    /// Lowest logical offset that must stay buffered for a reader at `position`.
    pub(crate) fn floor(&self, position: u64) -> Option<u64> {
        match *self {
            HistoryLimit::Unbounded => None,
            HistoryLimit::Bytes { max } => Some(position.saturating_sub(max as u64)),
        }
    }
}
