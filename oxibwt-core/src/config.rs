//! Codec configuration.

use crate::error::{OxiBwtError, Result};

/// Default maximum block size (256 KiB).
pub const DEFAULT_MAX_BLOCK: usize = 262_144;

/// Largest block the 3-byte BWT index header can describe.
pub const MAX_BLOCK_LIMIT: usize = (1 << 24) - 1;

/// Width of the BWT primary index header in bytes.
pub const BWT_HEADER_LEN: usize = 3;

/// Width of the MTF original-length header in bytes.
pub const MTF_HEADER_LEN: usize = 4;

/// Default number of scratch buffers a pool keeps for reuse.
pub const DEFAULT_POOL_RETAIN: usize = 8;

/// How the rotation ordering of a block is computed.
///
/// Both strategies produce the identical ordering, including the
/// ascending-index tie-break for equal rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationStrategy {
    /// Prefix doubling over cyclic ranks, O(n log n).
    #[default]
    Doubling,
    /// Stable comparison sort over the doubled block, O(n² log n) worst case.
    Comparison,
}

/// Codec configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum block length accepted by the BWT stage.
    pub max_block: usize,
    /// Rotation ordering strategy.
    pub rotation: RotationStrategy,
    /// Number of scratch buffers retained by the codec's pool.
    pub pool_retain: usize,
}

impl CodecConfig {
    /// Create a configuration with the given maximum block size.
    pub fn new(max_block: usize) -> Self {
        Self {
            max_block,
            ..Self::default()
        }
    }

    /// Set the maximum block size.
    pub fn with_max_block(mut self, max_block: usize) -> Self {
        self.max_block = max_block;
        self
    }

    /// Set the rotation ordering strategy.
    pub fn with_rotation(mut self, rotation: RotationStrategy) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the number of retained scratch buffers.
    pub fn with_pool_retain(mut self, pool_retain: usize) -> Self {
        self.pool_retain = pool_retain;
        self
    }

    /// Largest stream the MTF stage accepts: a full block plus the BWT header.
    pub fn max_mtf_len(&self) -> usize {
        self.max_block + BWT_HEADER_LEN
    }

    /// Largest stream the RLE stage may reproduce: MTF input plus its header.
    pub fn max_rle_len(&self) -> usize {
        self.max_mtf_len() + MTF_HEADER_LEN
    }

    /// Check that the configuration can be honoured by the wire format.
    pub fn validate(&self) -> Result<()> {
        if self.max_block == 0 {
            return Err(OxiBwtError::invalid_config("max_block must be non-zero"));
        }
        if self.max_block > MAX_BLOCK_LIMIT {
            return Err(OxiBwtError::invalid_config(format!(
                "max_block {} exceeds 3-byte index limit {}",
                self.max_block, MAX_BLOCK_LIMIT
            )));
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_block: DEFAULT_MAX_BLOCK,
            rotation: RotationStrategy::Doubling,
            pool_retain: DEFAULT_POOL_RETAIN,
        }
    }
}
