//! The BWT → MTF → RLE pipeline.
//!
//! Compression runs the stages in order, each one prefixing its own header
//! to the stream it hands on. Decompression runs them in reverse; the first
//! stage to reject its input aborts the whole call.

use log::{debug, trace, warn};
use oxibwt_core::config::{BWT_HEADER_LEN, CodecConfig};
use oxibwt_core::error::Result;
use oxibwt_core::header::read_u24_be;
use oxibwt_core::pool::BufferPool;
use oxibwt_core::traits::BlockStage;

use crate::bwt::BwtStage;
use crate::mtf::MtfStage;
use crate::rle::RleStage;

/// Sizes observed while compressing one block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockStats {
    /// Length of the raw block.
    pub input_len: usize,
    /// Output length after each stage, in pipeline order.
    pub stage_lens: Vec<(&'static str, usize)>,
    /// BWT primary index, if the block was non-empty.
    pub primary_index: Option<usize>,
}

impl BlockStats {
    /// Length of the final compressed block.
    pub fn output_len(&self) -> usize {
        self.stage_lens.last().map_or(0, |&(_, len)| len)
    }

    /// Compressed size over raw size; 1.0 for an empty block.
    pub fn ratio(&self) -> f64 {
        if self.input_len == 0 {
            1.0
        } else {
            self.output_len() as f64 / self.input_len as f64
        }
    }
}

/// A configured block codec.
///
/// A `Codec` is immutable and `Sync`: blocks may be compressed concurrently
/// from any number of threads. Scratch arrays come from the codec's shared
/// [`BufferPool`].
pub struct Codec {
    config: CodecConfig,
    pool: BufferPool,
    stages: Vec<Box<dyn BlockStage>>,
}

impl Codec {
    /// Create a codec after validating `config`.
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CodecConfig) -> Self {
        let stages: Vec<Box<dyn BlockStage>> = vec![
            Box::new(BwtStage::new(config)),
            Box::new(MtfStage::new(config.max_mtf_len())),
            Box::new(RleStage::new(config.max_rle_len())),
        ];
        Self {
            config,
            pool: BufferPool::new(config.pool_retain),
            stages,
        }
    }

    /// The codec configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The scratch buffer pool.
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// Stage names in compression order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Compress one block.
    pub fn compress(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.compress_with_stats(block).map(|(out, _)| out)
    }

    /// Compress one block and report per-stage sizes.
    pub fn compress_with_stats(&self, block: &[u8]) -> Result<(Vec<u8>, BlockStats)> {
        let mut stats = BlockStats {
            input_len: block.len(),
            ..BlockStats::default()
        };
        if block.is_empty() {
            return Ok((Vec::new(), stats));
        }

        debug!("compressing {} byte block", block.len());
        let mut data = block.to_vec();
        for stage in &self.stages {
            let out = stage
                .encode(&data, &self.pool)
                .inspect_err(|e| warn!("{} encode failed: {}", stage.name(), e))?;
            trace!("{}: {} -> {} bytes", stage.name(), data.len(), out.len());

            if stage.name() == BwtStage::NAME && out.len() >= BWT_HEADER_LEN {
                stats.primary_index = Some(read_u24_be(&out)?.0 as usize);
            }
            stats.stage_lens.push((stage.name(), out.len()));
            data = out;
        }

        debug!(
            "compressed {} -> {} bytes ({:.3})",
            block.len(),
            data.len(),
            stats.ratio()
        );
        Ok((data, stats))
    }

    /// Decompress one block.
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        debug!("decompressing {} byte block", data.len());
        let mut current = data.to_vec();
        for stage in self.stages.iter().rev() {
            let out = stage
                .decode(&current, &self.pool)
                .inspect_err(|e| warn!("{} decode failed: {}", stage.name(), e))?;
            trace!("{}: {} -> {} bytes", stage.name(), current.len(), out.len());
            current = out;
        }

        debug!("decompressed {} -> {} bytes", data.len(), current.len());
        Ok(current)
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::build(CodecConfig::default())
    }
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("config", &self.config)
            .field("stages", &self.stage_names())
            .finish()
    }
}
