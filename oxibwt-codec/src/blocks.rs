//! Multi-block helpers.
//!
//! Inputs larger than one block are split into `max_block`-sized chunks that
//! are compressed independently. With the `parallel` feature the chunks are
//! handed to rayon; the output is identical either way.

use log::debug;
use oxibwt_core::error::Result;

use crate::pipeline::Codec;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Split `data` into blocks of at most `codec.config().max_block` bytes and
/// compress each one.
pub fn compress_blocks(data: &[u8], codec: &Codec) -> Result<Vec<Vec<u8>>> {
    let chunks: Vec<&[u8]> = data.chunks(codec.config().max_block).collect();
    debug!("compressing {} bytes as {} blocks", data.len(), chunks.len());

    #[cfg(feature = "parallel")]
    let blocks = chunks.par_iter().map(|chunk| codec.compress(chunk));

    #[cfg(not(feature = "parallel"))]
    let blocks = chunks.iter().map(|chunk| codec.compress(chunk));

    blocks.collect()
}

/// Decompress each block and concatenate the results in order.
pub fn decompress_blocks<B>(blocks: &[B], codec: &Codec) -> Result<Vec<u8>>
where
    B: AsRef<[u8]> + Sync,
{
    #[cfg(feature = "parallel")]
    let parts: Vec<Vec<u8>> = blocks
        .par_iter()
        .map(|block| codec.decompress(block.as_ref()))
        .collect::<Result<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let parts: Vec<Vec<u8>> = blocks
        .iter()
        .map(|block| codec.decompress(block.as_ref()))
        .collect::<Result<_>>()?;

    Ok(parts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxibwt_core::config::CodecConfig;

    fn small_codec() -> Codec {
        Codec::new(CodecConfig::new(64)).unwrap()
    }

    #[test]
    fn test_blocks_empty() {
        let codec = small_codec();
        let blocks = compress_blocks(b"", &codec).unwrap();
        assert!(blocks.is_empty());
        assert!(decompress_blocks(&blocks, &codec).unwrap().is_empty());
    }

    #[test]
    fn test_blocks_split() {
        let codec = small_codec();
        let data: Vec<u8> = (0..200u32).map(|i| (i % 7) as u8 + b'a').collect();
        let blocks = compress_blocks(&data, &codec).unwrap();
        assert_eq!(blocks.len(), 4);
        assert_eq!(decompress_blocks(&blocks, &codec).unwrap(), data);
    }

    #[test]
    fn test_blocks_match_single_block() {
        let codec = small_codec();
        let data = b"abcabcabcabc";
        let blocks = compress_blocks(data, &codec).unwrap();
        assert_eq!(blocks, vec![codec.compress(data).unwrap()]);
    }

    #[test]
    fn test_blocks_bad_block_fails() {
        let codec = small_codec();
        let mut blocks = compress_blocks(&[5u8; 100], &codec).unwrap();
        blocks[1].truncate(1);
        assert!(decompress_blocks(&blocks, &codec).is_err());
    }
}
