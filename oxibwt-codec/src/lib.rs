//! Block-sorting compression for OxiBwt.
//!
//! This crate provides a pure Rust implementation of a three-stage
//! block-sorting codec:
//! 1. Burrows-Wheeler Transform (BWT) - Rotation sorting to group contexts
//! 2. Move-to-Front Transform (MTF) - Recency ranks, mostly zeros after BWT
//! 3. Run-Length Encoding (RLE) - `(value, length - 1)` pairs
//!
//! Each stage prefixes its own header, so the compressed block is
//! self-describing:
//!
//! ```text
//! RLE pairs of: [ len: u32 BE ][ MTF symbols of: [ index: u24 BE ][ BWT bytes ] ]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxibwt_codec::{compress, decompress};
//!
//! let data = b"she sells sea shells by the sea shore";
//! let packed = compress(data).unwrap();
//! assert_eq!(decompress(&packed).unwrap(), data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod blocks;
/// Burrows-Wheeler Transform implementation.
pub mod bwt;
pub mod mtf;
pub mod pipeline;
pub mod rle;
pub mod rotation;

pub use blocks::{compress_blocks, decompress_blocks};
pub use bwt::{BwtResult, BwtStage};
pub use mtf::{MtfStage, MtfState};
pub use pipeline::{BlockStats, Codec};
pub use rle::{RleRun, RleStage};
pub use rotation::{rotation_order, suffix_array};

pub use oxibwt_core::{CodecConfig, OxiBwtError, Result, RotationStrategy};

/// Compress one block with the default configuration.
pub fn compress(block: &[u8]) -> Result<Vec<u8>> {
    Codec::default().compress(block)
}

/// Decompress one block with the default configuration.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    Codec::default().decompress(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_single() {
        let original = b"a";
        let compressed = compress(original).unwrap();
        assert_eq!(compressed, vec![0, 2, 4, 0, 0, 2, b'a', 0]);
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, original.as_slice());
    }

    #[test]
    fn test_roundtrip_repeated() {
        let original = b"aaaaaaaaaabbbbbbbbbbcccccccccc";
        let compressed = compress(original).unwrap();
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, original.as_slice());
    }

    #[test]
    fn test_roundtrip_empty() {
        let original = b"";
        let compressed = compress(original).unwrap();
        assert!(compressed.is_empty());
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, original.as_slice());
    }

    #[test]
    fn test_repetitive_input_shrinks() {
        let original = vec![b'z'; 10_000];
        let compressed = compress(&original).unwrap();
        assert!(compressed.len() < original.len() / 20);
        assert_eq!(decompress(&compressed).unwrap(), original);
    }

    #[test]
    fn test_default_limit() {
        let original = vec![0u8; 262_145];
        assert!(matches!(
            compress(&original),
            Err(OxiBwtError::InputTooLarge { .. })
        ));
    }
}
