//! Burrows-Wheeler Transform.
//!
//! The forward transform sorts every cyclic rotation of the block and emits
//! the byte preceding each rotation start (the last column of the sorted
//! rotation matrix), plus the position of the unrotated block in that
//! order. The inverse rebuilds the block by walking the LF-mapping built
//! from a counting sort of the transformed bytes.
//!
//! Serialized form: a 3-byte big-endian primary index followed by the `n`
//! transformed bytes. An empty block serializes to nothing.

use log::trace;
use oxibwt_core::config::{BWT_HEADER_LEN, CodecConfig};
use oxibwt_core::error::{OxiBwtError, Result};
use oxibwt_core::header::{read_u24_be, write_u24_be};
use oxibwt_core::pool::BufferPool;
use oxibwt_core::traits::BlockStage;

use crate::rotation::rotation_order;

/// Output of the forward transform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BwtResult {
    /// Last column of the sorted rotation matrix.
    pub transformed: Vec<u8>,
    /// Sorted position of the unrotated block; `None` for an empty block.
    pub primary_index: Option<usize>,
}

impl BwtResult {
    /// Length of the transformed block.
    pub fn len(&self) -> usize {
        self.transformed.len()
    }

    /// Whether the transformed block is empty.
    pub fn is_empty(&self) -> bool {
        self.transformed.is_empty()
    }

    /// Write the index header followed by the transformed bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let Some(index) = self.primary_index else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(BWT_HEADER_LEN + self.transformed.len());
        write_u24_be(&mut out, index as u32);
        out.extend_from_slice(&self.transformed);
        out
    }

    /// Parse a serialized transform, validating the index against the
    /// payload length.
    pub fn parse(stream: &[u8]) -> Result<Self> {
        if stream.is_empty() {
            return Ok(Self::default());
        }
        let (index, transformed) = read_u24_be(stream)?;
        let index = index as usize;
        if index >= transformed.len() {
            return Err(OxiBwtError::index_out_of_range(index, transformed.len()));
        }
        Ok(Self {
            transformed: transformed.to_vec(),
            primary_index: Some(index),
        })
    }

    /// Reconstruct the original block.
    pub fn invert(&self, pool: &BufferPool) -> Result<Vec<u8>> {
        match self.primary_index {
            Some(index) => inverse(&self.transformed, index, pool),
            None if self.transformed.is_empty() => Ok(Vec::new()),
            None => Err(OxiBwtError::invalid_header(
                "non-empty transform without a primary index",
            )),
        }
    }
}

/// Perform the forward Burrows-Wheeler Transform.
pub fn forward(data: &[u8], config: &CodecConfig, pool: &BufferPool) -> Result<BwtResult> {
    let order = rotation_order(data, config, pool)?;
    let n = data.len();
    if n == 0 {
        return Ok(BwtResult::default());
    }

    let mut transformed = Vec::with_capacity(n);
    let mut primary_index = None;
    for (k, &start) in order.iter().enumerate() {
        let start = start as usize;
        if start == 0 {
            primary_index = Some(k);
        }
        transformed.push(data[(start + n - 1) % n]);
    }

    // The ordering is a permutation of 0..n, so the identity rotation is present.
    if primary_index.is_none() {
        return Err(OxiBwtError::index_out_of_range(n, n));
    }

    trace!("bwt: {} bytes, primary index {:?}", n, primary_index);
    Ok(BwtResult {
        transformed,
        primary_index,
    })
}

/// Perform the inverse Burrows-Wheeler Transform.
///
/// `primary_index` must lie in `[0, transformed.len())`; an empty
/// `transformed` therefore always fails with
/// [`OxiBwtError::IndexOutOfRange`].
pub fn inverse(transformed: &[u8], primary_index: usize, pool: &BufferPool) -> Result<Vec<u8>> {
    let n = transformed.len();
    if primary_index >= n {
        return Err(OxiBwtError::index_out_of_range(primary_index, n));
    }

    // Starting rank of each byte value in the sorted first column.
    let mut start = [0u32; 256];
    for &byte in transformed {
        start[byte as usize] += 1;
    }
    let mut total = 0u32;
    for slot in start.iter_mut() {
        let count = *slot;
        *slot = total;
        total += count;
    }

    // next[rank] = position in `transformed` of the byte with that rank.
    let mut next = pool.acquire(n);
    for (i, &byte) in transformed.iter().enumerate() {
        let slot = &mut start[byte as usize];
        next[*slot as usize] = i as u32;
        *slot += 1;
    }

    let mut result = Vec::with_capacity(n);
    let mut current = next[primary_index] as usize;
    for _ in 0..n {
        result.push(transformed[current]);
        current = next[current] as usize;
    }

    Ok(result)
}

/// Forward transform followed by serialization.
pub fn encode(data: &[u8], config: &CodecConfig, pool: &BufferPool) -> Result<Vec<u8>> {
    Ok(forward(data, config, pool)?.serialize())
}

/// Parse a serialized transform and invert it.
pub fn decode(stream: &[u8], config: &CodecConfig, pool: &BufferPool) -> Result<Vec<u8>> {
    let payload = stream.len().saturating_sub(BWT_HEADER_LEN);
    if payload > config.max_block {
        return Err(OxiBwtError::input_too_large(payload, config.max_block));
    }
    BwtResult::parse(stream)?.invert(pool)
}

/// The BWT as a pipeline stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct BwtStage {
    config: CodecConfig,
}

impl BwtStage {
    /// Stage name.
    pub const NAME: &'static str = "bwt";

    /// Create a stage honouring `config.max_block` and `config.rotation`.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }
}

impl BlockStage for BwtStage {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn encode(&self, input: &[u8], scratch: &BufferPool) -> Result<Vec<u8>> {
        encode(input, &self.config, scratch)
    }

    fn decode(&self, input: &[u8], scratch: &BufferPool) -> Result<Vec<u8>> {
        decode(input, &self.config, scratch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxibwt_core::config::RotationStrategy;
    use oxibwt_core::error::ErrorKind;

    fn transform(data: &[u8]) -> BwtResult {
        forward(data, &CodecConfig::default(), &BufferPool::default()).unwrap()
    }

    fn roundtrip(data: &[u8]) -> Vec<u8> {
        let pool = BufferPool::default();
        let result = forward(data, &CodecConfig::default(), &pool).unwrap();
        result.invert(&pool).unwrap()
    }

    #[test]
    fn test_bwt_empty() {
        let result = transform(b"");
        assert!(result.is_empty());
        assert_eq!(result.primary_index, None);
        assert!(result.serialize().is_empty());
    }

    #[test]
    fn test_bwt_single() {
        let result = transform(b"a");
        assert_eq!(result.transformed, b"a");
        assert_eq!(result.primary_index, Some(0));
    }

    #[test]
    fn test_bwt_aba() {
        let result = transform(b"ABA");
        assert_eq!(result.transformed, vec![66, 65, 65]);
        assert_eq!(result.primary_index, Some(1));
        assert_eq!(result.serialize(), vec![0, 0, 1, 66, 65, 65]);

        let pool = BufferPool::default();
        assert_eq!(inverse(b"BAA", 1, &pool).unwrap(), b"ABA");
    }

    #[test]
    fn test_bwt_banana() {
        let result = transform(b"banana");
        assert_eq!(result.transformed, b"nnbaaa");
        assert_eq!(result.primary_index, Some(3));
        assert_eq!(roundtrip(b"banana"), b"banana");
    }

    #[test]
    fn test_bwt_roundtrip() {
        let test_cases = [
            b"hello world".as_slice(),
            b"abracadabra",
            b"mississippi",
            b"aaaaa",
            b"abcde",
            b"abababab",
            b"the quick brown fox jumps over the lazy dog",
        ];

        for data in test_cases {
            assert_eq!(roundtrip(data), data, "Failed for: {:?}", data);
        }
    }

    #[test]
    fn test_bwt_is_permutation() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let result = transform(data);
        let mut a = data.to_vec();
        let mut b = result.transformed.clone();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bwt_groups_similar() {
        let result = transform(b"abababab");
        let runs = 1 + result
            .transformed
            .windows(2)
            .filter(|w| w[0] != w[1])
            .count();
        assert!(runs <= 4, "BWT should group similar bytes");
    }

    #[test]
    fn test_bwt_strategies_agree() {
        let pool = BufferPool::default();
        let data = b"TOBEORNOTTOBEORTOBEORNOT";
        let a = forward(data, &CodecConfig::default(), &pool).unwrap();
        let b = forward(
            data,
            &CodecConfig::default().with_rotation(RotationStrategy::Comparison),
            &pool,
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bwt_too_large() {
        let pool = BufferPool::default();
        let err = forward(&[0u8; 17], &CodecConfig::new(16), &pool).unwrap_err();
        assert_eq!(err, OxiBwtError::input_too_large(17, 16));
    }

    #[test]
    fn test_inverse_index_out_of_range() {
        let pool = BufferPool::default();
        let err = inverse(b"BAA", 3, &pool).unwrap_err();
        assert_eq!(err, OxiBwtError::index_out_of_range(3, 3));
        let err = inverse(b"", 0, &pool).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            BwtResult::parse(&[0, 0]).unwrap_err().kind(),
            ErrorKind::Truncated
        );
        // A header with no payload cannot carry a valid index.
        assert_eq!(
            BwtResult::parse(&[0, 0, 0]).unwrap_err().kind(),
            ErrorKind::IndexOutOfRange
        );
        assert_eq!(
            BwtResult::parse(&[0, 0, 3, b'B', b'A', b'A']).unwrap_err(),
            OxiBwtError::index_out_of_range(3, 3)
        );
        assert_eq!(BwtResult::parse(&[]).unwrap(), BwtResult::default());
    }

    #[test]
    fn test_decode_rejects_oversized_payload() {
        let pool = BufferPool::default();
        let mut stream = vec![0, 0, 0];
        stream.extend_from_slice(&[7u8; 9]);
        let err = decode(&stream, &CodecConfig::new(8), &pool).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputTooLarge);
    }

    #[test]
    fn test_invert_missing_index() {
        let pool = BufferPool::default();
        let result = BwtResult {
            transformed: b"abc".to_vec(),
            primary_index: None,
        };
        assert_eq!(result.invert(&pool).unwrap_err().kind(), ErrorKind::InvalidHeader);
    }

    #[test]
    fn test_stage_roundtrip() {
        let pool = BufferPool::default();
        let stage = BwtStage::default();
        assert_eq!(stage.name(), "bwt");
        let encoded = stage.encode(b"abracadabra", &pool).unwrap();
        assert_eq!(encoded.len(), 3 + 11);
        assert_eq!(stage.decode(&encoded, &pool).unwrap(), b"abracadabra");
        assert!(stage.round_trips(b"", &pool).unwrap());
    }
}
