//! Run-Length Encoding.
//!
//! Runs of identical bytes are split at 256 and written as `(value, length - 1)`
//! pairs, so the count byte covers lengths 1 to 256. Input without repeats
//! doubles in size; long runs shrink to two bytes per 256.

use oxibwt_core::error::{OxiBwtError, Result};
use oxibwt_core::pool::BufferPool;
use oxibwt_core::traits::BlockStage;

/// Longest run a single pair encodes.
pub const MAX_RUN: usize = 256;

/// A run of one byte value, `1 <= length <= 256`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RleRun {
    value: u8,
    length: u16,
}

impl RleRun {
    /// Create a run, or `None` if `length` is outside `1..=256`.
    pub fn new(value: u8, length: usize) -> Option<Self> {
        (1..=MAX_RUN).contains(&length).then_some(Self {
            value,
            length: length as u16,
        })
    }

    /// Decode a `(value, count)` pair.
    #[inline]
    pub fn from_pair(value: u8, count: u8) -> Self {
        Self {
            value,
            length: u16::from(count) + 1,
        }
    }

    /// The repeated byte.
    #[inline]
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Number of repeats.
    #[inline]
    pub fn length(&self) -> usize {
        self.length as usize
    }

    /// The stored count byte, `length - 1`.
    #[inline]
    pub fn count_byte(&self) -> u8 {
        (self.length - 1) as u8
    }

    /// The two encoded bytes.
    #[inline]
    pub fn encoded(&self) -> [u8; 2] {
        [self.value, self.count_byte()]
    }
}

/// Iterator over the runs of a byte slice.
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Iterator for Runs<'_> {
    type Item = RleRun;

    fn next(&mut self) -> Option<RleRun> {
        let value = *self.data.get(self.pos)?;
        let rest = &self.data[self.pos..];
        let length = rest
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == value)
            .count();
        self.pos += length;
        Some(RleRun {
            value,
            length: length as u16,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.data.len() - self.pos;
        (remaining.div_ceil(MAX_RUN), Some(remaining))
    }
}

/// Split `data` into maximal runs of at most 256 bytes.
pub fn runs(data: &[u8]) -> Runs<'_> {
    Runs { data, pos: 0 }
}

/// Encode `data` as `(value, length - 1)` pairs.
pub fn compress(data: &[u8]) -> Vec<u8> {
    // Worst case: every run has length 1.
    let mut out = Vec::with_capacity(data.len() * 2);
    for run in runs(data) {
        out.extend_from_slice(&run.encoded());
    }
    out
}

/// Decode a stream of pairs.
///
/// Fails with [`OxiBwtError::Truncated`] on a trailing unpaired byte and with
/// [`OxiBwtError::InputTooLarge`] if the output would exceed `max_len`.
/// Both checks run before any output is produced.
pub fn decompress(data: &[u8], max_len: usize) -> Result<Vec<u8>> {
    let pairs = data.chunks_exact(2);
    if !pairs.remainder().is_empty() {
        return Err(OxiBwtError::truncated(2, 1));
    }

    let total: usize = pairs.clone().map(|p| p[1] as usize + 1).sum();
    if total > max_len {
        return Err(OxiBwtError::input_too_large(total, max_len));
    }

    let mut out = Vec::with_capacity(total);
    for pair in pairs {
        let run = RleRun::from_pair(pair[0], pair[1]);
        out.resize(out.len() + run.length(), run.value());
    }
    Ok(out)
}

/// RLE as a pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct RleStage {
    max_len: usize,
}

impl RleStage {
    /// Stage name.
    pub const NAME: &'static str = "rle";

    /// Create a stage that refuses to expand beyond `max_len` bytes.
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl BlockStage for RleStage {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn encode(&self, input: &[u8], _scratch: &BufferPool) -> Result<Vec<u8>> {
        if input.len() > self.max_len {
            return Err(OxiBwtError::input_too_large(input.len(), self.max_len));
        }
        Ok(compress(input))
    }

    fn decode(&self, input: &[u8], _scratch: &BufferPool) -> Result<Vec<u8>> {
        decompress(input, self.max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxibwt_core::error::ErrorKind;

    #[test]
    fn test_rle_empty() {
        assert!(compress(b"").is_empty());
        assert!(decompress(b"", 0).unwrap().is_empty());
        assert_eq!(runs(b"").count(), 0);
    }

    #[test]
    fn test_rle_example() {
        let data = [9, 9, 9, 9, 9, 2, 2, 7];
        let found: Vec<(u8, usize)> = runs(&data).map(|r| (r.value(), r.length())).collect();
        assert_eq!(found, vec![(9, 5), (2, 2), (7, 1)]);

        let encoded = compress(&data);
        assert_eq!(encoded, vec![9, 4, 2, 1, 7, 0]);
        assert_eq!(decompress(&encoded, 64).unwrap(), data);
    }

    #[test]
    fn test_rle_split_at_256() {
        let data = vec![0xAB; 300];
        let found: Vec<usize> = runs(&data).map(|r| r.length()).collect();
        assert_eq!(found, vec![256, 44]);

        let encoded = compress(&data);
        assert_eq!(encoded, vec![0xAB, 255, 0xAB, 43]);
        assert_eq!(decompress(&encoded, 300).unwrap(), data);
    }

    #[test]
    fn test_rle_exact_multiple() {
        let data = vec![1u8; 512];
        assert_eq!(compress(&data), vec![1, 255, 1, 255]);
    }

    #[test]
    fn test_rle_no_runs_doubles() {
        let data: Vec<u8> = (0..=255).collect();
        let encoded = compress(&data);
        assert_eq!(encoded.len(), 512);
        assert!(encoded.chunks(2).all(|p| p[1] == 0));
        assert_eq!(decompress(&encoded, 256).unwrap(), data);
    }

    #[test]
    fn test_rle_roundtrip() {
        let data = b"aaaaaabbbbbbbbccccccccccc\x00\x00\x00xyz";
        let encoded = compress(data);
        assert_eq!(decompress(&encoded, 1024).unwrap(), data.as_slice());
    }

    #[test]
    fn test_run_bounds() {
        assert!(RleRun::new(1, 0).is_none());
        assert!(RleRun::new(1, 257).is_none());
        let run = RleRun::new(7, 256).unwrap();
        assert_eq!(run.encoded(), [7, 255]);
        assert_eq!(RleRun::from_pair(7, 255), run);
        assert_eq!(RleRun::from_pair(3, 0).length(), 1);
    }

    #[test]
    fn test_decompress_truncated() {
        let err = decompress(&[9, 4, 2], 64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncated);
    }

    #[test]
    fn test_decompress_limit() {
        let err = decompress(&[1, 255, 1, 255], 300).unwrap_err();
        assert_eq!(err, OxiBwtError::input_too_large(512, 300));
    }

    #[test]
    fn test_stage_roundtrip() {
        let pool = BufferPool::default();
        let stage = RleStage::new(1024);
        assert_eq!(stage.name(), "rle");
        assert!(stage.round_trips(&[0u8; 700], &pool).unwrap());
        assert!(stage.encode(&[0u8; 1025], &pool).is_err());
    }
}
