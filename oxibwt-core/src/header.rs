//! Fixed-width big-endian stage headers.
//!
//! Each stage prefixes its output with the one field it needs to invert
//! itself: the BWT writes a 24-bit primary index, the MTF coder a 32-bit
//! original length. Readers split the header off and hand back the rest.

use crate::config::{BWT_HEADER_LEN, MTF_HEADER_LEN};
use crate::error::{OxiBwtError, Result};

/// Largest value a 24-bit header holds.
pub const U24_MAX: u32 = (1 << 24) - 1;

/// Append a 24-bit big-endian value.
///
/// # Panics
///
/// Debug builds assert that `value` fits in 24 bits.
#[inline]
pub fn write_u24_be(out: &mut Vec<u8>, value: u32) {
    debug_assert!(value <= U24_MAX, "value {} does not fit in 24 bits", value);
    out.extend_from_slice(&value.to_be_bytes()[1..]);
}

/// Split a 24-bit big-endian value off the front of `input`.
#[inline]
pub fn read_u24_be(input: &[u8]) -> Result<(u32, &[u8])> {
    if input.len() < BWT_HEADER_LEN {
        return Err(OxiBwtError::truncated(BWT_HEADER_LEN, input.len()));
    }
    let (head, rest) = input.split_at(BWT_HEADER_LEN);
    let value = (u32::from(head[0]) << 16) | (u32::from(head[1]) << 8) | u32::from(head[2]);
    Ok((value, rest))
}

/// Append a 32-bit big-endian value.
#[inline]
pub fn write_u32_be(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Split a 32-bit big-endian value off the front of `input`.
#[inline]
pub fn read_u32_be(input: &[u8]) -> Result<(u32, &[u8])> {
    if input.len() < MTF_HEADER_LEN {
        return Err(OxiBwtError::truncated(MTF_HEADER_LEN, input.len()));
    }
    let (head, rest) = input.split_at(MTF_HEADER_LEN);
    let value = u32::from_be_bytes([head[0], head[1], head[2], head[3]]);
    Ok((value, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_u24_layout() {
        let mut out = Vec::new();
        write_u24_be(&mut out, 0x01_02_03);
        assert_eq!(out, vec![0x01, 0x02, 0x03]);

        out.push(0xAA);
        let (value, rest) = read_u24_be(&out).unwrap();
        assert_eq!(value, 0x01_02_03);
        assert_eq!(rest, &[0xAA]);
    }

    #[test]
    fn test_u24_max() {
        let mut out = Vec::new();
        write_u24_be(&mut out, U24_MAX);
        assert_eq!(out, vec![0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_u32_layout() {
        let mut out = Vec::new();
        write_u32_be(&mut out, 5);
        assert_eq!(out, vec![0, 0, 0, 5]);
        let (value, rest) = read_u32_be(&out).unwrap();
        assert_eq!(value, 5);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_short_headers_truncated() {
        assert_eq!(
            read_u24_be(&[1, 2]).unwrap_err().kind(),
            ErrorKind::Truncated
        );
        assert_eq!(
            read_u32_be(&[1, 2, 3]).unwrap_err().kind(),
            ErrorKind::Truncated
        );
        assert_eq!(read_u32_be(&[]).unwrap_err(), OxiBwtError::truncated(4, 0));
    }
}
