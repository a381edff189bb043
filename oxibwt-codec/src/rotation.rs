//! Rotation ordering for the Burrows-Wheeler Transform.
//!
//! The BWT needs every cyclic rotation of a block sorted lexicographically.
//! Rotations are conceptually read from a doubled copy of the block, so
//! there is no terminating sentinel: two rotations of a periodic block can
//! compare equal, in which case the smaller start index sorts first.
//!
//! Two constructions are provided and produce the same permutation:
//!
//! - [`order_by_doubling`]: prefix doubling over cyclic rank classes with
//!   counting sorts, O(n log n) time and five `u32` scratch arrays.
//! - [`order_by_comparison`]: a stable comparison sort using
//!   [`compare_rotations`], O(n² log n) on highly repetitive input.

use std::cmp::Ordering;

use oxibwt_core::config::{CodecConfig, RotationStrategy};
use oxibwt_core::error::{OxiBwtError, Result};
use oxibwt_core::pool::{BufferPool, PooledBuffer};
use oxibwt_core::simd::ByteScanner;

/// Number of distinct byte values.
const ALPHABET: usize = 256;

/// Compute the rotation ordering of `data` using the configured strategy.
///
/// Returns [`OxiBwtError::InputTooLarge`] if `data` is longer than
/// `config.max_block`. An empty block yields an empty ordering.
pub fn rotation_order(
    data: &[u8],
    config: &CodecConfig,
    pool: &BufferPool,
) -> Result<PooledBuffer> {
    if data.len() > config.max_block {
        return Err(OxiBwtError::input_too_large(data.len(), config.max_block));
    }

    Ok(match config.rotation {
        RotationStrategy::Doubling => order_by_doubling(data, pool),
        RotationStrategy::Comparison => order_by_comparison(data, pool),
    })
}

/// Replace each count with the sum of the counts before it.
#[inline]
fn exclusive_prefix_sum(counts: &mut [u32]) {
    let mut sum = 0u32;
    for count in counts {
        let c = *count;
        *count = sum;
        sum += c;
    }
}

/// Sort rotations by prefix doubling.
///
/// After round `r` every rotation carries a class equal to the rank of its
/// first `2^r` bytes. Rounds stop once all classes are distinct or the
/// compared prefix covers the whole block, at which point equal classes mean
/// equal rotations. A final counting sort by class, visiting start indices
/// in ascending order, applies the tie-break.
pub fn order_by_doubling(data: &[u8], pool: &BufferPool) -> PooledBuffer {
    let n = data.len();
    debug_assert!(u32::try_from(n).is_ok());

    let mut order = pool.acquire(n);
    if n == 0 {
        return order;
    }

    let mut class = pool.acquire(n);
    let mut shifted = pool.acquire(n);
    let mut next_class = pool.acquire(n);
    let mut bucket = pool.acquire(n.max(ALPHABET));

    // Round zero: single bytes.
    for &b in data {
        bucket[b as usize] += 1;
    }
    exclusive_prefix_sum(&mut bucket[..ALPHABET]);
    for (i, &b) in data.iter().enumerate() {
        let slot = &mut bucket[b as usize];
        order[*slot as usize] = i as u32;
        *slot += 1;
    }

    let mut classes = 1usize;
    class[order[0] as usize] = 0;
    for k in 1..n {
        if data[order[k] as usize] != data[order[k - 1] as usize] {
            classes += 1;
        }
        class[order[k] as usize] = (classes - 1) as u32;
    }

    let mut h = 1usize;
    while h < n && classes < n {
        // Shifting back by h lists rotations ordered by their second half.
        for (dst, &src) in shifted.iter_mut().zip(order.iter()) {
            *dst = ((src as usize + n - h) % n) as u32;
        }

        // Stable counting sort on the first half.
        bucket[..classes].fill(0);
        for &i in shifted.iter() {
            bucket[class[i as usize] as usize] += 1;
        }
        exclusive_prefix_sum(&mut bucket[..classes]);
        for &i in shifted.iter() {
            let slot = &mut bucket[class[i as usize] as usize];
            order[*slot as usize] = i;
            *slot += 1;
        }

        // Re-rank on (first half, second half).
        let mut fresh = 1usize;
        next_class[order[0] as usize] = 0;
        for k in 1..n {
            let cur = order[k] as usize;
            let prev = order[k - 1] as usize;
            if class[cur] != class[prev] || class[(cur + h) % n] != class[(prev + h) % n] {
                fresh += 1;
            }
            next_class[cur] = (fresh - 1) as u32;
        }

        std::mem::swap(&mut class, &mut next_class);
        classes = fresh;
        h <<= 1;
    }

    // Equal rotations share a class; ascending start index breaks the tie.
    bucket[..classes].fill(0);
    for &c in class.iter() {
        bucket[c as usize] += 1;
    }
    exclusive_prefix_sum(&mut bucket[..classes]);
    for (i, &c) in class.iter().enumerate() {
        let slot = &mut bucket[c as usize];
        order[*slot as usize] = i as u32;
        *slot += 1;
    }

    order
}

/// Sort rotations with a stable comparison sort over the doubled block.
pub fn order_by_comparison(data: &[u8], pool: &BufferPool) -> PooledBuffer {
    let n = data.len();
    let mut order = pool.acquire(n);
    if n == 0 {
        return order;
    }

    let doubled = doubled_view(data);
    let scanner = ByteScanner::new();

    for (k, slot) in order.iter_mut().enumerate() {
        *slot = k as u32;
    }
    order.sort_by(|&i, &j| compare_rotations_with(&scanner, &doubled, n, i as usize, j as usize));

    order
}

/// Concatenate `data` with itself so every rotation is a contiguous slice.
pub fn doubled_view(data: &[u8]) -> Vec<u8> {
    let mut doubled = Vec::with_capacity(data.len() * 2);
    doubled.extend_from_slice(data);
    doubled.extend_from_slice(data);
    doubled
}

/// Compare the length-`n` rotations starting at `i` and `j`.
///
/// `doubled` must be the output of [`doubled_view`] for a block of length
/// `n`, and `i`, `j` must be below `n`. Equal rotations order by start index.
pub fn compare_rotations(doubled: &[u8], n: usize, i: usize, j: usize) -> Ordering {
    compare_rotations_with(&ByteScanner::new(), doubled, n, i, j)
}

#[inline]
fn compare_rotations_with(
    scanner: &ByteScanner,
    doubled: &[u8],
    n: usize,
    i: usize,
    j: usize,
) -> Ordering {
    if i == j {
        return Ordering::Equal;
    }
    scanner
        .compare(&doubled[i..i + n], &doubled[j..j + n])
        .then(i.cmp(&j))
}

/// Build the suffix array of `data`.
///
/// Unlike rotations, suffixes end at the block boundary: when one suffix is
/// a prefix of another the shorter one sorts first.
pub fn suffix_array(data: &[u8]) -> Vec<u32> {
    let n = data.len();
    let mut sa: Vec<u32> = (0..n as u32).collect();
    if n <= 1 {
        return sa;
    }

    // Rank 0 is reserved for "past the end".
    let mut rank: Vec<u32> = data.iter().map(|&b| u32::from(b) + 1).collect();
    let mut next_rank = vec![0u32; n];
    let mut h = 1usize;

    loop {
        let key = |i: u32| {
            let i = i as usize;
            (rank[i], if i + h < n { rank[i + h] } else { 0 })
        };

        sa.sort_unstable_by_key(|&i| key(i));

        next_rank[sa[0] as usize] = 1;
        for k in 1..n {
            let bump = u32::from(key(sa[k]) != key(sa[k - 1]));
            next_rank[sa[k] as usize] = next_rank[sa[k - 1] as usize] + bump;
        }

        std::mem::swap(&mut rank, &mut next_rank);
        if rank[sa[n - 1] as usize] as usize == n {
            break;
        }
        h <<= 1;
    }

    sa
}
