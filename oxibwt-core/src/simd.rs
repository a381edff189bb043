//! Capability-queried byte scanning.
//!
//! The rotation sort compares long byte ranges and the MTF coder searches
//! its 256-entry recency list on every symbol. Both go through
//! [`ByteScanner`], which picks the widest instruction set the CPU offers:
//!
//! - AVX2 (32 bytes per step) on x86_64 when detected at runtime
//! - SSE2 (16 bytes per step) on any other x86_64
//! - A portable scalar path comparing 8-byte words elsewhere
//!
//! All levels return identical results. The intrinsics are confined to
//! `#[target_feature]` functions that are only reachable through the safe
//! dispatch below.

use std::cmp::Ordering;
use std::sync::OnceLock;

/// Instruction set used by a [`ByteScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanLevel {
    /// 256-bit AVX2 lanes.
    Avx2,
    /// 128-bit SSE2 lanes.
    Sse2,
    /// Portable word-at-a-time loop.
    Scalar,
}

impl ScanLevel {
    /// Detect the best level for the running CPU.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx2") {
                ScanLevel::Avx2
            } else {
                ScanLevel::Sse2
            }
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            ScanLevel::Scalar
        }
    }

    /// Whether this level can run on the current CPU.
    pub fn is_supported(self) -> bool {
        match self {
            ScanLevel::Scalar => true,
            #[cfg(target_arch = "x86_64")]
            ScanLevel::Sse2 => true,
            #[cfg(target_arch = "x86_64")]
            ScanLevel::Avx2 => is_x86_feature_detected!("avx2"),
            #[cfg(not(target_arch = "x86_64"))]
            _ => false,
        }
    }
}

static DETECTED: OnceLock<ScanLevel> = OnceLock::new();

/// Byte comparison and search with runtime SIMD dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteScanner {
    level: ScanLevel,
}

impl ByteScanner {
    /// Create a scanner using the best detected level.
    pub fn new() -> Self {
        Self {
            level: *DETECTED.get_or_init(|| {
                let level = ScanLevel::detect();
                log::debug!("byte scanner using {:?}", level);
                level
            }),
        }
    }

    /// Create a scanner pinned to `level`, or the detected level if the CPU
    /// lacks it.
    pub fn with_level(level: ScanLevel) -> Self {
        if level.is_supported() {
            Self { level }
        } else {
            Self::new()
        }
    }

    /// Create a scanner that never uses SIMD.
    pub fn scalar() -> Self {
        Self {
            level: ScanLevel::Scalar,
        }
    }

    /// The level in use.
    #[inline]
    pub fn level(&self) -> ScanLevel {
        self.level
    }

    /// Offset of the first differing byte within the common prefix length,
    /// or `None` if the shorter slice is a prefix of the longer.
    #[inline]
    pub fn mismatch(&self, a: &[u8], b: &[u8]) -> Option<usize> {
        match self.level {
            #[cfg(target_arch = "x86_64")]
            // SAFETY: `Avx2` is only stored after runtime detection.
            ScanLevel::Avx2 => unsafe { x86::mismatch_avx2(a, b) },
            #[cfg(target_arch = "x86_64")]
            // SAFETY: SSE2 is part of the x86_64 baseline.
            ScanLevel::Sse2 => unsafe { x86::mismatch_sse2(a, b) },
            _ => scalar::mismatch(a, b),
        }
    }

    /// Lexicographic comparison; a proper prefix sorts first.
    #[inline]
    pub fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        match self.mismatch(a, b) {
            Some(i) => a[i].cmp(&b[i]),
            None => a.len().cmp(&b.len()),
        }
    }

    /// Position of the first occurrence of `needle`.
    #[inline]
    pub fn find_byte(&self, haystack: &[u8], needle: u8) -> Option<usize> {
        match self.level {
            #[cfg(target_arch = "x86_64")]
            // SAFETY: `Avx2` is only stored after runtime detection.
            ScanLevel::Avx2 => unsafe { x86::find_byte_avx2(haystack, needle) },
            #[cfg(target_arch = "x86_64")]
            // SAFETY: SSE2 is part of the x86_64 baseline.
            ScanLevel::Sse2 => unsafe { x86::find_byte_sse2(haystack, needle) },
            _ => scalar::find_byte(haystack, needle),
        }
    }
}

impl Default for ByteScanner {
    fn default() -> Self {
        Self::new()
    }
}

mod scalar {
    #[inline]
    fn load_word(chunk: &[u8]) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        u64::from_le_bytes(word)
    }

    pub(super) fn mismatch(a: &[u8], b: &[u8]) -> Option<usize> {
        let len = a.len().min(b.len());
        let mut wa = a[..len].chunks_exact(8);
        let mut wb = b[..len].chunks_exact(8);
        let mut offset = 0;

        for (x, y) in (&mut wa).zip(&mut wb) {
            let diff = load_word(x) ^ load_word(y);
            if diff != 0 {
                // Little-endian load: the lowest set bit is the first byte.
                return Some(offset + (diff.trailing_zeros() / 8) as usize);
            }
            offset += 8;
        }

        wa.remainder()
            .iter()
            .zip(wb.remainder())
            .position(|(x, y)| x != y)
            .map(|p| offset + p)
    }

    pub(super) fn find_byte(haystack: &[u8], needle: u8) -> Option<usize> {
        haystack.iter().position(|&b| b == needle)
    }
}

#[cfg(target_arch = "x86_64")]
mod x86 {
    use core::arch::x86_64::*;

    /// # Safety
    ///
    /// Requires AVX2.
    #[target_feature(enable = "avx2")]
    pub(super) unsafe fn mismatch_avx2(a: &[u8], b: &[u8]) -> Option<usize> {
        let len = a.len().min(b.len());
        let mut i = 0;
        while i + 32 <= len {
            // SAFETY: `i + 32 <= len` keeps both unaligned loads in bounds.
            let mask = unsafe {
                let va = _mm256_loadu_si256(a.as_ptr().add(i).cast::<__m256i>());
                let vb = _mm256_loadu_si256(b.as_ptr().add(i).cast::<__m256i>());
                _mm256_movemask_epi8(_mm256_cmpeq_epi8(va, vb)) as u32
            };
            if mask != u32::MAX {
                return Some(i + (!mask).trailing_zeros() as usize);
            }
            i += 32;
        }
        super::scalar::mismatch(&a[i..len], &b[i..len]).map(|p| p + i)
    }

    /// # Safety
    ///
    /// Requires SSE2.
    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn mismatch_sse2(a: &[u8], b: &[u8]) -> Option<usize> {
        let len = a.len().min(b.len());
        let mut i = 0;
        while i + 16 <= len {
            // SAFETY: `i + 16 <= len` keeps both unaligned loads in bounds.
            let mask = unsafe {
                let va = _mm_loadu_si128(a.as_ptr().add(i).cast::<__m128i>());
                let vb = _mm_loadu_si128(b.as_ptr().add(i).cast::<__m128i>());
                (_mm_movemask_epi8(_mm_cmpeq_epi8(va, vb)) as u32) & 0xFFFF
            };
            if mask != 0xFFFF {
                return Some(i + (!mask & 0xFFFF).trailing_zeros() as usize);
            }
            i += 16;
        }
        super::scalar::mismatch(&a[i..len], &b[i..len]).map(|p| p + i)
    }

    /// # Safety
    ///
    /// Requires AVX2.
    #[target_feature(enable = "avx2")]
    pub(super) unsafe fn find_byte_avx2(haystack: &[u8], needle: u8) -> Option<usize> {
        let len = haystack.len();
        let mut i = 0;
        while i + 32 <= len {
            // SAFETY: `i + 32 <= len` keeps the unaligned load in bounds.
            let mask = unsafe {
                let target = _mm256_set1_epi8(needle as i8);
                let v = _mm256_loadu_si256(haystack.as_ptr().add(i).cast::<__m256i>());
                _mm256_movemask_epi8(_mm256_cmpeq_epi8(v, target)) as u32
            };
            if mask != 0 {
                return Some(i + mask.trailing_zeros() as usize);
            }
            i += 32;
        }
        super::scalar::find_byte(&haystack[i..], needle).map(|p| p + i)
    }

    /// # Safety
    ///
    /// Requires SSE2.
    #[target_feature(enable = "sse2")]
    pub(super) unsafe fn find_byte_sse2(haystack: &[u8], needle: u8) -> Option<usize> {
        let len = haystack.len();
        let mut i = 0;
        while i + 16 <= len {
            // SAFETY: `i + 16 <= len` keeps the unaligned load in bounds.
            let mask = unsafe {
                let target = _mm_set1_epi8(needle as i8);
                let v = _mm_loadu_si128(haystack.as_ptr().add(i).cast::<__m128i>());
                (_mm_movemask_epi8(_mm_cmpeq_epi8(v, target)) as u32) & 0xFFFF
            };
            if mask != 0 {
                return Some(i + mask.trailing_zeros() as usize);
            }
            i += 16;
        }
        super::scalar::find_byte(&haystack[i..], needle).map(|p| p + i)
    }
}
