//! Scratch buffer pool.
//!
//! Each block borrows its transient index arrays (rotation order, rank
//! classes, LF links) from a [`BufferPool`] for the duration of one call.
//! A [`PooledBuffer`] hands its storage back when dropped, so buffers are
//! released on every exit path, errors included. The pool is shared across
//! threads but never carries block state between calls: every acquired
//! buffer is zero-filled.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::DEFAULT_POOL_RETAIN;

/// Internal pool state.
#[derive(Debug)]
struct PoolInner {
    free: Mutex<Vec<Vec<u32>>>,
    max_retained: usize,
}

impl PoolInner {
    fn lock(&self) -> MutexGuard<'_, Vec<Vec<u32>>> {
        // A panic while holding the lock cannot leave a free list half-built.
        self.free.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn give_back(&self, mut buf: Vec<u32>) {
        let mut free = self.lock();
        if free.len() < self.max_retained {
            buf.clear();
            free.push(buf);
        } else {
            log::trace!("pool full, dropping {} word buffer", buf.capacity());
        }
    }
}

/// Thread-safe pool of `u32` scratch buffers.
#[derive(Debug, Clone)]
pub struct BufferPool {
    inner: Arc<PoolInner>,
}

/// Pool statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Buffers currently held for reuse.
    pub retained: usize,
    /// Total capacity of the retained buffers in bytes.
    pub retained_bytes: usize,
}

impl std::fmt::Display for PoolStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pool: {} retained buffers ({:.1}KB)",
            self.retained,
            self.retained_bytes as f64 / 1024.0
        )
    }
}

impl BufferPool {
    /// Create a pool retaining at most `max_retained` idle buffers.
    pub fn new(max_retained: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                free: Mutex::new(Vec::with_capacity(max_retained)),
                max_retained,
            }),
        }
    }

    /// Acquire a zero-filled buffer of exactly `len` elements.
    pub fn acquire(&self, len: usize) -> PooledBuffer {
        let reused = {
            let mut free = self.inner.lock();
            // Prefer the smallest retained buffer that already fits.
            let best = free
                .iter()
                .enumerate()
                .filter(|(_, b)| b.capacity() >= len)
                .min_by_key(|(_, b)| b.capacity())
                .map(|(i, _)| i);
            match best {
                Some(i) => Some(free.swap_remove(i)),
                None => free.pop(),
            }
        };

        let mut buf = reused.unwrap_or_default();
        buf.clear();
        buf.resize(len, 0);

        PooledBuffer {
            buf,
            pool: Arc::clone(&self.inner),
        }
    }

    /// Maximum number of idle buffers kept.
    pub fn max_retained(&self) -> usize {
        self.inner.max_retained
    }

    /// Snapshot of the pool's idle buffers.
    pub fn stats(&self) -> PoolStats {
        let free = self.inner.lock();
        PoolStats {
            retained: free.len(),
            retained_bytes: free
                .iter()
                .map(|b| b.capacity() * std::mem::size_of::<u32>())
                .sum(),
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_RETAIN)
    }
}

/// A buffer on loan from a [`BufferPool`].
#[derive(Debug)]
pub struct PooledBuffer {
    buf: Vec<u32>,
    pool: Arc<PoolInner>,
}

impl PooledBuffer {
    /// Detach the storage from the pool.
    pub fn into_vec(mut self) -> Vec<u32> {
        std::mem::take(&mut self.buf)
    }
}

impl Deref for PooledBuffer {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.buf
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut [u32] {
        &mut self.buf
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        if buf.capacity() > 0 {
            self.pool.give_back(buf);
        }
    }
}
