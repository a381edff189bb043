//! # OxiBwt Core
//!
//! Core components for the OxiBwt block-sorting codec.
//!
//! This crate provides the building blocks shared by every stage:
//!
//! - [`error`]: Error types
//! - [`config`]: Codec configuration and wire-format constants
//! - [`pool`]: Thread-safe scratch buffer pool
//! - [`simd`]: Runtime-dispatched byte comparison and search
//! - [`header`]: Fixed-width big-endian stage headers
//! - [`traits`]: The [`BlockStage`] trait
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L2: Pipeline                                            │
//! │     Codec, compress/decompress, parallel blocks        │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Stages                                              │
//! │     BWT (rotation sort), MTF, RLE                      │
//! ├─────────────────────────────────────────────────────────┤
//! │ L0: Core (this crate)                                   │
//! │     BufferPool, ByteScanner, headers, errors           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxibwt_core::pool::BufferPool;
//! use oxibwt_core::simd::ByteScanner;
//!
//! let pool = BufferPool::new(4);
//! let order = pool.acquire(16);
//! assert_eq!(order.len(), 16);
//!
//! let scanner = ByteScanner::new();
//! assert_eq!(scanner.mismatch(b"rotation", b"rotator"), Some(5));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod header;
pub mod pool;
pub mod simd;
pub mod traits;

// Re-exports for convenience
pub use config::{
    BWT_HEADER_LEN, CodecConfig, DEFAULT_MAX_BLOCK, MAX_BLOCK_LIMIT, MTF_HEADER_LEN,
    RotationStrategy,
};
pub use error::{ErrorKind, OxiBwtError, Result};
pub use pool::{BufferPool, PoolStats, PooledBuffer};
pub use simd::{ByteScanner, ScanLevel};
pub use traits::BlockStage;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{CodecConfig, RotationStrategy};
    pub use crate::error::{ErrorKind, OxiBwtError, Result};
    pub use crate::pool::{BufferPool, PooledBuffer};
    pub use crate::simd::ByteScanner;
    pub use crate::traits::BlockStage;
}
