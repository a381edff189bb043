//! Core traits for block transforms.
//!
//! A codec is an ordered list of [`BlockStage`]s. Compression feeds each
//! stage's output to the next; decompression walks the list backwards. Each
//! stage writes a self-describing header in front of its payload and must
//! validate that header on decode before doing any work.

use crate::error::Result;
use crate::pool::BufferPool;

/// One reversible transform over a whole block.
///
/// Implementations hold no per-block state, so a single stage may be
/// shared by any number of threads. Scratch arrays come from the supplied
/// pool and go back to it before the call returns.
pub trait BlockStage: Send + Sync {
    /// Short stage name used in logs and statistics.
    fn name(&self) -> &'static str;

    /// Apply the forward transform.
    fn encode(&self, input: &[u8], scratch: &BufferPool) -> Result<Vec<u8>>;

    /// Apply the inverse transform.
    ///
    /// Must return an error rather than partial output when `input` is
    /// malformed.
    fn decode(&self, input: &[u8], scratch: &BufferPool) -> Result<Vec<u8>>;

    /// Encode then decode, returning whether the input was reproduced.
    fn round_trips(&self, input: &[u8], scratch: &BufferPool) -> Result<bool> {
        let encoded = self.encode(input, scratch)?;
        Ok(self.decode(&encoded, scratch)? == input)
    }
}
