//! Move-to-Front Transform.
//!
//! MTF replaces each byte with its position in a recency list of all 256
//! byte values, then moves that byte to the front. Runs of the same byte
//! after the BWT become runs of zeros.
//!
//! Every block starts from a fresh identity list; the list is owned by the
//! call and never shared. Serialized form: a 4-byte big-endian original
//! length followed by one symbol byte per input byte.

use oxibwt_core::config::MTF_HEADER_LEN;
use oxibwt_core::error::{OxiBwtError, Result};
use oxibwt_core::header::{read_u32_be, write_u32_be};
use oxibwt_core::pool::BufferPool;
use oxibwt_core::simd::ByteScanner;
use oxibwt_core::traits::BlockStage;

/// Size of the MTF alphabet.
pub const ALPHABET_SIZE: usize = 256;

/// The recency list of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtfState {
    list: [u8; ALPHABET_SIZE],
    scanner: ByteScanner,
}

impl MtfState {
    /// Create the identity list `[0, 1, ..., 255]`.
    pub fn new() -> Self {
        Self::with_scanner(ByteScanner::new())
    }

    /// Create the identity list searched with a specific scanner.
    pub fn with_scanner(scanner: ByteScanner) -> Self {
        let mut list = [0u8; ALPHABET_SIZE];
        for (i, slot) in list.iter_mut().enumerate() {
            *slot = i as u8;
        }
        Self { list, scanner }
    }

    /// Current list order.
    pub fn as_slice(&self) -> &[u8] {
        &self.list
    }

    /// Position of `byte` in the list.
    #[inline]
    pub fn position_of(&self, byte: u8) -> usize {
        match self.scanner.find_byte(&self.list, byte) {
            Some(pos) => pos,
            None => unreachable!("MTF list is a permutation of every byte value"),
        }
    }

    /// Byte at list position `pos`.
    #[inline]
    pub fn symbol_at(&self, pos: u8) -> u8 {
        self.list[pos as usize]
    }

    /// Move the entry at `pos` to the front, shifting earlier entries back.
    #[inline]
    pub fn promote(&mut self, pos: usize) {
        if pos > 0 {
            let byte = self.list[pos];
            self.list.copy_within(0..pos, 1);
            self.list[0] = byte;
        }
    }

    /// Emit the symbol for `byte` and update the list.
    #[inline]
    pub fn encode_byte(&mut self, byte: u8) -> u8 {
        let pos = self.position_of(byte);
        self.promote(pos);
        pos as u8
    }

    /// Recover the byte for `symbol` and update the list.
    #[inline]
    pub fn decode_symbol(&mut self, symbol: u8) -> u8 {
        let byte = self.symbol_at(symbol);
        self.promote(symbol as usize);
        byte
    }

    /// Whether the list still holds every byte value exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; ALPHABET_SIZE];
        for &b in &self.list {
            if std::mem::replace(&mut seen[b as usize], true) {
                return false;
            }
        }
        true
    }
}

impl Default for MtfState {
    fn default() -> Self {
        Self::new()
    }
}

/// Transform bytes to MTF symbols without a header.
pub fn encode_symbols(data: &[u8]) -> Vec<u8> {
    let mut state = MtfState::new();
    data.iter().map(|&b| state.encode_byte(b)).collect()
}

/// Inverse of [`encode_symbols`].
pub fn decode_symbols(symbols: &[u8]) -> Vec<u8> {
    let mut state = MtfState::new();
    symbols.iter().map(|&s| state.decode_symbol(s)).collect()
}

/// Transform `data` and prefix the 4-byte original length.
///
/// Fails with [`OxiBwtError::InputTooLarge`] if `data` exceeds `max_len`.
pub fn encode(data: &[u8], max_len: usize) -> Result<Vec<u8>> {
    if data.len() > max_len || u32::try_from(data.len()).is_err() {
        return Err(OxiBwtError::input_too_large(data.len(), max_len));
    }

    let mut out = Vec::with_capacity(MTF_HEADER_LEN + data.len());
    write_u32_be(&mut out, data.len() as u32);

    let mut state = MtfState::new();
    out.extend(data.iter().map(|&b| state.encode_byte(b)));
    Ok(out)
}

/// Validate the length header and invert the transform.
pub fn decode(stream: &[u8], max_len: usize) -> Result<Vec<u8>> {
    let (declared, symbols) = read_u32_be(stream)?;
    let declared = declared as usize;
    if declared > max_len {
        return Err(OxiBwtError::input_too_large(declared, max_len));
    }
    if declared != symbols.len() {
        return Err(OxiBwtError::invalid_header(format!(
            "MTF length header says {} symbols, stream has {}",
            declared,
            symbols.len()
        )));
    }

    Ok(decode_symbols(symbols))
}

/// MTF as a pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct MtfStage {
    max_len: usize,
}

impl MtfStage {
    /// Stage name.
    pub const NAME: &'static str = "mtf";

    /// Create a stage accepting streams of at most `max_len` bytes.
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl BlockStage for MtfStage {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn encode(&self, input: &[u8], _scratch: &BufferPool) -> Result<Vec<u8>> {
        encode(input, self.max_len)
    }

    fn decode(&self, input: &[u8], _scratch: &BufferPool) -> Result<Vec<u8>> {
        decode(input, self.max_len)
    }
}
