//! Interleaved-lane memory layout shared by the engine, the nonce generator
//! and the deadline scanner.
//!
//! A "block" is 64 bytes of Shabal input (16 `u32` words) replicated across
//! `W` lanes. Physically the lanes are interleaved word-by-word: word `w`'s
//! `W` lane values sit at consecutive offsets `[w*W, w*W + W)`. This is the
//! same layout the plot cache itself uses, so a block can be read straight
//! out of (or written straight into) the cache without a transpose.
//!
//! `W` only appears as a const generic to keep block width a compile-time
//! fact everywhere it is threaded through [`crate::engine`]; stable Rust
//! does not allow `[u32; 16 * W]` as a field type (array lengths built from a
//! generic parameter need `generic_const_exprs`), so the backing storage is
//! a heap-allocated `Vec<u32>` sized once at construction instead of a fixed
//! array. The allocation happens when a block is built, never inside the
//! compress loop.
use alloc::vec;
use alloc::vec::Vec;

use crate::constants::{BLOCK_WORDS, HASH_SIZE, NONCE_SIZE, NONCE_WORDS};

/// One interleaved 64-byte Shabal block across `W` lanes (`16 * W` words).
#[derive(Clone)]
pub struct InterleavedBlock<const W: usize> {
    words: Vec<u32>,
}

impl<const W: usize> InterleavedBlock<W> {
    /// A block of all zero words.
    pub fn zero() -> Self {
        InterleavedBlock {
            words: vec![0u32; BLOCK_WORDS * W],
        }
    }

    /// Lane values for message word `w` (`w < 16`), one `u32` per lane.
    pub fn word(&self, w: usize) -> &[u32] {
        &self.words[w * W..(w + 1) * W]
    }

    /// Mutable lane values for message word `w`.
    pub fn word_mut(&mut self, w: usize) -> &mut [u32] {
        &mut self.words[w * W..(w + 1) * W]
    }

    /// Overwrites word `w` for every lane at once.
    pub fn set_word(&mut self, w: usize, values: [u32; W]) {
        self.word_mut(w).copy_from_slice(&values);
    }

    /// Overwrites this block's first 8 words (32 bytes per lane) from a flat,
    /// already-interleaved `8 * W`-word slice — used to splice a
    /// freshly-written hash into a termination block's dangling half.
    pub fn set_first_half(&mut self, words: &[u32]) {
        debug_assert_eq!(words.len(), 8 * W);
        self.words[..8 * W].copy_from_slice(words);
    }

    /// Writes `lane`'s 64-byte view of this block from little-endian bytes,
    /// leaving every other lane untouched.
    pub fn set_lane_bytes(&mut self, lane: usize, bytes: &[u8]) {
        debug_assert_eq!(bytes.len(), BLOCK_WORDS * 4);
        for w in 0..BLOCK_WORDS {
            let word = u32::from_le_bytes(bytes[w * 4..w * 4 + 4].try_into().unwrap());
            self.words[w * W + lane] = word;
        }
    }

    /// Reads `lane`'s 64-byte view of this block as little-endian bytes.
    pub fn lane_bytes(&self, lane: usize) -> [u8; BLOCK_WORDS * 4] {
        let mut out = [0u8; BLOCK_WORDS * 4];
        for w in 0..BLOCK_WORDS {
            out[w * 4..w * 4 + 4].copy_from_slice(&self.words[w * W + lane].to_le_bytes());
        }
        out
    }

    /// Reads `lane`'s view of just the first 32 bytes (8 words) of this
    /// block — the size of one Shabal-256 digest.
    pub fn lane_hash_bytes(&self, lane: usize) -> [u8; HASH_SIZE] {
        let mut out = [0u8; HASH_SIZE];
        for w in 0..HASH_SIZE / 4 {
            out[w * 4..w * 4 + 4].copy_from_slice(&self.words[w * W + lane].to_le_bytes());
        }
        out
    }

    /// This block's first 32 bytes (8 words) across all `W` lanes — the
    /// digest slice written by [`crate::engine::ShabalEngine::vhash_fast`].
    pub fn word_slice_head(&self) -> &[u32] {
        &self.words[..8 * W]
    }
}

/// The word-addressed, lane-interleaved cache backing one batch of `W`
/// nonces' plots (`W * NONCE_SIZE` bytes).
pub struct PlotBuffer<const W: usize> {
    words: Vec<u32>,
}

impl<const W: usize> PlotBuffer<W> {
    /// Allocates a zeroed cache for one batch of `W` nonces.
    pub fn new() -> Self {
        PlotBuffer {
            words: vec![0u32; NONCE_WORDS * W],
        }
    }

    /// Reads the 16-word block starting at word offset `word_offset`
    /// (`word_offset` must be a multiple of `W`, i.e. block-aligned).
    pub fn read_block(&self, word_offset: usize) -> InterleavedBlock<W> {
        let mut block = InterleavedBlock::zero();
        block
            .words
            .copy_from_slice(&self.words[word_offset..word_offset + BLOCK_WORDS * W]);
        block
    }

    /// Reads `count` consecutive blocks starting at word offset `word_offset`.
    pub fn read_blocks(&self, word_offset: usize, count: usize) -> Vec<InterleavedBlock<W>> {
        (0..count)
            .map(|i| self.read_block(word_offset + i * BLOCK_WORDS * W))
            .collect()
    }

    /// Writes a 16-word block at word offset `word_offset`.
    pub fn write_block(&mut self, word_offset: usize, block: &InterleavedBlock<W>) {
        self.words[word_offset..word_offset + BLOCK_WORDS * W].copy_from_slice(&block.words);
    }

    /// Byte offset (per lane) converted to a word offset into the flat,
    /// interleaved backing store.
    pub fn word_offset_of_byte(byte_offset: usize) -> usize {
        debug_assert_eq!(byte_offset % 4, 0);
        (byte_offset / 4) * W
    }

    /// The raw word storage, for the final XOR pass and for handing
    /// finished lanes back to the caller.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn words_mut(&mut self) -> &mut [u32] {
        &mut self.words
    }

    /// Reads an 8-word (32-byte, per-lane) hash slice starting at `word_offset`.
    pub fn read_hash_words(&self, word_offset: usize) -> &[u32] {
        &self.words[word_offset..word_offset + 8 * W]
    }

    /// Writes an 8-word (32-byte, per-lane) hash slice at `word_offset`.
    pub fn write_hash_words(&mut self, word_offset: usize, digest: &[u32]) {
        debug_assert_eq!(digest.len(), 8 * W);
        self.words[word_offset..word_offset + 8 * W].copy_from_slice(digest);
    }

    /// Extracts lane `lane`'s complete, de-interleaved `NONCE_SIZE`-byte
    /// buffer in hash-chain order (`H[8191]` first, `H[0]` last) — this is
    /// also the on-disk PoC2 plot layout itself; [`crate::noncegen`]'s
    /// public entry points write exactly this into the caller's cache, with
    /// no further rearrangement. The scoop-pair property is a read-time
    /// lookup performed by [`crate::deadline`], not a layout transform.
    pub fn lane_plot_chain_order(&self, lane: usize) -> Vec<u8> {
        let mut out = vec![0u8; NONCE_SIZE];
        for w in 0..NONCE_WORDS {
            let word = self.words[w * W + lane];
            out[w * 4..w * 4 + 4].copy_from_slice(&word.to_le_bytes());
        }
        out
    }
}

impl<const W: usize> Default for PlotBuffer<W> {
    fn default() -> Self {
        Self::new()
    }
}
