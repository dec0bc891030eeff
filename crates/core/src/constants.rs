//! Protocol constants fixed by the Burst/Signum PoC2 plot format.
//!
//! None of these are configurable: they are baked into the wire format of
//! every plot file and every deadline calculation on the network.

/// Shabal-256 digest size, in bytes.
pub const HASH_SIZE: usize = 32;

/// Number of 32-byte hashes making up one nonce's plot.
pub const HASHES_PER_NONCE: usize = 8192;

/// Size of one nonce's plot, in bytes (`HASH_SIZE * HASHES_PER_NONCE`).
pub const NONCE_SIZE: usize = HASH_SIZE * HASHES_PER_NONCE;

/// A scoop is a pair of hashes (`SCOOP_SIZE = 2 * HASH_SIZE`).
pub const SCOOP_SIZE: usize = 2 * HASH_SIZE;

/// Number of scoops per nonce.
pub const SCOOPS_PER_NONCE: usize = 4096;

/// Byte budget for the "capped" window used once a nonce's rolling hash
/// chain has grown past 128 hashes; see [`crate::noncegen`].
pub const HASH_CAP: usize = 4096;

/// Shabal's native block size, in bytes.
pub const SHABAL_BLOCK: usize = 64;

/// Number of `u32` words in one Shabal message block.
pub const BLOCK_WORDS: usize = SHABAL_BLOCK / 4;

/// Number of `u32` words making up one nonce's plot, per lane.
pub const NONCE_WORDS: usize = NONCE_SIZE / 4;
