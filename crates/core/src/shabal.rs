//! C1: the scalar Shabal-256 primitive.
//!
//! This is the one-shot, arbitrary-length entry point: [`shabal256`] owns its
//! own padding and block chunking, unlike the fast-path engine in
//! [`crate::engine`], which expects the caller to have already arranged
//! padding into a precomputed terminal block. Every other module in this
//! crate is ultimately checked against this function in the test suite.
use alloc::vec::Vec;

use crate::constants::{HASH_SIZE, SHABAL_BLOCK};
use crate::context::FastContext;
use crate::layout::InterleavedBlock;

/// Computes the 32-byte Shabal-256 digest of `message`.
///
/// Padding is the standard Shabal scheme: a single `0x80` bit immediately
/// after the message, then zeros out to the next 64-byte boundary — always
/// exactly one padding block, even when `message.len()` is already a
/// multiple of 64.
pub fn shabal256(message: &[u8]) -> [u8; HASH_SIZE] {
    let mut engine = FastContext::global().to_engine::<1>();

    let full_blocks = message.len() / SHABAL_BLOCK;
    for chunk in message[..full_blocks * SHABAL_BLOCK].chunks_exact(SHABAL_BLOCK) {
        engine.compress_block(&block_from_bytes(chunk));
    }

    let tail = &message[full_blocks * SHABAL_BLOCK..];
    let mut padded: Vec<u8> = Vec::with_capacity(SHABAL_BLOCK);
    padded.extend_from_slice(tail);
    padded.push(0x80);
    padded.resize(SHABAL_BLOCK, 0);
    let last = block_from_bytes(&padded);

    let mut out = InterleavedBlock::<1>::zero();
    engine.vhash_fast(None, &last, &mut out, 1);

    out.lane_hash_bytes(0)
}

fn block_from_bytes(bytes: &[u8]) -> InterleavedBlock<1> {
    debug_assert_eq!(bytes.len(), SHABAL_BLOCK);
    let mut block = InterleavedBlock::<1>::zero();
    block.set_lane_bytes(0, bytes);
    block
}
