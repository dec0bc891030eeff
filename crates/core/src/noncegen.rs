//! C3: the nonce generator.
//!
//! Produces the 262,144-byte "plot" for each of a range of nonces: a chain
//! of 8,192 Shabal-256 hashes folded back over themselves (each hash's
//! message is the most recent window of preceding hashes plus an
//! account/nonce seed), followed by a final XOR pass. The output is written
//! tail-to-head in plain hash-chain order (`H[8191]` at byte 0, `H[0]` at the
//! tail) — there is no separate scoop-pair rearrangement pass at generation
//! time; a scoop's mirror hash lives in a different scoop's slot
//! (`4095 - scoop`), and [`crate::deadline`] reads both locations directly.
//!
//! Three precomputed 64-byte termination blocks drive the hash chain's
//! three distinct padding shapes, matching the reference miner's `t1`/`t2`/
//! `t3` buffers:
//!
//! - `t1`: the 16-byte account-id/nonce seed followed immediately by Shabal's
//!   `0x80` padding bit and zero fill. Used whenever the preceding message
//!   length already lands on a 64-byte boundary, so the seed and its padding
//!   form the entire final block on their own.
//! - `t2`: the constant, oldest hash `H[0]`, followed by the same
//!   seed-plus-padding half as `t1`. Used when the preceding message is not
//!   block-aligned; this block absorbs the one dangling 32-byte hash (always
//!   the chain's first hash, since the message reads newest-to-oldest) that
//!   doesn't fit the clean blocks read straight from the cache.
//! - `t3`: pure Shabal padding (`0x80` then zero) with no seed at all. Used
//!   once the rolling window has saturated at [`HASH_CAP`] bytes, where the
//!   window itself already lands exactly on a block boundary.
use crate::constants::{HASHES_PER_NONCE, HASH_CAP, HASH_SIZE, NONCE_SIZE, SHABAL_BLOCK};
use crate::context::FastContext;
use crate::error::PrecheckError;
use crate::layout::{InterleavedBlock, PlotBuffer};

/// Byte offset (within one nonce's plot) of hash `i`, descending from the
/// tail as `i` grows: `H[0]` lives at the very end, `H[8191]` at the start.
fn hash_byte_offset(i: usize) -> usize {
    (HASHES_PER_NONCE - 1 - i) * HASH_SIZE
}

fn seed_plain(id: u64, nonce: u64) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[0..8].copy_from_slice(&id.to_be_bytes());
    out[8..16].copy_from_slice(&nonce.to_be_bytes());
    out
}

fn build_t1<const W: usize>(id: u64, nonces: &[u64; W]) -> InterleavedBlock<W> {
    let mut block = InterleavedBlock::zero();
    for lane in 0..W {
        let mut buf = [0u8; SHABAL_BLOCK];
        buf[0..16].copy_from_slice(&seed_plain(id, nonces[lane]));
        buf[16] = 0x80;
        block.set_lane_bytes(lane, &buf);
    }
    block
}

fn build_t2_template<const W: usize>(id: u64, nonces: &[u64; W]) -> InterleavedBlock<W> {
    let mut block = InterleavedBlock::zero();
    for lane in 0..W {
        let mut buf = [0u8; SHABAL_BLOCK];
        buf[32..48].copy_from_slice(&seed_plain(id, nonces[lane]));
        buf[48] = 0x80;
        block.set_lane_bytes(lane, &buf);
    }
    block
}

fn build_t3<const W: usize>() -> InterleavedBlock<W> {
    let mut block = InterleavedBlock::zero();
    let mut buf = [0u8; SHABAL_BLOCK];
    buf[0] = 0x80;
    for lane in 0..W {
        block.set_lane_bytes(lane, &buf);
    }
    block
}

/// Generates the plots for one batch of exactly `W` nonces into `plot`.
///
/// Every hash in the chain starts from a fresh clone of the global IV — the
/// reference miner re-initializes its fast context at the top of every
/// round rather than threading state between them, and this mirrors that.
fn noncegen_batch<const W: usize>(plot: &mut PlotBuffer<W>, id: u64, nonces: &[u64; W]) {
    let t1 = build_t1(id, nonces);
    let mut t2 = build_t2_template(id, nonces);
    let t3 = build_t3::<W>();
    let mut out = InterleavedBlock::<W>::zero();

    // H[0] = Shabal256(seed‖nonce): one block, term = t1.
    FastContext::global()
        .to_engine::<W>()
        .vhash_fast(None, &t1, &mut out, 1);
    plot.write_hash_words(
        PlotBuffer::<W>::word_offset_of_byte(hash_byte_offset(0)),
        out.word_slice_head(),
    );

    // t2's first half is the constant, oldest hash H[0] (plus seed in its
    // second half) — set once here, never touched again. The dangling
    // 32-byte remainder of an odd-length window is always H[0], the last
    // hash in the message order (…‖H[1]‖H[0]‖seed), not the most recently
    // written one.
    t2.set_first_half(out.word_slice_head());

    // H[1 ..= 127]: rolling window over *all* preceding hashes, alternating
    // t1 (window already block-aligned) and t2 (one hash dangling). The
    // window saturates at exactly `HASH_CAP / HASH_SIZE` (128) hashes, so
    // this phase stops one short of that — H[128] is the first hash whose
    // preceding window is already full, handled by the capped phase below.
    let saturation_index = core::cmp::min(HASH_CAP / HASH_SIZE, HASHES_PER_NONCE);
    for i in 1..saturation_index {
        let data_start = PlotBuffer::<W>::word_offset_of_byte(hash_byte_offset(i - 1));
        let mut engine = FastContext::global().to_engine::<W>();
        if i % 2 == 0 {
            let blocks = plot.read_blocks(data_start, i / 2);
            engine.vhash_fast(Some(&blocks), &t1, &mut out, i / 2 + 1);
        } else {
            let older_blocks = (i - 1) / 2;
            if older_blocks == 0 {
                engine.vhash_fast(None, &t2, &mut out, 1);
            } else {
                let blocks = plot.read_blocks(data_start, older_blocks);
                engine.vhash_fast(Some(&blocks), &t2, &mut out, older_blocks + 1);
            }
        }
        plot.write_hash_words(
            PlotBuffer::<W>::word_offset_of_byte(hash_byte_offset(i)),
            out.word_slice_head(),
        );
    }

    // H[128 ..= 8191]: window saturated at HASH_CAP, always t3. The
    // HASH_CAP-byte window is itself block-aligned (HASH_CAP % SHABAL_BLOCK
    // == 0), so all of it is read straight from the cache as complete
    // blocks and t3 contributes pure padding with no seed and no real
    // message bytes — past this point the seed is no longer part of the
    // hashed message at all.
    let capped_blocks = HASH_CAP / SHABAL_BLOCK;
    for i in saturation_index..HASHES_PER_NONCE {
        let data_start = PlotBuffer::<W>::word_offset_of_byte(hash_byte_offset(i - 1));
        let blocks = plot.read_blocks(data_start, capped_blocks);
        let mut engine = FastContext::global().to_engine::<W>();
        engine.vhash_fast(Some(&blocks), &t3, &mut out, capped_blocks + 1);
        plot.write_hash_words(
            PlotBuffer::<W>::word_offset_of_byte(hash_byte_offset(i)),
            out.word_slice_head(),
        );
    }

    // Final hash: the whole plot plus the seed, term = t1.
    let total_blocks = NONCE_SIZE / SHABAL_BLOCK;
    let all_blocks = plot.read_blocks(0, total_blocks);
    let mut final_out = InterleavedBlock::<W>::zero();
    FastContext::global().to_engine::<W>().vhash_fast(
        Some(&all_blocks),
        &t1,
        &mut final_out,
        total_blocks + 1,
    );

    // Final XOR pass: every 32-byte (8-word) chunk of the plot is XORed with
    // the final digest.
    let digest = final_out.word_slice_head().to_vec();
    let words = plot.words_mut();
    for chunk in words.chunks_mut(8 * W) {
        for (w, d) in chunk.iter_mut().zip(digest.iter().cycle()) {
            *w ^= *d;
        }
    }
}

/// Unchecked fast path: generates plots for `n` consecutive nonces starting
/// at `start_nonce` into `cache` (`n * NONCE_SIZE` bytes), lane count `W`.
///
/// # Preconditions
/// `n` is a positive multiple of `W`, and `cache.len() == n * NONCE_SIZE`.
/// Violating either is a programmer error and only `debug_assert!`ed here.
pub fn noncegen<const W: usize>(cache: &mut [u8], id: u64, start_nonce: u64, n: usize) {
    debug_assert!(n > 0);
    debug_assert_eq!(n % W, 0, "nonce count must be a multiple of the lane count");
    debug_assert_eq!(cache.len(), n * NONCE_SIZE);

    let mut plot = PlotBuffer::<W>::new();
    for batch in 0..n / W {
        let nonces: [u64; W] = core::array::from_fn(|lane| start_nonce + (batch * W + lane) as u64);
        noncegen_batch(&mut plot, id, &nonces);
        for lane in 0..W {
            let nonce_index = batch * W + lane;
            let dst = &mut cache[nonce_index * NONCE_SIZE..(nonce_index + 1) * NONCE_SIZE];
            dst.copy_from_slice(&plot.lane_plot_chain_order(lane));
        }
        log::trace!("noncegen: batch {batch} ({W} nonces) complete");
    }
}

/// Checked entry point: validates preconditions and returns
/// [`PrecheckError`] instead of panicking.
pub fn noncegen_checked<const W: usize>(
    cache: &mut [u8],
    id: u64,
    start_nonce: u64,
    n: usize,
) -> Result<(), PrecheckError> {
    if n == 0 {
        return Err(PrecheckError::ZeroNonces);
    }
    if n % W != 0 {
        return Err(PrecheckError::NonceCountNotLaneAligned { nonces: n, lanes: W });
    }
    if cache.len() != n * NONCE_SIZE {
        return Err(PrecheckError::BufferLength {
            expected: n * NONCE_SIZE,
            actual: cache.len(),
        });
    }
    noncegen::<W>(cache, id, start_nonce, n);
    Ok(())
}

/// Caller-side batch partitioning across cores. Each of the `n / W` batches
/// is independent (distinct nonces, its own `PlotBuffer`), so this is a
/// plain data-parallel map, not a change to the per-batch algorithm above.
#[cfg(feature = "parallel")]
pub fn noncegen_parallel<const W: usize>(cache: &mut [u8], id: u64, start_nonce: u64, n: usize) {
    use rayon::prelude::*;

    debug_assert!(n > 0);
    debug_assert_eq!(n % W, 0);
    debug_assert_eq!(cache.len(), n * NONCE_SIZE);

    cache
        .par_chunks_mut(W * NONCE_SIZE)
        .enumerate()
        .for_each(|(batch, dst)| {
            let mut plot = PlotBuffer::<W>::new();
            let nonces: [u64; W] =
                core::array::from_fn(|lane| start_nonce + (batch * W + lane) as u64);
            noncegen_batch(&mut plot, id, &nonces);
            for lane in 0..W {
                dst[lane * NONCE_SIZE..(lane + 1) * NONCE_SIZE]
                    .copy_from_slice(&plot.lane_plot_chain_order(lane));
            }
        });
}
