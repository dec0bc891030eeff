//! C4: the deadline scanner.
//!
//! A deadline is how long (in seconds) a miner would have to wait before
//! this nonce wins the current block. It is derived from one scoop of a
//! plot and the network's current generation signature; scanning a batch of
//! plots for the smallest deadline is the actual "mining" operation in a
//! proof-of-capacity chain — everything in [`crate::noncegen`] only exists
//! to make this scan possible ahead of time.
use crate::constants::{HASH_SIZE, NONCE_SIZE, SCOOPS_PER_NONCE, SCOOP_SIZE, SHABAL_BLOCK};
use crate::context::FastContext;
use crate::engine::ShabalEngine;
use crate::error::PrecheckError;
use crate::layout::InterleavedBlock;

/// Computes the deadline for one nonce's data at the given scoop, against
/// `gensig`. This is the scalar (`W = 1`) convenience wrapper around the
/// batch scanner below, for callers checking a single candidate rather than
/// scanning a whole plot file.
pub fn scoop_deadline(plot: &[u8], scoop: u64, gensig: &[u8; HASH_SIZE]) -> u64 {
    debug_assert_eq!(plot.len(), NONCE_SIZE);
    let (u1, u2) = scoop_halves(plot, scoop);
    deadline_of(gensig, u1, u2)
}

/// Reads the two 32-byte halves making up scoop `scoop` of one nonce's plot.
/// [`crate::noncegen`] writes plots in plain hash-chain order with no
/// rearrangement, so a scoop's pair is not contiguous in memory: `u1` is the
/// scoop's own first hash, and `u2` is the *second* hash of the mirror scoop
/// `4095 - scoop` — the PoC2 pairing lives in this lookup, not in the plot's
/// byte layout.
fn scoop_halves(plot: &[u8], scoop: u64) -> (&[u8], &[u8]) {
    let base = scoop as usize * SCOOP_SIZE;
    let mirror_base = (SCOOPS_PER_NONCE as u64 - 1 - scoop) as usize * SCOOP_SIZE;
    (
        &plot[base..base + HASH_SIZE],
        &plot[mirror_base + HASH_SIZE..mirror_base + SCOOP_SIZE],
    )
}

fn deadline_of(gensig: &[u8; HASH_SIZE], u1: &[u8], u2: &[u8]) -> u64 {
    let mut engine = FastContext::global().to_engine::<1>();

    let mut first = InterleavedBlock::<1>::zero();
    let mut gensig_u1 = [0u8; SHABAL_BLOCK];
    gensig_u1[..HASH_SIZE].copy_from_slice(gensig);
    gensig_u1[HASH_SIZE..].copy_from_slice(u1);
    first.set_lane_bytes(0, &gensig_u1);

    let mut term = InterleavedBlock::<1>::zero();
    let mut u2_pad = [0u8; SHABAL_BLOCK];
    u2_pad[..HASH_SIZE].copy_from_slice(u2);
    u2_pad[HASH_SIZE] = 0x80;
    term.set_lane_bytes(0, &u2_pad);

    let blocks = [first];
    let mut out = InterleavedBlock::<1>::zero();
    engine.vhash_fast(Some(&blocks), &term, &mut out, 2);

    let digest = out.lane_hash_bytes(0);
    u64::from_be_bytes(digest[..8].try_into().unwrap())
}

/// Scans `n` consecutive nonces' worth of `data` (`n * NONCE_SIZE` bytes, one
/// nonce's plot per lane-group in `W`-wide batches) at scoop `scoop` against
/// `gensig`, returning `(best_deadline, best_offset)` — the smallest
/// deadline found and the index (0-based, into the `n` nonces) of the first
/// nonce achieving it.
///
/// `best_deadline`/`best_offset` are in/out: the scan only ever improves on
/// them (strict `<`), so a caller accumulating a running best across several
/// scan calls passes its current best in and gets the possibly-updated best
/// back out, rather than having it clobbered by this call's local minimum. A
/// caller with no prior best passes `u64::MAX` (any offset).
///
/// # Preconditions
/// `n` is a positive multiple of `W`, `data.len() == n * NONCE_SIZE`, and
/// `scoop < SCOOPS_PER_NONCE`. Violating these is a programmer error; this
/// fast path only `debug_assert!`s them.
pub fn find_best_deadline<const W: usize>(
    data: &[u8],
    scoop: u64,
    n: usize,
    gensig: &[u8; HASH_SIZE],
    best_deadline: u64,
    best_offset: u64,
) -> (u64, u64) {
    debug_assert!(n > 0);
    debug_assert_eq!(n % W, 0);
    debug_assert_eq!(data.len(), n * NONCE_SIZE);
    debug_assert!((scoop as usize) < SCOOPS_PER_NONCE);

    let mut best_deadline = best_deadline;
    let mut best_offset = best_offset;

    let mut gensig_block = InterleavedBlock::<W>::zero();
    for lane in 0..W {
        let mut buf = [0u8; SHABAL_BLOCK];
        buf[..HASH_SIZE].copy_from_slice(gensig);
        gensig_block.set_lane_bytes(lane, &buf);
    }

    for batch in 0..n / W {
        let mut engine: ShabalEngine<W> = FastContext::global().to_engine::<W>();
        let mut first = gensig_block.clone();
        let mut term = InterleavedBlock::<W>::zero();

        for lane in 0..W {
            let nonce_index = batch * W + lane;
            let plot = &data[nonce_index * NONCE_SIZE..(nonce_index + 1) * NONCE_SIZE];
            let (u1, u2) = scoop_halves(plot, scoop);

            let mut gensig_u1 = first.lane_bytes(lane);
            gensig_u1[HASH_SIZE..].copy_from_slice(u1);
            first.set_lane_bytes(lane, &gensig_u1);

            let mut u2_pad = [0u8; SHABAL_BLOCK];
            u2_pad[..HASH_SIZE].copy_from_slice(u2);
            u2_pad[HASH_SIZE] = 0x80;
            term.set_lane_bytes(lane, &u2_pad);
        }

        let blocks = [first];
        let mut out = InterleavedBlock::<W>::zero();
        engine.vhash_fast(Some(&blocks), &term, &mut out, 2);

        for lane in 0..W {
            let digest = out.lane_hash_bytes(lane);
            let deadline = u64::from_be_bytes(digest[..8].try_into().unwrap());
            let nonce_index = (batch * W + lane) as u64;
            if deadline < best_deadline {
                best_deadline = deadline;
                best_offset = nonce_index;
            }
        }
    }

    log::debug!("find_best_deadline: scanned {n} nonces, best={best_deadline}");
    (best_deadline, best_offset)
}

/// Checked entry point: validates preconditions and returns
/// [`PrecheckError`] instead of panicking. `best_deadline`/`best_offset` are
/// in/out, same contract as [`find_best_deadline`].
pub fn find_best_deadline_checked<const W: usize>(
    data: &[u8],
    scoop: u64,
    n: usize,
    gensig: &[u8; HASH_SIZE],
    best_deadline: u64,
    best_offset: u64,
) -> Result<(u64, u64), PrecheckError> {
    if n == 0 {
        return Err(PrecheckError::ZeroNonces);
    }
    if n % W != 0 {
        return Err(PrecheckError::NonceCountNotLaneAligned { nonces: n, lanes: W });
    }
    if data.len() != n * NONCE_SIZE {
        return Err(PrecheckError::BufferLength {
            expected: n * NONCE_SIZE,
            actual: data.len(),
        });
    }
    if scoop >= SCOOPS_PER_NONCE as u64 {
        return Err(PrecheckError::ScoopOutOfRange {
            scoop,
            limit: SCOOPS_PER_NONCE as u64,
        });
    }
    Ok(find_best_deadline::<W>(
        data,
        scoop,
        n,
        gensig,
        best_deadline,
        best_offset,
    ))
}
