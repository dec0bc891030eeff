use alloc::vec;

use crate::constants::{HASH_SIZE, NONCE_SIZE, SCOOPS_PER_NONCE, SCOOP_SIZE};
use crate::deadline::find_best_deadline;
use crate::noncegen::noncegen;
use crate::shabal::shabal256;

#[test]
fn shabal256_is_deterministic() {
    let a = shabal256(b"the quick brown fox");
    let b = shabal256(b"the quick brown fox");
    assert_eq!(a, b);
}

#[test]
fn shabal256_empty_string_matches_published_test_vector() {
    // The standard Shabal-256 test vector for the empty message.
    let digest = shabal256(b"");
    let expected = hex_decode("aec750d11feee9f16271922fbaf5a9be142f62019ef8d720f858940070889014");
    assert_eq!(digest, expected);
}

fn hex_decode(s: &str) -> [u8; HASH_SIZE] {
    debug_assert_eq!(s.len(), HASH_SIZE * 2);
    let mut out = [0u8; HASH_SIZE];
    for i in 0..HASH_SIZE {
        out[i] = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).unwrap();
    }
    out
}

#[test]
fn shabal256_differs_on_single_bit_changes() {
    let a = shabal256(b"burst proof of capacity");
    let b = shabal256(b"burst proof of capacitz");
    assert_ne!(a, b);

    // Avalanche sanity check: a one-byte change should flip a substantial
    // fraction of output bits, not just a handful.
    let flipped = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum::<u32>();
    assert!(flipped > 32, "only {flipped} bits flipped, expected broad diffusion");
}

#[test]
fn shabal256_handles_block_boundary_lengths() {
    // Exercises the always-one-padding-block rule at exact multiples of 64.
    for len in [0usize, 1, 63, 64, 65, 127, 128, 129] {
        let msg = vec![0x42u8; len];
        let digest = shabal256(&msg);
        assert_eq!(digest.len(), HASH_SIZE);
    }
}

#[test]
fn noncegen_is_deterministic_and_nonce_dependent() {
    let mut a = vec![0u8; 4 * NONCE_SIZE];
    let mut b = vec![0u8; 4 * NONCE_SIZE];
    noncegen::<4>(&mut a, 7, 100, 4);
    noncegen::<4>(&mut b, 7, 100, 4);
    assert_eq!(a, b, "same id/nonce range must reproduce byte-for-byte");

    let mut c = vec![0u8; 4 * NONCE_SIZE];
    noncegen::<4>(&mut c, 7, 200, 4);
    assert_ne!(
        &a[..NONCE_SIZE],
        &c[..NONCE_SIZE],
        "different start nonce must produce a different plot"
    );

    // Different lanes within one batch must not collide.
    assert_ne!(&a[0..NONCE_SIZE], &a[NONCE_SIZE..2 * NONCE_SIZE]);
}

#[test]
fn noncegen_lane_width_is_bit_exact() {
    // The engine is generic purely to vary SIMD width; every width must
    // produce byte-identical plots for the same (id, nonce).
    let mut scalar = vec![0u8; 8 * NONCE_SIZE];
    noncegen::<1>(&mut scalar, 42, 1000, 8);

    let mut w4 = vec![0u8; 8 * NONCE_SIZE];
    noncegen::<4>(&mut w4, 42, 1000, 8);

    let mut w8 = vec![0u8; 8 * NONCE_SIZE];
    noncegen::<8>(&mut w8, 42, 1000, 8);

    assert_eq!(scalar, w4, "W=1 and W=4 plots diverged");
    assert_eq!(scalar, w8, "W=1 and W=8 plots diverged");
}

#[test]
fn noncegen_final_xor_pass_affects_every_scoop() {
    // If the final XOR pass were skipped or only touched part of the plot,
    // adjacent scoops built from raw chain hashes would be distinguishable
    // from post-XOR ones; spot check a handful of scoops away from the
    // boundary with a before/after comparison is impractical without
    // reaching into internals, so this instead checks the externally
    // visible property: scoop content is not literally equal to the chain
    // hash at the same cache offset for a plain zero-gensig probe.
    let mut plot = vec![0u8; NONCE_SIZE];
    noncegen::<1>(&mut plot, 1, 0, 1);
    let tail_hash = &plot[NONCE_SIZE - HASH_SIZE..];
    assert!(
        tail_hash.iter().any(|&b| b != 0),
        "plot tail should not be all-zero after the XOR pass"
    );
}

#[test]
fn scoop_deadline_matches_manual_mirror_scoop_hash() {
    // PoC2's defining property: scoop `s`'s own first hash paired with the
    // *second* hash of the mirror scoop `4095 - s`. The plot itself is
    // plain hash-chain order (no generation-time rearrangement), so this
    // check reaches into the raw bytes the same way an external reader of
    // the on-disk format would, independent of `crate::deadline`'s own
    // scoop-lookup implementation.
    use crate::deadline::scoop_deadline;

    let mut plot = vec![0u8; NONCE_SIZE];
    noncegen::<1>(&mut plot, 55, 321, 1);

    let gensig = [0x7au8; HASH_SIZE];
    for &scoop in &[0u64, 1, 2047, 4094, 4095] {
        let u1_base = scoop as usize * SCOOP_SIZE;
        let mirror_base = (SCOOPS_PER_NONCE - 1 - scoop as usize) * SCOOP_SIZE;
        let mut message = vec![0u8; HASH_SIZE + SCOOP_SIZE];
        message[..HASH_SIZE].copy_from_slice(&gensig);
        message[HASH_SIZE..2 * HASH_SIZE].copy_from_slice(&plot[u1_base..u1_base + HASH_SIZE]);
        message[2 * HASH_SIZE..].copy_from_slice(
            &plot[mirror_base + HASH_SIZE..mirror_base + SCOOP_SIZE],
        );

        let expected = u64::from_be_bytes(shabal256(&message)[..8].try_into().unwrap());
        assert_eq!(scoop_deadline(&plot, scoop, &gensig), expected);
    }
}

#[test]
fn find_best_deadline_is_order_independent_and_picks_minimum() {
    let gensig = [0xABu8; HASH_SIZE];
    let mut plots = vec![0u8; 4 * NONCE_SIZE];
    noncegen::<4>(&mut plots, 99, 5000, 4);

    let (deadline_all, offset_all) = find_best_deadline::<4>(&plots, 10, 4, &gensig, u64::MAX, 0);

    // Scanning each nonce individually (W = 1) and taking the true minimum
    // by hand must agree with the batched W = 4 scan.
    let mut manual_best = u64::MAX;
    let mut manual_offset = 0u64;
    for i in 0..4u64 {
        let plot = &plots[(i as usize) * NONCE_SIZE..(i as usize + 1) * NONCE_SIZE];
        let (d, _) = find_best_deadline::<1>(plot, 10, 1, &gensig, u64::MAX, 0);
        if d < manual_best {
            manual_best = d;
            manual_offset = i;
        }
    }

    assert_eq!(deadline_all, manual_best);
    assert_eq!(offset_all, manual_offset);
}

#[test]
fn find_best_deadline_ties_break_to_lowest_offset() {
    // Two nonces cloned from the same source plot produce identical
    // deadlines; the scan must report the lower offset as the winner.
    let gensig = [0x11u8; HASH_SIZE];
    let mut single = vec![0u8; NONCE_SIZE];
    noncegen::<1>(&mut single, 3, 0, 1);

    let mut batch = vec![0u8; 2 * NONCE_SIZE];
    batch[..NONCE_SIZE].copy_from_slice(&single);
    batch[NONCE_SIZE..].copy_from_slice(&single);

    let (_, offset) = find_best_deadline::<2>(&batch, 50, 2, &gensig, u64::MAX, 0);
    assert_eq!(offset, 0);
}

#[test]
fn find_best_deadline_honors_caller_supplied_running_best() {
    // A caller accumulating a best across several scans must not have a
    // better prior result clobbered by a worse one from a later call.
    let gensig = [0x22u8; HASH_SIZE];
    let mut plots = vec![0u8; 2 * NONCE_SIZE];
    noncegen::<2>(&mut plots, 4, 9000, 2);

    let (fresh_best, _) = find_best_deadline::<2>(&plots, 20, 2, &gensig, u64::MAX, 0);
    let prior_best = fresh_best.saturating_sub(1).max(1);

    let (kept, offset) = find_best_deadline::<2>(&plots, 20, 2, &gensig, prior_best, 99);
    assert_eq!(kept, prior_best, "a strictly better prior best must survive the scan");
    assert_eq!(offset, 99, "best_offset must stay paired with the surviving best_deadline");
}

#[test]
fn noncegen_matches_pinned_reference_plot() {
    // A regression fixture, not a self-consistency check: the expected bytes
    // were computed once from a from-scratch reimplementation of this
    // module's algorithm (independent of this crate's own Rust source) and
    // are pinned here so that a future change to the chain construction or
    // the Shabal permutation — the kind of bug that only self-referential
    // tests miss — shows up as a diff against these fixed constants instead
    // of silently passing.
    use sha2::{Digest, Sha256};

    let mut plot = vec![0u8; NONCE_SIZE];
    noncegen::<1>(&mut plot, 0, 0, 1);

    let expected_head =
        hex_decode("9e48db1b8147e2c429d33e197c69e168682e2b90656a2e21a135afe8da60afdf");
    assert_eq!(&plot[..HASH_SIZE], &expected_head[..], "first 32 bytes of the plot diverged");

    let digest = Sha256::digest(&plot);
    let expected_sha256 =
        hex_decode("5c3ce92affddd9bcf691b572a846cd5411246a17df0652d30298ee891c3ba9d7");
    assert_eq!(&digest[..], &expected_sha256[..], "whole-plot SHA-256 diverged");
}

#[test]
fn dispatch_table_has_each_supported_width_exactly_once() {
    use crate::dispatch::{block_bytes, SUPPORTED_LANE_WIDTHS};

    let mut sorted: alloc::vec::Vec<usize> = SUPPORTED_LANE_WIDTHS.iter().map(|w| w.lanes).collect();
    let mut expected = vec![4usize, 8, 16];
    sorted.sort_unstable();
    expected.sort_unstable();
    assert_eq!(sorted, expected, "lane widths must be exactly {{4, 8, 16}}, no repeats");

    for w in SUPPORTED_LANE_WIDTHS {
        assert_eq!(block_bytes(w.lanes), 64 * w.lanes);
        // Each modeled width is a real SIMD register size: 32 bits per lane.
        assert_eq!(w.vector_bits, 32 * w.lanes);
    }
}

#[cfg(feature = "std")]
#[test]
fn ffi_exports_round_trip_through_the_safe_api() {
    use crate::ffi::{
        poc2_find_best_deadline_w4, poc2_noncegen_w4, poc2_shabal256,
    };

    let n = 4usize;
    let mut cache_ffi = vec![0u8; n * NONCE_SIZE];
    unsafe {
        poc2_noncegen_w4(cache_ffi.as_mut_ptr(), 9, 4000, n as u64);
    }
    let mut cache_safe = vec![0u8; n * NONCE_SIZE];
    noncegen::<4>(&mut cache_safe, 9, 4000, n);
    assert_eq!(cache_ffi, cache_safe, "FFI noncegen export must match the safe entry point");

    let gensig = [0x5Cu8; HASH_SIZE];
    let (expected_deadline, expected_offset) =
        find_best_deadline::<4>(&cache_safe, 17, n, &gensig, u64::MAX, 0);
    let mut ffi_deadline = u64::MAX;
    let mut ffi_offset = 0u64;
    unsafe {
        poc2_find_best_deadline_w4(
            cache_ffi.as_ptr(),
            17,
            n as u64,
            gensig.as_ptr(),
            &mut ffi_deadline,
            &mut ffi_offset,
        );
    }
    assert_eq!(ffi_deadline, expected_deadline);
    assert_eq!(ffi_offset, expected_offset);

    let mut digest_ffi = [0u8; HASH_SIZE];
    unsafe {
        poc2_shabal256(b"ffi round trip".as_ptr(), 15, digest_ffi.as_mut_ptr());
    }
    assert_eq!(digest_ffi, shabal256(b"ffi round trip"));
}

#[cfg(feature = "std")]
#[test]
fn checked_entry_points_reject_bad_input() {
    use crate::deadline::find_best_deadline_checked;
    use crate::error::PrecheckError;
    use crate::noncegen::noncegen_checked;

    let mut buf = vec![0u8; 3 * NONCE_SIZE];
    let err = noncegen_checked::<4>(&mut buf, 1, 0, 3).unwrap_err();
    assert_eq!(
        err,
        PrecheckError::NonceCountNotLaneAligned { nonces: 3, lanes: 4 }
    );

    let gensig = [0u8; HASH_SIZE];
    let err = find_best_deadline_checked::<1>(
        &[0u8; NONCE_SIZE],
        SCOOPS_PER_NONCE as u64,
        1,
        &gensig,
        u64::MAX,
        0,
    )
    .unwrap_err();
    assert_eq!(
        err,
        PrecheckError::ScoopOutOfRange {
            scoop: SCOOPS_PER_NONCE as u64,
            limit: SCOOPS_PER_NONCE as u64
        }
    );
}
