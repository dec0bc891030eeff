//! The M-way Shabal-256 compression engine.
//!
//! [`ShabalEngine`] is generic over a const lane count `W`. `W = 1` is the
//! scalar reference used by [`crate::shabal`] and by the differential tests;
//! `W ∈ {4, 8, 16}` are the 128/256/512-bit vector widths a caller picks via
//! [`crate::dispatch`] according to the CPU it is running on.
//!
//! ENGINEERING TRADEOFF: the straightforward way to hit those widths is a
//! trio of hand-written `core::arch` kernels (one per ISA) built around
//! 128/256/512-bit shuffles. That code cannot be checked without a compiler
//! and a vector unit to run it on, and a single mis-indexed shuffle would
//! silently corrupt every plot generated with it. Instead the lane dimension
//! is carried as an array axis on every state word (`[u32; W]`), so a single
//! generic implementation serves every width: the compiler's auto-vectorizer
//! has a fixed-size, alignment-friendly loop to work with, and the same
//! source backs `W = 1` (which must stay scalar-identical for differential
//! tests) and `W = 16`. Bit-exactness across lane counts — one of this
//! crate's core invariants — falls out of construction rather than needing
//! to be independently re-verified per ISA.
use crate::layout::InterleavedBlock;

/// Number of words in the A register.
const A_WORDS: usize = 12;
/// Number of words in the B and C registers.
const BC_WORDS: usize = 16;

/// One Shabal-256 state, replicated across `W` independent lanes.
///
/// Lanes share a single 64-bit block counter: every call advances all lanes
/// by the same number of blocks in lockstep, so there is nothing to gain by
/// tracking the counter per-lane.
#[derive(Clone)]
pub struct ShabalEngine<const W: usize> {
    a: [[u32; W]; A_WORDS],
    b: [[u32; W]; BC_WORDS],
    c: [[u32; W]; BC_WORDS],
    wlow: u32,
    whigh: u32,
}

impl<const W: usize> ShabalEngine<W> {
    /// An all-zero state with the counter at its initial `(Wlow, Whigh) = (1, 0)`.
    /// Used only as the starting point for [`Self::broadcast`].
    fn zeroed() -> Self {
        ShabalEngine {
            a: [[0u32; W]; A_WORDS],
            b: [[0u32; W]; BC_WORDS],
            c: [[0u32; W]; BC_WORDS],
            wlow: 1,
            whigh: 0,
        }
    }

    /// Broadcasts a scalar IV (identical across all `W` lanes) into a fresh engine.
    pub(crate) fn broadcast(a: &[u32; A_WORDS], b: &[u32; BC_WORDS], c: &[u32; BC_WORDS]) -> Self {
        let mut out = ShabalEngine::zeroed();
        for i in 0..A_WORDS {
            out.a[i] = [a[i]; W];
        }
        for i in 0..BC_WORDS {
            out.b[i] = [b[i]; W];
            out.c[i] = [c[i]; W];
        }
        out
    }

    /// The 48-step, 3-pass Shabal permutation, reading message words from `block`.
    ///
    /// Before the three passes, every `B` word is rotated left by 17 bits
    /// once (not once per pass). After the three passes, `C` is whitened
    /// back into `A` in three sub-passes of 12 adds each, offset by 11, 7
    /// and 3 words respectively (36 adds total) — both steps are part of
    /// Shabal's `P` function, not just the 48-round `PERM_ELT` core.
    fn permute(&mut self, block: &InterleavedBlock<W>) {
        for bw in self.b.iter_mut() {
            for k in 0..W {
                bw[k] = bw[k].rotate_left(17);
            }
        }

        for _pass in 0..3 {
            for i in 0..16 {
                let ai = i % A_WORDS;
                let ai_prev = (ai + A_WORDS - 1) % A_WORDS;
                let b0 = i % BC_WORDS;
                let b1 = (b0 + 13) % BC_WORDS;
                let b2 = (b0 + 10) % BC_WORDS;
                let b3 = (b0 + 7) % BC_WORDS;
                let cc = (BC_WORDS - 1 - i % BC_WORDS) % BC_WORDS;
                let m = block.word(i % 16);

                for k in 0..W {
                    let new_a = (self.a[ai][k]
                        ^ self.a[ai_prev][k].rotate_left(15).wrapping_mul(5)
                        ^ self.c[cc][k])
                        .wrapping_mul(3)
                        ^ self.b[b1][k]
                        ^ (self.b[b2][k] & !self.b[b3][k])
                        ^ m[k];
                    self.a[ai][k] = new_a;
                    self.b[b0][k] = !(self.b[b0][k].rotate_left(1)) ^ new_a;
                }
            }
        }

        for offset in [11usize, 7, 3] {
            for i in 0..A_WORDS {
                let cc = (i + offset) % BC_WORDS;
                for k in 0..W {
                    self.a[i][k] = self.a[i][k].wrapping_add(self.c[cc][k]);
                }
            }
        }
    }

    /// One full compression round: `B += M`, xor in the counter, permute,
    /// `C -= M`, swap `B`/`C`, advance the counter.
    pub(crate) fn compress_block(&mut self, block: &InterleavedBlock<W>) {
        for w in 0..BC_WORDS {
            let m = block.word(w);
            for k in 0..W {
                self.b[w][k] = self.b[w][k].wrapping_add(m[k]);
            }
        }
        for k in 0..W {
            self.a[0][k] ^= self.wlow;
            self.a[1][k] ^= self.whigh;
        }

        self.permute(block);

        for w in 0..BC_WORDS {
            let m = block.word(w);
            for k in 0..W {
                self.c[w][k] = self.c[w][k].wrapping_sub(m[k]);
            }
        }
        core::mem::swap(&mut self.b, &mut self.c);

        self.wlow = self.wlow.wrapping_add(1);
        if self.wlow == 0 {
            self.whigh = self.whigh.wrapping_add(1);
        }
    }

    /// Runs Shabal's finalization "whitening": the padded final block is
    /// compressed three more times, each a full round (`B += M`, counter
    /// xor'd in, permute, `C -= M`, swap, counter advanced) against the
    /// *same* block content — not a bare permutation. Writes the digest to
    /// `out` afterward.
    fn finalize(&mut self, last: &InterleavedBlock<W>, out: &mut InterleavedBlock<W>) {
        for _ in 0..3 {
            self.compress_block(last);
        }
        self.extract(out);
    }

    /// Writes the 256-bit digest (the last 8 words of `C`) to `out`.
    ///
    /// `out` only needs its first 8 words populated (32 bytes); the
    /// remaining words are zeroed so the whole block can still be reused as
    /// an [`InterleavedBlock`] elsewhere if a caller wants the full 64 bytes.
    fn extract(&self, out: &mut InterleavedBlock<W>) {
        for i in 0..8 {
            *out.word_mut(i) = self.c[BC_WORDS - 8 + i];
        }
        for i in 8..16 {
            *out.word_mut(i) = [0u32; W];
        }
    }

    /// The fast-path Shabal-256 call backing both [`crate::noncegen`] and
    /// [`crate::deadline`]: absorbs `nblocks - 1` complete blocks from
    /// `in_opt` (already living in the plot cache, no padding needed), then
    /// absorbs `term` — a caller-supplied block that carries whatever
    /// padding the round requires — as the final block, and replays the
    /// whitening finalization (three more full rounds against `term`)
    /// before extracting the digest.
    ///
    /// The block counter advances `nblocks` times for the absorption proper,
    /// plus three more during the finalization replay; since every round
    /// starts from a fresh clone of the global IV, this final counter value
    /// is never observed outside of the digest it produces.
    pub fn vhash_fast(
        &mut self,
        in_opt: Option<&[InterleavedBlock<W>]>,
        term: &InterleavedBlock<W>,
        out: &mut InterleavedBlock<W>,
        nblocks: usize,
    ) {
        debug_assert!(nblocks >= 1);
        if let Some(blocks) = in_opt {
            debug_assert_eq!(blocks.len(), nblocks - 1);
            for blk in blocks {
                self.compress_block(blk);
            }
        } else {
            debug_assert_eq!(nblocks, 1);
        }
        self.compress_block(term);
        self.finalize(term, out);
    }
}
