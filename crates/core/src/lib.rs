//! # poc2-core
//!
//! Shabal-256 plot generation and deadline scanning for Burst/Signum-style
//! proof-of-capacity storage miners.
//!
//! This crate implements four pieces:
//!
//! - [`shabal`] — the scalar Shabal-256 primitive (C1), a one-shot,
//!   arbitrary-length hash with standard Shabal padding.
//! - [`engine`] — [`engine::ShabalEngine`], an M-way vectorized Shabal
//!   engine generic over a lane count `W` (C2). `W = 1` is the scalar
//!   reference; `W ∈ {4, 8, 16}` model 128/256/512-bit SIMD.
//! - [`noncegen`] — the nonce generator (C3): for each nonce, an 8,192-hash
//!   chain folded back over itself, producing one 262,144-byte "plot" in
//!   hash-chain order, plus a final XOR pass over the whole thing.
//! - [`deadline`] — the deadline scanner (C4): reads a scoop's pair of
//!   hashes out of a batch of plots (the second half coming from that
//!   scoop's mirror) and reduces to the smallest deadline found.
//!
//! Everything here is programmer-contract, not recoverable-error, territory
//! — see [`error`] for the `debug_assert`-backed fast paths versus their
//! `checked` counterparts.
//!
//! ## Mining, wallets and networking are out of scope
//!
//! This crate generates plots and scores deadlines. It does not talk to a
//! pool or node, does not hold keys, and does not assemble or submit
//! blocks — all of that lives above this crate, in whatever miner links
//! against it.
//!
//! ## `no_std`
//!
//! ```toml
//! [dependencies]
//! poc2-core = { version = "0.2", default-features = false }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use poc2_core::{noncegen, find_best_deadline};
//!
//! const NONCE_SIZE: usize = poc2_core::NONCE_SIZE;
//!
//! let mut plot = vec![0u8; 4 * NONCE_SIZE];
//! noncegen::<4>(&mut plot, /* account id */ 1, /* start nonce */ 0, 4);
//!
//! let gensig = [0u8; 32];
//! let (deadline, offset) = find_best_deadline::<4>(&plot, 0, 4, &gensig, u64::MAX, 0);
//! assert!(offset < 4);
//! let _ = deadline;
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod constants;
pub mod context;
pub mod deadline;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod layout;
pub mod noncegen;
pub mod shabal;

#[cfg(feature = "std")]
mod ffi;

pub use constants::*;
pub use deadline::{find_best_deadline, find_best_deadline_checked, scoop_deadline};
pub use engine::ShabalEngine;
pub use error::PrecheckError;
pub use layout::{InterleavedBlock, PlotBuffer};
pub use noncegen::{noncegen, noncegen_checked};
#[cfg(feature = "parallel")]
pub use noncegen::noncegen_parallel;
pub use shabal::shabal256;

#[cfg(test)]
mod tests;
