//! Precondition errors.
//!
//! Every entry point in this crate has a documented precondition (buffer
//! lengths, scoop indices in range, lane counts matching nonce-batch sizes).
//! There is no recoverable error domain here — a violated precondition is a
//! caller bug, not a runtime condition — so the "fast" entry points only
//! `debug_assert!` them and the release build trusts the caller. The
//! `checked` wrappers in [`crate::noncegen`] and [`crate::deadline`] run the
//! same checks unconditionally and return [`PrecheckError`] instead of
//! panicking, for callers (FFI boundaries, CLIs) that would rather fail soft.
use core::fmt;

/// A violated precondition, returned only by the `checked` entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecheckError {
    /// A nonce count was not a multiple of the engine's lane count.
    NonceCountNotLaneAligned { nonces: usize, lanes: usize },
    /// A buffer was the wrong length for the operation requested of it.
    BufferLength { expected: usize, actual: usize },
    /// A scoop index was out of `0..SCOOPS_PER_NONCE`.
    ScoopOutOfRange { scoop: u64, limit: u64 },
    /// A nonce count was zero.
    ZeroNonces,
}

impl fmt::Display for PrecheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecheckError::NonceCountNotLaneAligned { nonces, lanes } => write!(
                f,
                "nonce count {nonces} is not a multiple of the lane count {lanes}"
            ),
            PrecheckError::BufferLength { expected, actual } => {
                write!(f, "expected a buffer of {expected} bytes, got {actual}")
            }
            PrecheckError::ScoopOutOfRange { scoop, limit } => {
                write!(f, "scoop {scoop} is out of range 0..{limit}")
            }
            PrecheckError::ZeroNonces => write!(f, "nonce count must be at least 1"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PrecheckError {}
