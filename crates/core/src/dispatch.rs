//! Lane-width capability table.
//!
//! This crate does not pick a SIMD width for the caller and does not probe
//! CPU features itself — [`crate::engine::ShabalEngine`] is generic over
//! `W` and it is the caller's job to monomorphize `noncegen`/
//! `find_best_deadline` at the widths its target supports and select among
//! them at startup (e.g. with `std::is_x86_feature_detected!`, mirroring the
//! dispatch pattern common across this codebase's SIMD-adjacent modules).
//! What lives here is purely descriptive: the fixed correspondence between
//! lane count and the vector width it is meant to model, for a caller
//! building that selection table.
use crate::constants::SHABAL_BLOCK;

/// One entry in the lane-width capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneWidth {
    /// Number of parallel Shabal-256 lanes.
    pub lanes: usize,
    /// The vector register width this lane count is meant to occupy, in bits.
    pub vector_bits: usize,
}

/// The lane widths this crate models: 128-bit (4 lanes), 256-bit (8 lanes)
/// and 512-bit (16 lanes) — one 32-bit word per lane per vector element.
pub const SUPPORTED_LANE_WIDTHS: &[LaneWidth] = &[
    LaneWidth {
        lanes: 4,
        vector_bits: 128,
    },
    LaneWidth {
        lanes: 8,
        vector_bits: 256,
    },
    LaneWidth {
        lanes: 16,
        vector_bits: 512,
    },
];

/// Bytes one [`crate::layout::InterleavedBlock`] occupies at a given lane count.
pub const fn block_bytes(lanes: usize) -> usize {
    SHABAL_BLOCK * lanes
}
