//! C ABI surface.
//!
//! `extern "C" fn` cannot be generic, so each lane width gets its own
//! monomorphized export rather than one function taking `W` as a runtime
//! argument — a caller picks the symbol matching the vector width it
//! detected, the same shape as [`crate::dispatch::SUPPORTED_LANE_WIDTHS`].
use core::slice;

use crate::constants::{HASH_SIZE, NONCE_SIZE};
use crate::{deadline, noncegen};

macro_rules! export_lane_width {
    ($noncegen_fn:ident, $deadline_fn:ident, $lanes:literal) => {
        /// # Safety
        /// `cache` must point to `n * NONCE_SIZE` writable bytes.
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $noncegen_fn(
            cache: *mut u8,
            id: u64,
            start_nonce: u64,
            n: u64,
        ) {
            let n = n as usize;
            let buf = unsafe { slice::from_raw_parts_mut(cache, n * NONCE_SIZE) };
            noncegen::noncegen::<$lanes>(buf, id, start_nonce, n);
        }

        /// # Safety
        /// `data` must point to `n * NONCE_SIZE` readable bytes and `gensig`
        /// to `HASH_SIZE` readable bytes. `best_deadline`/`best_offset` must
        /// point to a readable-and-writable `u64` each: their incoming
        /// values seed the scan (a caller accumulating a running best across
        /// calls passes its current best in) and are overwritten only if
        /// this call improves on them.
        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn $deadline_fn(
            data: *const u8,
            scoop: u64,
            n: u64,
            gensig: *const u8,
            best_deadline: *mut u64,
            best_offset: *mut u64,
        ) {
            let n = n as usize;
            let buf = unsafe { slice::from_raw_parts(data, n * NONCE_SIZE) };
            let gensig_bytes = unsafe { slice::from_raw_parts(gensig, HASH_SIZE) };
            let gensig_arr: [u8; HASH_SIZE] = gensig_bytes.try_into().unwrap();
            let (init_deadline, init_offset) = unsafe { (*best_deadline, *best_offset) };
            let (deadline, offset) = deadline::find_best_deadline::<$lanes>(
                buf,
                scoop,
                n,
                &gensig_arr,
                init_deadline,
                init_offset,
            );
            unsafe {
                *best_deadline = deadline;
                *best_offset = offset;
            }
        }
    };
}

export_lane_width!(poc2_noncegen_w4, poc2_find_best_deadline_w4, 4);
export_lane_width!(poc2_noncegen_w8, poc2_find_best_deadline_w8, 8);
export_lane_width!(poc2_noncegen_w16, poc2_find_best_deadline_w16, 16);

/// # Safety
/// `out` must point to `HASH_SIZE` writable bytes; `message` to `len`
/// readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn poc2_shabal256(message: *const u8, len: u64, out: *mut u8) {
    let msg = unsafe { slice::from_raw_parts(message, len as usize) };
    let digest = crate::shabal::shabal256(msg);
    let out_buf = unsafe { slice::from_raw_parts_mut(out, HASH_SIZE) };
    out_buf.copy_from_slice(&digest);
}
