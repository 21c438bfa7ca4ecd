//! Lane compaction helpers.
//!
//! Packing the selected lanes of an 8-byte group to the front is the core step
//! of byte removal and of escaping. Each helper stores a full 8 bytes at `out`
//! and returns how many of them are meaningful, so callers must leave 8 bytes
//! of writable space past their logical cursor.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use super::tables::COMPRESS_TABLE;

// === x86_64 implementations ===

/// Pack the low 8 lanes of `v` selected by `mask` and store them at `out`.
///
/// # Safety
///
/// Requires SSSE3 and 8 writable bytes at `out`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
#[inline]
pub(crate) unsafe fn compress8_ssse3(v: __m128i, mask: u8, out: *mut u8) -> usize {
    unsafe {
        let shuffle = _mm_loadl_epi64(COMPRESS_TABLE[mask as usize].as_ptr() as *const __m128i);
        let packed = _mm_shuffle_epi8(v, shuffle);
        _mm_storel_epi64(out as *mut __m128i, packed);
    }
    mask.count_ones() as usize
}

// === aarch64 implementations ===

/// Collapse an 8-lane comparison result (lanes all-zero or all-one) into a
/// bitmask, lane `i` becoming bit `i`.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
pub(crate) unsafe fn movemask_u8x8(v: uint8x8_t) -> u8 {
    // Lane i keeps only bit i; the horizontal sum then equals the OR.
    const LANE_BITS: u64 = 0x8040_2010_0804_0201;
    unsafe {
        let bits = vand_u8(v, vcreate_u8(LANE_BITS));
        vaddv_u8(bits)
    }
}

/// Pack the lanes of `v` selected by `mask` and store them at `out`.
///
/// # Safety
///
/// Requires NEON and 8 writable bytes at `out`.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
pub(crate) unsafe fn compress8_neon(v: uint8x8_t, mask: u8, out: *mut u8) -> usize {
    unsafe {
        let shuffle = vld1_u8(COMPRESS_TABLE[mask as usize].as_ptr());
        let packed = vtbl1_u8(v, shuffle);
        vst1_u8(out, packed);
    }
    mask.count_ones() as usize
}
