//! In-place removal of one byte value
//!
//! The vector kernels compare a 16-byte block against the target, turn the
//! inverted comparison into two 8-bit keep-masks and pack each half with a
//! shuffle from [`COMPRESS_TABLE`](crate::common::simd::tables::COMPRESS_TABLE).
//! The write cursor never overtakes the read cursor, so compaction happens in
//! the input buffer itself.
//!
//! # Examples
//!
//! ```rust
//! use scratchpad::transform::remove::remove_byte;
//!
//! let mut data = *b"a,b,,c";
//! let len = remove_byte(&mut data, b',');
//! assert_eq!(&data[..len], b"abc");
//! ```

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

#[cfg(target_arch = "aarch64")]
use crate::common::simd::compress::{compress8_neon, movemask_u8x8};
#[cfg(target_arch = "x86_64")]
use crate::common::simd::compress::compress8_ssse3;
#[allow(unused_imports)]
use crate::common::simd::{CpuFeatures, cpu_features};

/// Scalar baseline.
///
/// Returns the number of kept bytes; `buf[..len]` holds them in their
/// original order and the bytes after `len` are unspecified.
pub fn remove_byte_scalar(buf: &mut [u8], rem: u8) -> usize {
    let mut out = 0;
    for i in 0..buf.len() {
        let b = buf[i];
        if b != rem {
            buf[out] = b;
            out += 1;
        }
    }
    out
}

/// Remove every `rem` from `buf` in place using the best available kernel.
///
/// Same contract as [`remove_byte_scalar`]. The prefix before the first
/// occurrence is located with `memchr` and never rewritten; a buffer without
/// `rem` is left untouched.
pub fn remove_byte(buf: &mut [u8], rem: u8) -> usize {
    let Some(first) = memchr::memchr(rem, buf) else {
        return buf.len();
    };
    first + remove_byte_dispatch(&mut buf[first..], rem)
}

/// Remove every `rem` from `buf` and truncate it to the kept bytes.
pub fn remove_byte_vec(buf: &mut Vec<u8>, rem: u8) {
    let len = remove_byte(buf, rem);
    buf.truncate(len);
}

fn remove_byte_dispatch(buf: &mut [u8], rem: u8) -> usize {
    let features = cpu_features();

    #[cfg(target_arch = "x86_64")]
    {
        if features.contains(CpuFeatures::SSSE3) {
            return unsafe { remove_byte_ssse3(buf, rem) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if features.contains(CpuFeatures::NEON) {
            return unsafe { remove_byte_neon(buf, rem) };
        }
    }

    let _ = features;
    remove_byte_scalar(buf, rem)
}

/// Scalar completion starting at `read`/`write`; returns the final length.
#[inline]
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
unsafe fn remove_byte_tail(base: *mut u8, len: usize, mut read: usize, mut write: usize, rem: u8) -> usize {
    while read < len {
        unsafe {
            let b = *base.add(read);
            if b != rem {
                *base.add(write) = b;
                write += 1;
            }
        }
        read += 1;
    }
    write
}

// === x86_64 implementations ===

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
unsafe fn remove_byte_ssse3(buf: &mut [u8], rem: u8) -> usize {
    let len = buf.len();
    let base = buf.as_mut_ptr();
    let mut read = 0;
    let mut write = 0;

    let needle = _mm_set1_epi8(rem as i8);

    // Both 8-byte stores end at or before read + 16.
    while read + 16 <= len {
        unsafe {
            let block = _mm_loadu_si128(base.add(read) as *const __m128i);
            let matches = _mm_movemask_epi8(_mm_cmpeq_epi8(block, needle)) as u32;
            let keep = !matches & 0xFFFF;

            write += compress8_ssse3(block, keep as u8, base.add(write));
            write += compress8_ssse3(_mm_srli_si128(block, 8), (keep >> 8) as u8, base.add(write));
        }
        read += 16;
    }

    unsafe { remove_byte_tail(base, len, read, write, rem) }
}

// === aarch64 implementations ===

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn remove_byte_neon(buf: &mut [u8], rem: u8) -> usize {
    let len = buf.len();
    let base = buf.as_mut_ptr();
    let mut read = 0;
    let mut write = 0;

    let needle = vdup_n_u8(rem);

    while read + 16 <= len {
        unsafe {
            let block = vld1q_u8(base.add(read));
            let lo = vget_low_u8(block);
            let hi = vget_high_u8(block);

            let keep_lo = movemask_u8x8(vmvn_u8(vceq_u8(lo, needle)));
            let keep_hi = movemask_u8x8(vmvn_u8(vceq_u8(hi, needle)));

            write += compress8_neon(lo, keep_lo, base.add(write));
            write += compress8_neon(hi, keep_hi, base.add(write));
        }
        read += 16;
    }

    unsafe { remove_byte_tail(base, len, read, write, rem) }
}
