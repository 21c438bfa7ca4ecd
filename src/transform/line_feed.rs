//! Line-feed insertion every `k` bytes
//!
//! Wraps a buffer into lines of width `k`: after every complete run of `k`
//! input bytes one `\n` is emitted. A trailing partial run gets no line feed,
//! so the output is `len + len / k` bytes long.
//!
//! The vector kernels pick a strategy from `k`:
//!
//! | `k`         | per line                                                    |
//! |-------------|-------------------------------------------------------------|
//! | `< 16`      | one 16-byte load, shuffle with an empty lane at `k`, blend `\n` |
//! | `16..32`    | lower 16 bytes copied, upper 16 shuffled with an empty lane at `k - 16` |
//! | `>= 32`     | whole-register copies, remainder copy, then `\n`            |
//!
//! Vector stores write up to 32 bytes past the logical cursor, so the output
//! is allocated with that much spare capacity. Loads never read past the input.
//!
//! # Examples
//!
//! ```rust
//! use scratchpad::transform::line_feed::insert_line_feed;
//!
//! assert_eq!(insert_line_feed(b"ABCDEFGHIJ", 3), b"ABC\nDEF\nGHI\nJ");
//! ```

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

#[allow(unused_imports)]
use crate::common::simd::tables::LINE_FEED_SHUFFLE;
#[allow(unused_imports)]
use crate::common::simd::{CpuFeatures, cpu_features};

/// Spare output capacity covering the widest vector store.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
const STORE_SLACK: usize = 32;

/// Output length for `len` input bytes wrapped at width `k`.
#[inline]
pub const fn wrapped_len(len: usize, k: usize) -> usize {
    if k == 0 { len } else { len + len / k }
}

/// Scalar baseline. `k == 0` returns an unchanged copy.
pub fn insert_line_feed_scalar(buffer: &[u8], k: usize) -> Vec<u8> {
    if k == 0 {
        return buffer.to_vec();
    }

    let mut output = Vec::with_capacity(wrapped_len(buffer.len(), k));
    let mut input_pos = 0;

    while input_pos + k <= buffer.len() {
        output.extend_from_slice(&buffer[input_pos..input_pos + k]);
        output.push(b'\n');
        input_pos += k;
    }

    output.extend_from_slice(&buffer[input_pos..]);
    output
}

/// Insert `\n` after every `k` bytes using the best available kernel.
pub fn insert_line_feed(buffer: &[u8], k: usize) -> Vec<u8> {
    if k == 0 {
        return buffer.to_vec();
    }

    let features = cpu_features();

    #[cfg(target_arch = "x86_64")]
    {
        if features.contains(CpuFeatures::SSSE3) {
            return unsafe { insert_line_feed_ssse3(buffer, k) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if features.contains(CpuFeatures::NEON) {
            return unsafe { insert_line_feed_neon(buffer, k) };
        }
    }

    let _ = features;
    insert_line_feed_scalar(buffer, k)
}

/// Insert a single `\n` at position `n` of a 32-byte block.
///
/// The result holds `input[..n]`, `\n`, `input[n..]`.
///
/// # Panics
///
/// Panics if `n > 32`.
pub fn insert_line_feed32(input: &[u8; 32], n: usize) -> [u8; 33] {
    assert!(n <= 32, "line feed position {n} is outside a 32-byte block");

    let features = cpu_features();

    #[cfg(target_arch = "x86_64")]
    {
        if features.contains(CpuFeatures::SSSE3) {
            return unsafe { insert_line_feed32_ssse3(input, n) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if features.contains(CpuFeatures::NEON) {
            return unsafe { insert_line_feed32_neon(input, n) };
        }
    }

    let _ = features;
    insert_line_feed32_scalar(input, n)
}

fn insert_line_feed32_scalar(input: &[u8; 32], n: usize) -> [u8; 33] {
    let mut output = [0u8; 33];
    output[..n].copy_from_slice(&input[..n]);
    output[n] = b'\n';
    output[n + 1..].copy_from_slice(&input[n..]);
    output
}

/// Finish the lines the vector loop could not reach, copy the partial run
/// and fix the length.
///
/// # Safety
///
/// `output` must have capacity for `wrapped_len(buffer.len(), k)` bytes and
/// hold initialized bytes up to `write`.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
unsafe fn finish_lines(buffer: &[u8], k: usize, mut read: usize, mut write: usize, output: &mut Vec<u8>) {
    let len = buffer.len();
    let src = buffer.as_ptr();
    let dst = output.as_mut_ptr();

    unsafe {
        while read + k <= len {
            std::ptr::copy_nonoverlapping(src.add(read), dst.add(write), k);
            *dst.add(write + k) = b'\n';
            read += k;
            write += k + 1;
        }

        let rest = len - read;
        std::ptr::copy_nonoverlapping(src.add(read), dst.add(write), rest);
        write += rest;

        debug_assert_eq!(write, wrapped_len(len, k));
        output.set_len(write);
    }
}

// === x86_64 implementations ===

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
#[inline]
unsafe fn blend_line_feed_ssse3(block: __m128i, shuffle: __m128i) -> __m128i {
    let is_lf = _mm_cmpeq_epi8(shuffle, _mm_set1_epi8(-1));
    let shuffled = _mm_shuffle_epi8(block, shuffle);
    _mm_or_si128(
        _mm_andnot_si128(is_lf, shuffled),
        _mm_and_si128(is_lf, _mm_set1_epi8(b'\n' as i8)),
    )
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
unsafe fn insert_line_feed_ssse3(buffer: &[u8], k: usize) -> Vec<u8> {
    let len = buffer.len();
    let mut output: Vec<u8> = Vec::with_capacity(wrapped_len(len, k) + STORE_SLACK);
    let src = buffer.as_ptr();
    let dst = output.as_mut_ptr();
    let mut read = 0;
    let mut write = 0;

    unsafe {
        if k < 16 {
            let shuffle = _mm_loadu_si128(LINE_FEED_SHUFFLE[k].as_ptr() as *const __m128i);
            while read + 16 <= len {
                let block = _mm_loadu_si128(src.add(read) as *const __m128i);
                _mm_storeu_si128(dst.add(write) as *mut __m128i, blend_line_feed_ssse3(block, shuffle));
                read += k;
                write += k + 1;
            }
        } else if k < 32 {
            let shuffle = _mm_loadu_si128(LINE_FEED_SHUFFLE[k - 16].as_ptr() as *const __m128i);
            while read + 32 <= len {
                let lower = _mm_loadu_si128(src.add(read) as *const __m128i);
                let upper = _mm_loadu_si128(src.add(read + 16) as *const __m128i);
                _mm_storeu_si128(dst.add(write) as *mut __m128i, lower);
                _mm_storeu_si128(dst.add(write + 16) as *mut __m128i, blend_line_feed_ssse3(upper, shuffle));
                read += k;
                write += k + 1;
            }
        } else {
            while read + k <= len {
                let mut remaining = k;
                while remaining >= 16 {
                    let block = _mm_loadu_si128(src.add(read) as *const __m128i);
                    _mm_storeu_si128(dst.add(write) as *mut __m128i, block);
                    read += 16;
                    write += 16;
                    remaining -= 16;
                }
                std::ptr::copy_nonoverlapping(src.add(read), dst.add(write), remaining);
                read += remaining;
                write += remaining;
                *dst.add(write) = b'\n';
                write += 1;
            }
        }

        finish_lines(buffer, k, read, write, &mut output);
    }

    output
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
unsafe fn insert_line_feed32_ssse3(input: &[u8; 32], n: usize) -> [u8; 33] {
    let mut output = [0u8; 33];

    unsafe {
        let lower = _mm_loadu_si128(input.as_ptr() as *const __m128i);
        let upper = _mm_loadu_si128(input.as_ptr().add(16) as *const __m128i);
        let out = output.as_mut_ptr();

        if n == 32 {
            _mm_storeu_si128(out as *mut __m128i, lower);
            _mm_storeu_si128(out.add(16) as *mut __m128i, upper);
            output[32] = b'\n';
        } else if n >= 16 {
            let shuffle = _mm_loadu_si128(LINE_FEED_SHUFFLE[n - 16].as_ptr() as *const __m128i);
            _mm_storeu_si128(out as *mut __m128i, lower);
            _mm_storeu_si128(out.add(16) as *mut __m128i, blend_line_feed_ssse3(upper, shuffle));
            output[32] = input[31];
        } else {
            let shuffle = _mm_loadu_si128(LINE_FEED_SHUFFLE[n].as_ptr() as *const __m128i);
            // input[15..31]: the byte pushed out of the lower half leads the upper half
            let shifted_upper = _mm_alignr_epi8(upper, lower, 15);
            _mm_storeu_si128(out as *mut __m128i, blend_line_feed_ssse3(lower, shuffle));
            _mm_storeu_si128(out.add(16) as *mut __m128i, shifted_upper);
            output[32] = input[31];
        }
    }

    output
}

// === aarch64 implementations ===

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
unsafe fn blend_line_feed_neon(block: uint8x16_t, shuffle: uint8x16_t) -> uint8x16_t {
    let is_lf = vceqq_u8(shuffle, vdupq_n_u8(0xFF));
    vbslq_u8(is_lf, vdupq_n_u8(b'\n'), vqtbl1q_u8(block, shuffle))
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn insert_line_feed_neon(buffer: &[u8], k: usize) -> Vec<u8> {
    let len = buffer.len();
    let mut output: Vec<u8> = Vec::with_capacity(wrapped_len(len, k) + STORE_SLACK);
    let src = buffer.as_ptr();
    let dst = output.as_mut_ptr();
    let mut read = 0;
    let mut write = 0;

    unsafe {
        if k < 16 {
            let shuffle = vld1q_u8(LINE_FEED_SHUFFLE[k].as_ptr());
            while read + 16 <= len {
                let block = vld1q_u8(src.add(read));
                vst1q_u8(dst.add(write), blend_line_feed_neon(block, shuffle));
                read += k;
                write += k + 1;
            }
        } else if k < 32 {
            let shuffle = vld1q_u8(LINE_FEED_SHUFFLE[k - 16].as_ptr());
            while read + 32 <= len {
                let lower = vld1q_u8(src.add(read));
                let upper = vld1q_u8(src.add(read + 16));
                vst1q_u8(dst.add(write), lower);
                vst1q_u8(dst.add(write + 16), blend_line_feed_neon(upper, shuffle));
                read += k;
                write += k + 1;
            }
        } else {
            while read + k <= len {
                let mut remaining = k;
                while remaining >= 32 {
                    vst1q_u8(dst.add(write), vld1q_u8(src.add(read)));
                    vst1q_u8(dst.add(write + 16), vld1q_u8(src.add(read + 16)));
                    read += 32;
                    write += 32;
                    remaining -= 32;
                }
                std::ptr::copy_nonoverlapping(src.add(read), dst.add(write), remaining);
                read += remaining;
                write += remaining;
                *dst.add(write) = b'\n';
                write += 1;
            }
        }

        finish_lines(buffer, k, read, write, &mut output);
    }

    output
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn insert_line_feed32_neon(input: &[u8; 32], n: usize) -> [u8; 33] {
    let mut output = [0u8; 33];

    unsafe {
        let lower = vld1q_u8(input.as_ptr());
        let upper = vld1q_u8(input.as_ptr().add(16));
        let out = output.as_mut_ptr();

        if n == 32 {
            vst1q_u8(out, lower);
            vst1q_u8(out.add(16), upper);
            output[32] = b'\n';
        } else if n >= 16 {
            let shuffle = vld1q_u8(LINE_FEED_SHUFFLE[n - 16].as_ptr());
            vst1q_u8(out, lower);
            vst1q_u8(out.add(16), blend_line_feed_neon(upper, shuffle));
            output[32] = input[31];
        } else {
            let shuffle = vld1q_u8(LINE_FEED_SHUFFLE[n].as_ptr());
            let shifted_upper = vextq_u8(lower, upper, 15);
            vst1q_u8(out, blend_line_feed_neon(lower, shuffle));
            vst1q_u8(out.add(16), shifted_upper);
            output[32] = input[31];
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn alphabet(len: usize) -> Vec<u8> {
        (0..len).map(|i| b'A' + (i % 26) as u8).collect()
    }

    #[test]
    fn test_scalar_basic() {
        let result = insert_line_feed_scalar(b"ABCDEFGHIJ", 3);
        assert_eq!(result, b"ABC\nDEF\nGHI\nJ");
    }

    #[test]
    fn test_exact_multiple_ends_with_line_feed() {
        assert_eq!(insert_line_feed(b"ABCDEF", 3), b"ABC\nDEF\n");
    }

    #[test]
    fn test_zero_width_copies() {
        assert_eq!(insert_line_feed(b"ABC", 0), b"ABC");
        assert_eq!(insert_line_feed_scalar(b"ABC", 0), b"ABC");
    }

    #[test]
    fn test_empty_input() {
        assert!(insert_line_feed(b"", 4).is_empty());
    }

    #[test]
    fn test_wrapped_len() {
        assert_eq!(wrapped_len(10, 3), 13);
        assert_eq!(wrapped_len(10, 0), 10);
        assert_eq!(wrapped_len(64, 64), 65);
    }

    #[test]
    fn test_matches_scalar_for_every_strategy() {
        for k in [1, 2, 3, 7, 15, 16, 17, 24, 31, 32, 33, 48, 64, 72, 128] {
            for len in [0, 1, 5, 15, 16, 17, 31, 32, 33, 63, 64, 65, 100, 257, 1000] {
                let input = alphabet(len);
                let expected = insert_line_feed_scalar(&input, k);
                let actual = insert_line_feed(&input, k);
                assert_eq!(actual.len(), wrapped_len(len, k));
                assert_eq!(actual, expected, "k {k}, len {len}");
            }
        }
    }

    #[test]
    fn test_insert_line_feed32_all_positions() {
        let input: [u8; 32] = std::array::from_fn(|i| b'a' + (i % 26) as u8);
        for n in 0..=32 {
            let result = insert_line_feed32(&input, n);
            assert_eq!(result, insert_line_feed32_scalar(&input, n), "n {n}");
            assert_eq!(result[n], b'\n');
            assert_eq!(&result[..n], &input[..n]);
            assert_eq!(&result[n + 1..], &input[n..]);
        }
    }

    #[test]
    #[should_panic(expected = "outside a 32-byte block")]
    fn test_insert_line_feed32_rejects_position() {
        insert_line_feed32(&[0u8; 32], 33);
    }

    proptest! {
        #[test]
        fn prop_matches_scalar(
            input in proptest::collection::vec(any::<u8>(), 0..600),
            k in 1usize..100,
        ) {
            prop_assert_eq!(insert_line_feed(&input, k), insert_line_feed_scalar(&input, k));
        }
    }
}
