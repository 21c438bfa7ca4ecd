//! ASCII lowercase conversion
//!
//! Maps `A..=Z` to `a..=z` and leaves every other byte, including non-ASCII
//! bytes, untouched. The vector kernels build an "is uppercase" mask with two
//! range comparisons and add `0x20` under that mask, so the loop body is
//! branch-free.
//!
//! # Examples
//!
//! ```rust
//! use scratchpad::transform::lowercase::{ascii_tolower, make_ascii_lowercase};
//!
//! assert_eq!(ascii_tolower(b"Hello WORLD 42!"), b"hello world 42!");
//!
//! let mut buf = *b"MiXeD";
//! make_ascii_lowercase(&mut buf);
//! assert_eq!(&buf, b"mixed");
//! ```

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

#[allow(unused_imports)]
use crate::common::simd::{CpuFeatures, cpu_features};

/// Number of 16-byte NEON registers processed per loop iteration.
///
/// Only the NEON kernel honours it; x86 kernels use one register of their
/// native width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unroll {
    /// 16 bytes per iteration
    X1,
    /// 32 bytes per iteration
    X2,
    /// 64 bytes per iteration
    #[default]
    X4,
}

impl Unroll {
    /// Bytes consumed per loop iteration.
    pub const fn bytes_per_iter(self) -> usize {
        match self {
            Unroll::X1 => 16,
            Unroll::X2 => 32,
            Unroll::X4 => 64,
        }
    }
}

/// Lowercase a single ASCII byte.
#[inline(never)]
pub fn to_lower_scalar(byte: u8) -> u8 {
    if byte.is_ascii_uppercase() {
        byte + (b'a' - b'A')
    } else {
        byte
    }
}

/// Scalar baseline.
///
/// Marked `#[inline(never)]` and built on the non-inlined byte routine so the
/// compiler cannot auto-vectorize it.
#[inline(never)]
pub fn ascii_tolower_scalar(buffer: &[u8]) -> Vec<u8> {
    let mut result = vec![0u8; buffer.len()];
    for i in 0..buffer.len() {
        result[i] = to_lower_scalar(buffer[i]);
    }
    result
}

/// Lowercase `buffer` into a new vector using the best available kernel.
#[inline]
pub fn ascii_tolower(buffer: &[u8]) -> Vec<u8> {
    ascii_tolower_with(buffer, Unroll::default())
}

/// Lowercase `buffer` into a new vector, choosing the NEON unroll factor.
pub fn ascii_tolower_with(buffer: &[u8], unroll: Unroll) -> Vec<u8> {
    let mut result = vec![0u8; buffer.len()];
    // SAFETY: both pointers are valid for buffer.len() bytes and do not overlap.
    unsafe { tolower_dispatch(buffer.as_ptr(), result.as_mut_ptr(), buffer.len(), unroll) };
    result
}

/// Lowercase `buffer` in place using the best available kernel.
pub fn make_ascii_lowercase(buffer: &mut [u8]) {
    let ptr = buffer.as_mut_ptr();
    // SAFETY: every kernel loads a block before storing it, so src == dst is fine.
    unsafe { tolower_dispatch(ptr, ptr, buffer.len(), Unroll::default()) };
}

/// # Safety
///
/// `src` must be readable and `dst` writable for `len` bytes. The ranges may
/// be identical but must not partially overlap.
unsafe fn tolower_dispatch(src: *const u8, dst: *mut u8, len: usize, unroll: Unroll) {
    let features = cpu_features();

    #[cfg(target_arch = "x86_64")]
    {
        let _ = unroll;
        if features.contains(CpuFeatures::AVX2) {
            unsafe { tolower_avx2(src, dst, len) };
        } else if features.contains(CpuFeatures::SSE2) {
            unsafe { tolower_sse2(src, dst, len) };
        } else {
            unsafe { tolower_tail(src, dst, 0, len) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if features.contains(CpuFeatures::NEON) {
            unsafe { tolower_neon(src, dst, len, unroll) };
        } else {
            unsafe { tolower_tail(src, dst, 0, len) };
        }
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        let _ = (features, unroll);
        unsafe { tolower_tail(src, dst, 0, len) };
    }
}

/// Scalar completion for bytes `from..len`.
#[inline]
unsafe fn tolower_tail(src: *const u8, dst: *mut u8, from: usize, len: usize) {
    for i in from..len {
        unsafe { *dst.add(i) = to_lower_scalar(*src.add(i)) };
    }
}

// === x86_64 implementations ===

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn tolower_sse2(src: *const u8, dst: *mut u8, len: usize) {
    let mut i = 0;

    // Signed compares: bytes >= 0x80 are negative and never fall in range.
    let above = _mm_set1_epi8((b'A' - 1) as i8);
    let below = _mm_set1_epi8((b'Z' + 1) as i8);
    let delta = _mm_set1_epi8((b'a' - b'A') as i8);

    while i + 16 <= len {
        unsafe {
            let chunk = _mm_loadu_si128(src.add(i) as *const __m128i);
            let is_upper = _mm_and_si128(_mm_cmpgt_epi8(chunk, above), _mm_cmplt_epi8(chunk, below));
            let lowered = _mm_add_epi8(chunk, _mm_and_si128(is_upper, delta));
            _mm_storeu_si128(dst.add(i) as *mut __m128i, lowered);
        }
        i += 16;
    }

    unsafe { tolower_tail(src, dst, i, len) };
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn tolower_avx2(src: *const u8, dst: *mut u8, len: usize) {
    let mut i = 0;

    let above = _mm256_set1_epi8((b'A' - 1) as i8);
    let below = _mm256_set1_epi8((b'Z' + 1) as i8);
    let delta = _mm256_set1_epi8((b'a' - b'A') as i8);

    while i + 32 <= len {
        unsafe {
            let chunk = _mm256_loadu_si256(src.add(i) as *const __m256i);
            let is_upper = _mm256_and_si256(
                _mm256_cmpgt_epi8(chunk, above),
                _mm256_cmpgt_epi8(below, chunk),
            );
            let lowered = _mm256_add_epi8(chunk, _mm256_and_si256(is_upper, delta));
            _mm256_storeu_si256(dst.add(i) as *mut __m256i, lowered);
        }
        i += 32;
    }

    // One 16-byte step before the scalar tail
    if i + 16 <= len {
        unsafe { tolower_sse2(src.add(i), dst.add(i), 16) };
        i += 16;
    }

    unsafe { tolower_tail(src, dst, i, len) };
}

// === aarch64 implementations ===

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
unsafe fn tolower16(c: uint8x16_t) -> uint8x16_t {
    let is_upper = vandq_u8(vcgeq_u8(c, vdupq_n_u8(b'A')), vcleq_u8(c, vdupq_n_u8(b'Z')));
    vaddq_u8(c, vandq_u8(is_upper, vdupq_n_u8(b'a' - b'A')))
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn tolower_neon(src: *const u8, dst: *mut u8, len: usize, unroll: Unroll) {
    let step = unroll.bytes_per_iter();
    let mut i = 0;

    while i + step <= len {
        let mut offset = 0;
        while offset < step {
            unsafe {
                let chunk = vld1q_u8(src.add(i + offset));
                vst1q_u8(dst.add(i + offset), tolower16(chunk));
            }
            offset += 16;
        }
        i += step;
    }

    // Leftover whole registers when unrolled
    while i + 16 <= len {
        unsafe { vst1q_u8(dst.add(i), tolower16(vld1q_u8(src.add(i)))) };
        i += 16;
    }

    unsafe { tolower_tail(src, dst, i, len) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MIXED: &[u8] = b"The Quick BROWN Fox Jumps Over The Lazy DOG, 0123456789 @[`{ \xC3\x89\xFF";

    fn mixed_input(len: usize) -> Vec<u8> {
        MIXED.iter().cycle().take(len).copied().collect()
    }

    #[test]
    fn test_scalar_lowercase() {
        assert_eq!(to_lower_scalar(b'a'), b'a');
        assert_eq!(to_lower_scalar(b'z'), b'z');
    }

    #[test]
    fn test_scalar_uppercase() {
        assert_eq!(to_lower_scalar(b'A'), b'a');
        assert_eq!(to_lower_scalar(b'Z'), b'z');
        assert_eq!(to_lower_scalar(b'M'), b'm');
    }

    #[test]
    fn test_scalar_non_alpha() {
        for byte in [b'0', b'9', b' ', b'!', b'@', b'[', b'`', b'{', 0x80, 0xC1, 0xFF] {
            assert_eq!(to_lower_scalar(byte), byte);
        }
    }

    #[test]
    fn test_scalar_buffer() {
        assert_eq!(ascii_tolower_scalar(b"Hello World!"), b"hello world!");
        assert_eq!(
            ascii_tolower_scalar(b"The Quick BROWN Fox Jumps Over 123!"),
            b"the quick brown fox jumps over 123!"
        );
    }

    #[test]
    fn test_dispatch_boundary_characters() {
        // Characters around 'A' and 'Z', padded past one vector width
        let input = b"@ABC[\\]^_`abc{@ABC[\\]^_`abc{@ABC[\\]^_`abc{";
        let expected = b"@abc[\\]^_`abc{@abc[\\]^_`abc{@abc[\\]^_`abc{";
        assert_eq!(ascii_tolower(input), expected);
    }

    #[test]
    fn test_dispatch_matches_scalar_all_lengths() {
        for len in 0..200 {
            let input = mixed_input(len);
            let expected = ascii_tolower_scalar(&input);
            for unroll in [Unroll::X1, Unroll::X2, Unroll::X4] {
                assert_eq!(ascii_tolower_with(&input, unroll), expected, "len {len}, {unroll:?}");
            }
        }
    }

    #[test]
    fn test_in_place_matches_scalar() {
        for len in [0, 1, 15, 16, 17, 31, 32, 33, 63, 64, 65, 1000] {
            let input = mixed_input(len);
            let mut buf = input.clone();
            make_ascii_lowercase(&mut buf);
            assert_eq!(buf, ascii_tolower_scalar(&input), "len {len}");
        }
    }

    #[test]
    fn test_agrees_with_std() {
        let input = mixed_input(777);
        assert_eq!(ascii_tolower(&input), input.to_ascii_lowercase());
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_sse2_matches_scalar() {
        let input = mixed_input(131);
        let mut out = vec![0u8; input.len()];
        unsafe { tolower_sse2(input.as_ptr(), out.as_mut_ptr(), input.len()) };
        assert_eq!(out, ascii_tolower_scalar(&input));
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_avx2_matches_scalar() {
        if !is_x86_feature_detected!("avx2") {
            return;
        }
        let input = mixed_input(131);
        let mut out = vec![0u8; input.len()];
        unsafe { tolower_avx2(input.as_ptr(), out.as_mut_ptr(), input.len()) };
        assert_eq!(out, ascii_tolower_scalar(&input));
    }

    proptest! {
        #[test]
        fn prop_dispatch_matches_scalar(input in proptest::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(ascii_tolower(&input), ascii_tolower_scalar(&input));
        }
    }
}
