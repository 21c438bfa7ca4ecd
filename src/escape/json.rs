//! Quote and backslash escaping
//!
//! Every `"` and `\` is prefixed with a `\`; all other bytes, control bytes
//! included, are copied unchanged. Use [`detect`](super::detect) to find out
//! whether a buffer needs escaping at all.
//!
//! The vector kernels widen 8 input bytes to 16 lanes (`[b0, 0, b1, 0, ...]`),
//! replace even lanes holding a special byte with `\`, shift the input bytes
//! into the odd lanes and keep the odd lanes plus the escaped even lanes. Each
//! 8-lane half is then packed with the compress table.
//!
//! # Examples
//!
//! ```rust
//! use scratchpad::escape::json::escape_json;
//!
//! assert_eq!(escape_json(br#"say "hi""#), br#"say \"hi\""#);
//! ```

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use crate::common::error::{Error, Result};
#[cfg(target_arch = "aarch64")]
use crate::common::simd::compress::{compress8_neon, movemask_u8x8};
#[cfg(target_arch = "x86_64")]
use crate::common::simd::compress::compress8_ssse3;
#[allow(unused_imports)]
use crate::common::simd::{CpuFeatures, cpu_features};

#[inline]
fn is_special(byte: u8) -> bool {
    byte == b'\\' || byte == b'"'
}

/// Output size that is always sufficient for `len` input bytes.
///
/// This is the worst case (every byte escaped) and also the scratch space the
/// vector kernels need for their full-width stores.
#[inline]
pub const fn escaped_capacity(len: usize) -> usize {
    len * 2
}

/// Scalar baseline; returns the number of bytes written.
///
/// # Panics
///
/// Panics if `output` is shorter than the escaped input.
pub fn escape_json_scalar(input: &[u8], output: &mut [u8]) -> usize {
    let mut out_idx = 0;
    for &byte in input {
        if is_special(byte) {
            output[out_idx] = b'\\';
            out_idx += 1;
        }
        output[out_idx] = byte;
        out_idx += 1;
    }
    out_idx
}

/// Escape `input` into `output` using the best available kernel.
///
/// Returns the number of bytes written. `output` must be at least
/// [`escaped_capacity`] long; bytes past the returned length are unspecified.
pub fn escape_json_into(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let needed = escaped_capacity(input.len());
    if output.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            actual: output.len(),
        });
    }
    Ok(escape_dispatch(input, output))
}

/// Escape `input` into a new vector.
pub fn escape_json(input: &[u8]) -> Vec<u8> {
    let mut output = vec![0u8; escaped_capacity(input.len())];
    let written = escape_dispatch(input, &mut output);
    output.truncate(written);
    output
}

/// Caller guarantees `output.len() >= escaped_capacity(input.len())`.
fn escape_dispatch(input: &[u8], output: &mut [u8]) -> usize {
    debug_assert!(output.len() >= escaped_capacity(input.len()));
    let features = cpu_features();

    #[cfg(target_arch = "x86_64")]
    {
        if features.contains(CpuFeatures::SSSE3) {
            return unsafe { escape_json_ssse3(input, output) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if features.contains(CpuFeatures::NEON) {
            return unsafe { escape_json_neon(input, output) };
        }
    }

    let _ = features;
    escape_json_scalar(input, output)
}

// A chunk starting at input offset i begins writing at or before 2 * i and
// stores at most 16 bytes, so 2 * len bytes of output cover every store.

// === x86_64 implementations ===

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
unsafe fn escape_json_ssse3(input: &[u8], output: &mut [u8]) -> usize {
    let len = input.len();
    let mut read = 0;
    let mut write = 0;
    let out = output.as_mut_ptr();

    let backslash = _mm_set1_epi8(b'\\' as i8);
    let quote = _mm_set1_epi8(b'"' as i8);
    // 0xFF in every odd byte lane
    let odd_lanes = _mm_set1_epi16(0xFF00u16 as i16);

    while read + 8 <= len {
        unsafe {
            let chunk = _mm_loadl_epi64(input.as_ptr().add(read) as *const __m128i);
            let expanded = _mm_unpacklo_epi8(chunk, _mm_setzero_si128());

            let special = _mm_or_si128(_mm_cmpeq_epi8(expanded, backslash), _mm_cmpeq_epi8(expanded, quote));
            let keep = _mm_or_si128(special, odd_lanes);

            let shifted = _mm_slli_si128(expanded, 1);
            let escaped = _mm_or_si128(_mm_and_si128(special, backslash), _mm_andnot_si128(special, shifted));

            let mask = _mm_movemask_epi8(keep) as u32;
            write += compress8_ssse3(escaped, mask as u8, out.add(write));
            write += compress8_ssse3(_mm_srli_si128(escaped, 8), (mask >> 8) as u8, out.add(write));
        }
        read += 8;
    }

    write + escape_json_scalar(&input[read..], &mut output[write..])
}

// === aarch64 implementations ===

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn escape_json_neon(input: &[u8], output: &mut [u8]) -> usize {
    let len = input.len();
    let mut read = 0;
    let mut write = 0;
    let out = output.as_mut_ptr();

    let backslash = vdupq_n_u8(b'\\');
    let quote = vdupq_n_u8(b'"');
    let odd_lanes = unsafe { vreinterpretq_u8_u16(vdupq_n_u16(0xFF00)) };

    while read + 8 <= len {
        unsafe {
            let chunk = vld1_u8(input.as_ptr().add(read));
            let expanded = vreinterpretq_u8_u16(vmovl_u8(chunk));

            let special = vorrq_u8(vceqq_u8(expanded, backslash), vceqq_u8(expanded, quote));
            let keep = vorrq_u8(special, odd_lanes);

            let shifted = vextq_u8(vdupq_n_u8(0), expanded, 15);
            let escaped = vbslq_u8(special, backslash, shifted);

            let mask_lo = movemask_u8x8(vget_low_u8(keep));
            let mask_hi = movemask_u8x8(vget_high_u8(keep));
            write += compress8_neon(vget_low_u8(escaped), mask_lo, out.add(write));
            write += compress8_neon(vget_high_u8(escaped), mask_hi, out.add(write));
        }
        read += 8;
    }

    write + escape_json_scalar(&input[read..], &mut output[write..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn escape_scalar_vec(input: &[u8]) -> Vec<u8> {
        let mut output = vec![0u8; escaped_capacity(input.len())];
        let len = escape_json_scalar(input, &mut output);
        output.truncate(len);
        output
    }

    #[test]
    fn test_no_escaping_needed() {
        let input = b"hello world";
        assert_eq!(escape_json(input), input);
    }

    #[test]
    fn test_escape_quote() {
        assert_eq!(escape_scalar_vec(b"say \"hello\""), b"say \\\"hello\\\"");
        assert_eq!(escape_json(b"say \"hello\""), b"say \\\"hello\\\"");
    }

    #[test]
    fn test_escape_backslash() {
        assert_eq!(escape_scalar_vec(b"path\\to\\file"), b"path\\\\to\\\\file");
        assert_eq!(escape_json(b"path\\to\\file"), b"path\\\\to\\\\file");
    }

    #[test]
    fn test_control_bytes_untouched() {
        assert_eq!(escape_json(b"line\nbreak\ttab"), b"line\nbreak\ttab");
    }

    #[test]
    fn test_long_string() {
        let input = b"The quick \"brown\" fox jumps\\over the lazy dog. \"quotes\" and \\backslashes\\ everywhere!";
        assert_eq!(escape_json(input), escape_scalar_vec(input));
    }

    #[test]
    fn test_all_special_worst_case() {
        let input = [b'"'; 40];
        let escaped = escape_json(&input);
        assert_eq!(escaped.len(), escaped_capacity(input.len()));
        assert!(escaped.chunks(2).all(|pair| pair == b"\\\""));
    }

    #[test]
    fn test_into_rejects_small_buffer() {
        let mut output = [0u8; 5];
        let err = escape_json_into(b"abc", &mut output).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { needed: 6, actual: 5 }));
    }

    #[test]
    fn test_into_reports_written_length() {
        let input = b"a\"b\\c";
        let mut output = vec![0u8; escaped_capacity(input.len())];
        let written = escape_json_into(input, &mut output).unwrap();
        assert_eq!(&output[..written], b"a\\\"b\\\\c");
    }

    #[test]
    fn test_matches_scalar_all_lengths() {
        let pattern = b"{\"name\":\"John\",\"path\":\"C:\\\\Users\\\\John\",\"age\":30}";
        for len in 0..pattern.len() {
            let input = &pattern[..len];
            assert_eq!(escape_json(input), escape_scalar_vec(input), "len {len}");
        }
    }

    proptest! {
        #[test]
        fn prop_matches_scalar(
            input in proptest::collection::vec(prop_oneof![Just(b'"'), Just(b'\\'), any::<u8>()], 0..300),
        ) {
            prop_assert_eq!(escape_json(&input), escape_scalar_vec(&input));
        }
    }
}
