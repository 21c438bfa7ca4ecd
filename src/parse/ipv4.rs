//! Fixed-width IPv4 parsing
//!
//! Addresses are zero-padded dotted quads, `DDD.DDD.DDD.DDD`: digits at
//! bytes 0-2, 4-6, 8-10 and 12-14, dots at bytes 3, 7 and 11. Anything after
//! byte 15 is ignored, so a record can be parsed straight out of a larger
//! buffer.
//!
//! The vector kernels need 16 readable bytes; a slice of exactly 15 bytes is
//! handled by the scalar path with identical results.
//!
//! # Examples
//!
//! ```rust
//! use scratchpad::parse::ipv4::{parse_ipv4, parse_ipv4_addr};
//! use std::net::Ipv4Addr;
//!
//! assert_eq!(parse_ipv4(b"192.168.001.255"), Some([192, 168, 1, 255]));
//! assert_eq!(parse_ipv4(b"192.168.256.001"), None);
//! assert_eq!(parse_ipv4_addr(b"010.000.000.001").unwrap(), Ipv4Addr::new(10, 0, 0, 1));
//! ```

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::net::Ipv4Addr;

use rayon::prelude::*;
use thiserror::Error;

use super::PARALLEL_BATCH_THRESHOLD;
use crate::common::error::Result;
#[allow(unused_imports)]
use crate::common::simd::{CpuFeatures, cpu_features};

/// Length of a zero-padded dotted quad.
pub const IPV4_TEXT_LEN: usize = 15;

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
const DOT_POSITIONS: [usize; 3] = [3, 7, 11];

/// Why a dotted quad was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv4Error {
    #[error("need 15 bytes, got {len}")]
    TooShort { len: usize },

    #[error("expected '.' at byte {position}")]
    MissingDot { position: usize },

    #[error("expected a digit at byte {position}")]
    InvalidDigit { position: usize },

    #[error("octet {index} is {value}, above 255")]
    OctetOutOfRange { index: usize, value: u16 },
}

/// Decode one octet starting at `start`; bytes must be in bounds.
#[inline]
fn octet(bytes: &[u8], start: usize) -> std::result::Result<u16, Ipv4Error> {
    let mut value = 0u16;
    for position in start..start + 3 {
        let digit = bytes[position].wrapping_sub(b'0');
        if digit > 9 {
            return Err(Ipv4Error::InvalidDigit { position });
        }
        value = value * 10 + digit as u16;
    }
    Ok(value)
}

/// Left-to-right validation reporting the first problem found.
fn parse_fields(bytes: &[u8]) -> std::result::Result<[u8; 4], Ipv4Error> {
    if bytes.len() < IPV4_TEXT_LEN {
        return Err(Ipv4Error::TooShort { len: bytes.len() });
    }

    let mut octets = [0u8; 4];
    for (index, slot) in octets.iter_mut().enumerate() {
        let start = index * 4;
        if index > 0 && bytes[start - 1] != b'.' {
            return Err(Ipv4Error::MissingDot { position: start - 1 });
        }
        let value = octet(bytes, start)?;
        if value > 255 {
            return Err(Ipv4Error::OctetOutOfRange { index, value });
        }
        *slot = value as u8;
    }
    Ok(octets)
}

/// Scalar baseline.
///
/// Returns `None` for input shorter than 15 bytes, a non-digit in a digit
/// position, a missing dot or an octet above 255.
pub fn parse_ipv4_scalar(bytes: &[u8]) -> Option<[u8; 4]> {
    parse_fields(bytes).ok()
}

/// Parse a dotted quad using the best available kernel.
pub fn parse_ipv4(bytes: &[u8]) -> Option<[u8; 4]> {
    if bytes.len() < 16 {
        return parse_ipv4_scalar(bytes);
    }

    let features = cpu_features();

    #[cfg(target_arch = "x86_64")]
    {
        if features.contains(CpuFeatures::SSSE3) {
            return unsafe { parse_ipv4_ssse3(bytes) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if features.contains(CpuFeatures::NEON) {
            return unsafe { parse_ipv4_neon(bytes) };
        }
    }

    let _ = features;
    parse_ipv4_scalar(bytes)
}

/// Parse a dotted quad, reporting why it was rejected.
pub fn parse_ipv4_addr(bytes: &[u8]) -> Result<Ipv4Addr> {
    let [a, b, c, d] = parse_fields(bytes)?;
    Ok(Ipv4Addr::new(a, b, c, d))
}

/// Parse every input, preserving order.
pub fn parse_ipv4_batch<T>(inputs: &[T]) -> Vec<Option<[u8; 4]>>
where
    T: AsRef<[u8]> + Sync,
{
    if inputs.len() >= PARALLEL_BATCH_THRESHOLD {
        inputs.par_iter().map(|ip| parse_ipv4(ip.as_ref())).collect()
    } else {
        inputs.iter().map(|ip| parse_ipv4(ip.as_ref())).collect()
    }
}

#[inline]
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
fn has_dots(bytes: &[u8]) -> bool {
    DOT_POSITIONS.iter().all(|&i| bytes[i] == b'.')
}

// === x86_64 implementations ===

/// Requires `bytes.len() >= 16`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
unsafe fn parse_ipv4_ssse3(bytes: &[u8]) -> Option<[u8; 4]> {
    debug_assert!(bytes.len() >= 16);
    if !has_dots(bytes) {
        return None;
    }

    // Hundreds/tens pairs in lanes 0..8, units (zero-padded) in lanes 8..16.
    let gather = _mm_setr_epi8(0, 1, 4, 5, 8, 9, 12, 13, 2, -1, 6, -1, 10, -1, 14, -1);
    let weights = _mm_setr_epi8(100, 10, 100, 10, 100, 10, 100, 10, 1, 0, 1, 0, 1, 0, 1, 0);
    let nine = _mm_set1_epi8(9);

    let raw = unsafe { _mm_loadu_si128(bytes.as_ptr() as *const __m128i) };
    let digits = _mm_shuffle_epi8(_mm_sub_epi8(raw, _mm_set1_epi8(b'0' as i8)), gather);

    let in_range = _mm_cmpeq_epi8(_mm_max_epu8(digits, nine), nine);
    if _mm_movemask_epi8(in_range) != 0xFFFF {
        return None;
    }

    let partial = _mm_maddubs_epi16(digits, weights);
    let values = _mm_add_epi16(partial, _mm_srli_si128(partial, 8));

    let too_large = _mm_cmpgt_epi16(values, _mm_set1_epi16(255));
    if _mm_movemask_epi8(too_large) & 0xFF != 0 {
        return None;
    }

    let packed = _mm_packus_epi16(values, _mm_setzero_si128());
    Some((_mm_cvtsi128_si32(packed) as u32).to_le_bytes())
}

// === aarch64 implementations ===

/// Requires `bytes.len() >= 16`.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn parse_ipv4_neon(bytes: &[u8]) -> Option<[u8; 4]> {
    debug_assert!(bytes.len() >= 16);
    if !has_dots(bytes) {
        return None;
    }

    // Out-of-range indices read as zero, which is a valid digit.
    const GATHER: [u8; 16] = [0, 1, 2, 4, 5, 6, 8, 9, 10, 12, 13, 14, 0xFF, 0xFF, 0xFF, 0xFF];

    let mut lanes = [0u8; 16];
    unsafe {
        let raw = vld1q_u8(bytes.as_ptr());
        let digits = vqtbl1q_u8(vsubq_u8(raw, vdupq_n_u8(b'0')), vld1q_u8(GATHER.as_ptr()));
        if vmaxvq_u8(digits) > 9 {
            return None;
        }
        vst1q_u8(lanes.as_mut_ptr(), digits);
    }

    let mut octets = [0u8; 4];
    for (index, slot) in octets.iter_mut().enumerate() {
        let d = &lanes[index * 3..index * 3 + 3];
        let value = d[0] as u16 * 100 + d[1] as u16 * 10 + d[2] as u16;
        if value > 255 {
            return None;
        }
        *slot = value as u8;
    }
    Some(octets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Error;
    use proptest::prelude::*;

    #[test]
    fn test_valid_ip() {
        let ip = b"192.168.001.255X";
        assert_eq!(parse_ipv4_scalar(ip), Some([192, 168, 1, 255]));
        assert_eq!(parse_ipv4(ip), Some([192, 168, 1, 255]));
    }

    #[test]
    fn test_exactly_fifteen_bytes() {
        assert_eq!(parse_ipv4(b"255.255.255.255"), Some([255; 4]));
        assert_eq!(parse_ipv4(b"000.000.000.000"), Some([0; 4]));
    }

    #[test]
    fn test_too_short() {
        assert_eq!(parse_ipv4(b"1.2.3.4"), None);
        assert_eq!(
            parse_ipv4_fields_err(b"1.2.3.4"),
            Ipv4Error::TooShort { len: 7 }
        );
    }

    #[test]
    fn test_invalid_octet() {
        let ip = b"192.168.256.001X";
        assert_eq!(parse_ipv4_scalar(ip), None);
        assert_eq!(parse_ipv4(ip), None);
        assert_eq!(
            parse_ipv4_fields_err(ip),
            Ipv4Error::OctetOutOfRange { index: 2, value: 256 }
        );
    }

    #[test]
    fn test_max_digit_octet() {
        assert_eq!(parse_ipv4(b"999.000.000.000X"), None);
        assert_eq!(parse_ipv4(b"000.000.000.999X"), None);
    }

    #[test]
    fn test_invalid_digit() {
        let ip = b"192.16A.001.001X";
        assert_eq!(parse_ipv4_scalar(ip), None);
        assert_eq!(parse_ipv4(ip), None);
        assert_eq!(parse_ipv4_fields_err(ip), Ipv4Error::InvalidDigit { position: 6 });
    }

    #[test]
    fn test_below_zero_digit() {
        assert_eq!(parse_ipv4(b"192.168.0/1.001X"), None);
    }

    #[test]
    fn test_missing_dot() {
        let ip = b"192.168001.001XX";
        assert_eq!(parse_ipv4_scalar(ip), None);
        assert_eq!(parse_ipv4(ip), None);
        assert_eq!(parse_ipv4_fields_err(ip), Ipv4Error::MissingDot { position: 7 });
    }

    #[test]
    fn test_addr_error_surface() {
        let err = parse_ipv4_addr(b"192.168001.0011").unwrap_err();
        assert!(matches!(err, Error::Ipv4(Ipv4Error::MissingDot { position: 7 })));
        let err = parse_ipv4_addr(b"192.168001.001").unwrap_err();
        assert!(matches!(err, Error::Ipv4(Ipv4Error::TooShort { len: 14 })));
        assert_eq!(
            parse_ipv4_addr(b"127.000.000.001 trailing").unwrap(),
            Ipv4Addr::LOCALHOST
        );
    }

    #[test]
    fn test_batch_preserves_order() {
        let small = [&b"010.000.000.001"[..], b"bad", b"255.255.255.255X"];
        assert_eq!(
            parse_ipv4_batch(&small),
            vec![Some([10, 0, 0, 1]), None, Some([255; 4])]
        );

        let large: Vec<String> = (0..PARALLEL_BATCH_THRESHOLD + 10)
            .map(|i| format!("{:03}.{:03}.{:03}.{:03}", i % 256, (i / 256) % 256, i % 300, 7))
            .collect();
        let parsed = parse_ipv4_batch(&large);
        for (i, (text, result)) in large.iter().zip(&parsed).enumerate() {
            assert_eq!(*result, parse_ipv4_scalar(text.as_bytes()), "entry {i}");
        }
    }

    fn parse_ipv4_fields_err(bytes: &[u8]) -> Ipv4Error {
        parse_fields(bytes).unwrap_err()
    }

    proptest! {
        #[test]
        fn prop_dispatch_matches_scalar(
            input in proptest::collection::vec(
                prop_oneof![Just(b'.'), (b'0'..=b'9'), any::<u8>()],
                15..20,
            ),
        ) {
            prop_assert_eq!(parse_ipv4(&input), parse_ipv4_scalar(&input));
        }

        #[test]
        fn prop_formatted_roundtrip(a in any::<u8>(), b in any::<u8>(), c in any::<u8>(), d in any::<u8>()) {
            let text = format!("{a:03}.{b:03}.{c:03}.{d:03}!");
            prop_assert_eq!(parse_ipv4(text.as_bytes()), Some([a, b, c, d]));
        }
    }
}
