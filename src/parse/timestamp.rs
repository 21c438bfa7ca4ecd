//! Compact timestamp validation
//!
//! Timestamps are 14 ASCII digits, `YYYYMMDDHHMMSS`. A timestamp is valid when
//! every byte is a digit, the month is 1-12, the day is 1-31, the hour is
//! 0-23 and minutes and seconds are 0-59. Day-of-month is not checked against
//! the month here; [`Timestamp::to_naive_datetime`] does calendar-exact
//! validation.
//!
//! The vector kernels load 16 bytes, so they only run when two bytes of
//! padding follow the digits. Each kernel checks single digits against
//! per-position limits with a saturating subtract, folds digit pairs into
//! 16-bit fields and checks the fields against upper and lower bounds the
//! same way. A timestamp is valid when every lane saturates to zero.
//!
//! # Examples
//!
//! ```rust
//! use scratchpad::parse::timestamp::{parse_timestamp, validate_timestamp};
//!
//! assert!(validate_timestamp(b"20241124153045"));
//! assert!(!validate_timestamp(b"20241324153045"));
//!
//! let ts = parse_timestamp(b"20241124153045").unwrap();
//! assert_eq!(ts.to_string(), "2024-11-24 15:30:45");
//! ```

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use thiserror::Error;

use super::PARALLEL_BATCH_THRESHOLD;
use crate::common::error::Result;
#[allow(unused_imports)]
use crate::common::simd::{CpuFeatures, cpu_features};

/// Length of a `YYYYMMDDHHMMSS` timestamp.
pub const TIMESTAMP_TEXT_LEN: usize = 14;

/// Largest value each digit may take.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
const DIGIT_LIMITS: [u8; 16] = [9, 9, 9, 9, 1, 9, 3, 9, 2, 9, 5, 9, 5, 9, 255, 255];

/// Bounds of the two-digit fields: year high, year low, month, day, hour,
/// minute, second, padding.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
const FIELD_MAX: [u16; 8] = [99, 99, 12, 31, 23, 59, 59, u16::MAX];
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
const FIELD_MIN: [u16; 8] = [0, 0, 1, 1, 0, 0, 0, 0];

/// Why a timestamp was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampError {
    #[error("need 14 bytes, got {len}")]
    TooShort { len: usize },

    #[error("expected a digit at byte {position}")]
    InvalidDigit { position: usize },

    #[error("{field} {value} is out of range")]
    FieldOutOfRange { field: &'static str, value: u8 },
}

/// A syntactically valid compact timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Timestamp {
    /// Convert to a chrono datetime; `None` if the day does not exist in
    /// that month (`20230230...`).
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?.and_hms_opt(
            self.hour as u32,
            self.minute as u32,
            self.second as u32,
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

fn parse_fields(bytes: &[u8]) -> std::result::Result<Timestamp, TimestampError> {
    if bytes.len() < TIMESTAMP_TEXT_LEN {
        return Err(TimestampError::TooShort { len: bytes.len() });
    }

    let mut digits = [0u8; TIMESTAMP_TEXT_LEN];
    for (position, digit) in digits.iter_mut().enumerate() {
        let d = bytes[position].wrapping_sub(b'0');
        if d > 9 {
            return Err(TimestampError::InvalidDigit { position });
        }
        *digit = d;
    }

    let pair = |i: usize| digits[i] * 10 + digits[i + 1];
    let check = |field: &'static str, value: u8, range: std::ops::RangeInclusive<u8>| {
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(TimestampError::FieldOutOfRange { field, value })
        }
    };

    Ok(Timestamp {
        year: pair(0) as u16 * 100 + pair(2) as u16,
        month: check("month", pair(4), 1..=12)?,
        day: check("day", pair(6), 1..=31)?,
        hour: check("hour", pair(8), 0..=23)?,
        minute: check("minute", pair(10), 0..=59)?,
        second: check("second", pair(12), 0..=59)?,
    })
}

/// Scalar baseline. Bytes after the first 14 are ignored.
pub fn validate_timestamp_scalar(bytes: &[u8]) -> bool {
    parse_fields(bytes).is_ok()
}

/// Validate a timestamp using the best available kernel.
pub fn validate_timestamp(bytes: &[u8]) -> bool {
    if bytes.len() < 16 {
        return validate_timestamp_scalar(bytes);
    }

    let features = cpu_features();

    #[cfg(target_arch = "x86_64")]
    {
        if features.contains(CpuFeatures::SSSE3) {
            return unsafe { validate_timestamp_ssse3(bytes) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if features.contains(CpuFeatures::NEON) {
            return unsafe { validate_timestamp_neon(bytes) };
        }
    }

    let _ = features;
    validate_timestamp_scalar(bytes)
}

/// Validate every input, preserving order.
pub fn validate_timestamp_batch<T>(inputs: &[T]) -> Vec<bool>
where
    T: AsRef<[u8]> + Sync,
{
    if inputs.len() >= PARALLEL_BATCH_THRESHOLD {
        inputs.par_iter().map(|ts| validate_timestamp(ts.as_ref())).collect()
    } else {
        inputs.iter().map(|ts| validate_timestamp(ts.as_ref())).collect()
    }
}

/// Parse a timestamp into its fields, reporting why it was rejected.
pub fn parse_timestamp(bytes: &[u8]) -> Result<Timestamp> {
    Ok(parse_fields(bytes)?)
}

// === x86_64 implementations ===

/// Requires `bytes.len() >= 16`.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
unsafe fn validate_timestamp_ssse3(bytes: &[u8]) -> bool {
    debug_assert!(bytes.len() >= 16);
    unsafe {
        let raw = _mm_loadu_si128(bytes.as_ptr() as *const __m128i);
        let digits = _mm_sub_epi8(raw, _mm_set1_epi8(b'0' as i8));

        let digit_limits = _mm_loadu_si128(DIGIT_LIMITS.as_ptr() as *const __m128i);
        let over_digit = _mm_subs_epu8(digits, digit_limits);

        // tens * 10 + ones per 16-bit lane; padding lane weighted to zero
        let weights = _mm_setr_epi8(10, 1, 10, 1, 10, 1, 10, 1, 10, 1, 10, 1, 10, 1, 0, 0);
        let fields = _mm_maddubs_epi16(digits, weights);

        let field_max = _mm_loadu_si128(FIELD_MAX.as_ptr() as *const __m128i);
        let field_min = _mm_loadu_si128(FIELD_MIN.as_ptr() as *const __m128i);
        let over_field = _mm_subs_epu16(fields, field_max);
        let under_field = _mm_subs_epu16(field_min, fields);

        let violations = _mm_or_si128(over_digit, _mm_or_si128(over_field, under_field));
        _mm_movemask_epi8(_mm_cmpeq_epi8(violations, _mm_setzero_si128())) == 0xFFFF
    }
}

// === aarch64 implementations ===

/// Requires `bytes.len() >= 16`.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn validate_timestamp_neon(bytes: &[u8]) -> bool {
    debug_assert!(bytes.len() >= 16);
    unsafe {
        let digits = vsubq_u8(vld1q_u8(bytes.as_ptr()), vdupq_n_u8(b'0'));
        let over_digit = vqsubq_u8(digits, vld1q_u8(DIGIT_LIMITS.as_ptr()));

        let pairs = vreinterpretq_u16_u8(digits);
        let tens = vandq_u16(pairs, vdupq_n_u16(0x00FF));
        let ones = vshrq_n_u16::<8>(pairs);
        let fields = vmlaq_n_u16(ones, tens, 10);

        let over_field = vqsubq_u16(fields, vld1q_u16(FIELD_MAX.as_ptr()));
        let under_field = vqsubq_u16(vld1q_u16(FIELD_MIN.as_ptr()), fields);

        let violations = vorrq_u8(
            over_digit,
            vreinterpretq_u8_u16(vorrq_u16(over_field, under_field)),
        );
        vmaxvq_u8(violations) == 0
    }
}
