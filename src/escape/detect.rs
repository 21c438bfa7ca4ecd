//! Detection of bytes that need JSON escaping (SWAR)
//!
//! A byte needs escaping when it is a control byte (`< 0x20`), `"` or `\`.
//! The SWAR routines test eight bytes at once inside a `u64`: subtracting a
//! per-lane constant sets a lane's high bit when the lane underflows, and
//! non-ASCII lanes are masked out afterwards.

const LANE_ONES: u64 = 0x0101_0101_0101_0101;
const LANE_HIGH: u64 = 0x8080_8080_8080_8080;

/// Whether a single byte needs escaping inside a JSON string.
#[inline]
pub fn needs_json_escape(byte: u8) -> bool {
    byte < 0x20 || byte == b'"' || byte == b'\\'
}

/// Byte-at-a-time baseline for [`has_json_escapable_byte`].
pub fn has_json_escapable_byte_scalar(buffer: &[u8]) -> bool {
    buffer.iter().any(|&b| needs_json_escape(b))
}

/// High bit of each lane flagged as escapable.
///
/// A borrow can only start in a lane that truly matches and only moves
/// toward higher lanes, so the lowest flagged lane is always a real match.
/// Lanes above it may be false positives.
#[inline]
fn escapable_lanes(x: u64) -> u64 {
    let is_ascii = LANE_HIGH & !x;

    let lt32 = x.wrapping_sub(0x20 * LANE_ONES);
    let eq_quote = (x ^ (b'"' as u64 * LANE_ONES)).wrapping_sub(LANE_ONES);
    let eq_backslash = (x ^ (b'\\' as u64 * LANE_ONES)).wrapping_sub(LANE_ONES);

    (lt32 | eq_quote | eq_backslash) & is_ascii
}

/// Whether any of the eight little-endian bytes in `x` needs escaping.
#[inline]
pub fn has_json_escapable_byte_swar(x: u64) -> bool {
    escapable_lanes(x) != 0
}

#[inline]
fn load_u64(chunk: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(chunk);
    u64::from_le_bytes(bytes)
}

/// Whether `buffer` contains any byte that needs escaping.
pub fn has_json_escapable_byte(buffer: &[u8]) -> bool {
    let mut chunks = buffer.chunks_exact(8);
    for chunk in &mut chunks {
        if has_json_escapable_byte_swar(load_u64(chunk)) {
            return true;
        }
    }
    has_json_escapable_byte_scalar(chunks.remainder())
}

/// Index of the first byte that needs escaping.
pub fn find_first_escapable(buffer: &[u8]) -> Option<usize> {
    let mut chunks = buffer.chunks_exact(8);
    let mut offset = 0;
    for chunk in &mut chunks {
        let lanes = escapable_lanes(load_u64(chunk));
        if lanes != 0 {
            return Some(offset + (lanes.trailing_zeros() / 8) as usize);
        }
        offset += 8;
    }
    chunks
        .remainder()
        .iter()
        .position(|&b| needs_json_escape(b))
        .map(|pos| offset + pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn word(bytes: [u8; 8]) -> u64 {
        u64::from_le_bytes(bytes)
    }

    #[test]
    fn test_scalar_control_chars() {
        for byte in [0, 10, 13, 31] {
            assert!(needs_json_escape(byte));
        }
    }

    #[test]
    fn test_scalar_quote_and_backslash() {
        assert!(needs_json_escape(b'"'));
        assert!(needs_json_escape(b'\\'));
    }

    #[test]
    fn test_scalar_normal_chars() {
        for byte in [b' ', b'A', b'a', b'~', 0x7F, 0x80, 0xA2, 0xDC, 0xFF] {
            assert!(!needs_json_escape(byte), "{byte:#04x}");
        }
    }

    #[test]
    fn test_swar_clean_bytes() {
        assert!(!has_json_escapable_byte_swar(word(*b"Hello!!!")));
    }

    #[test]
    fn test_swar_special_bytes() {
        assert!(has_json_escapable_byte_swar(word(*b"H\"i     ")));
        assert!(has_json_escapable_byte_swar(word(*b"A\\B     ")));
        assert!(has_json_escapable_byte_swar(word(*b"A\nB     ")));
        assert!(has_json_escapable_byte_swar(word(*b"A\tB     ")));
        assert!(has_json_escapable_byte_swar(word(*b"       \0")));
    }

    #[test]
    fn test_swar_ignores_non_ascii() {
        // 0xA2 and 0xDC alias '"' and '\' in the low seven bits
        assert!(!has_json_escapable_byte_swar(word([0xA2, 0xDC, 0x80, 0x9F, 0xFF, 0xC3, 0xA9, 0x81])));
    }

    #[test]
    fn test_swar_matches_scalar() {
        let cases: [&[u8]; 8] = [
            b"",
            b"Hello",
            b"Hello \"World\"",
            b"Path\\to\\file",
            b"Line1\nLine2\nLine3",
            b"Tab\tseparated\tvalues",
            b"\x00\x01\x02\x03\x04",
            b"Mixed \"quotes\" and \\backslashes\\ and \nnewlines",
        ];
        for case in cases {
            assert_eq!(
                has_json_escapable_byte(case),
                has_json_escapable_byte_scalar(case),
                "{:?}",
                String::from_utf8_lossy(case)
            );
        }
    }

    #[test]
    fn test_find_first_escapable() {
        assert_eq!(find_first_escapable(b""), None);
        assert_eq!(find_first_escapable(b"clean ascii text, no specials"), None);
        assert_eq!(find_first_escapable(b"\"at start"), Some(0));
        assert_eq!(find_first_escapable(b"12345678\\"), Some(8));
        assert_eq!(find_first_escapable(b"abc\x01 \x00\"\\"), Some(3));
        assert_eq!(find_first_escapable(b"tail only here.\n"), Some(15));
    }

    #[test]
    fn test_find_first_after_borrow_chain() {
        // A control byte followed by bytes that would only flag via the borrow
        assert_eq!(find_first_escapable(b"ab\x1f\x20#]cd"), Some(2));
    }

    proptest! {
        #[test]
        fn prop_find_first_matches_scalar(
            input in proptest::collection::vec(
                prop_oneof![Just(b'"'), Just(b'\\'), Just(b'\n'), Just(0x20u8), Just(0x23u8), any::<u8>()],
                0..200,
            ),
        ) {
            let expected = input.iter().position(|&b| needs_json_escape(b));
            prop_assert_eq!(find_first_escapable(&input), expected);
            prop_assert_eq!(has_json_escapable_byte(&input), expected.is_some());
        }
    }
}
