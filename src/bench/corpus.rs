//! Deterministic inputs for the harness and the criterion benches.

/// Repeat `pattern` until `len` bytes.
pub fn cycle(pattern: &[u8], len: usize) -> Vec<u8> {
    pattern.iter().cycle().take(len).copied().collect()
}

/// English text with mixed case, digits and punctuation.
pub fn mixed_case_text(len: usize) -> Vec<u8> {
    cycle(b"The Quick BROWN Fox Jumps Over The Lazy DOG 0123456789! ", len)
}

/// Text without any byte that needs JSON escaping.
pub fn clean_text(len: usize) -> Vec<u8> {
    cycle(b"abcdefghijklmnopqrstuvwxyz0123456789 ", len)
}

/// JSON-ish text with occasional quotes, backslashes and newlines.
pub fn json_text(len: usize) -> Vec<u8> {
    cycle(
        b"{\"name\": \"John Doe\", \"path\": \"C:\\\\Users\\\\John\", \"note\": \"line one\nline two\"} ",
        len,
    )
}

/// Text where roughly half the bytes are quotes or backslashes.
pub fn heavy_escape_text(len: usize) -> Vec<u8> {
    cycle(b"\"test\\path\" \"another\\one\" ", len)
}

/// Lowercase letters with `target` at every `every`-th position.
pub fn with_target(len: usize, target: u8, every: usize) -> Vec<u8> {
    let every = every.max(1);
    (0..len)
        .map(|i| if i % every == 0 { target } else { b'a' + (i % 26) as u8 })
        .collect()
}

/// `n` zero-padded dotted quads, each followed by one padding byte.
pub fn ipv4_batch(n: usize) -> Vec<[u8; 16]> {
    (0..n)
        .map(|i| {
            let octets = [(i * 7) % 256, (i * 13) % 256, (i / 256) % 256, (i * 31 + 1) % 256];
            let text = format!("{:03}.{:03}.{:03}.{:03}X", octets[0], octets[1], octets[2], octets[3]);
            let mut record = [0u8; 16];
            record.copy_from_slice(text.as_bytes());
            record
        })
        .collect()
}

/// `n` valid `YYYYMMDDHHMMSS` timestamps, each followed by two padding bytes.
pub fn timestamp_batch(n: usize) -> Vec<[u8; 16]> {
    (0..n)
        .map(|i| {
            let text = format!(
                "{:04}{:02}{:02}{:02}{:02}{:02}XX",
                1970 + i % 100,
                1 + i % 12,
                1 + i % 28,
                i % 24,
                i % 60,
                (i * 7) % 60
            );
            let mut record = [0u8; 16];
            record.copy_from_slice(text.as_bytes());
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{ipv4::parse_ipv4_scalar, timestamp::validate_timestamp_scalar};

    #[test]
    fn test_lengths() {
        for len in [0, 1, 57, 1000] {
            assert_eq!(mixed_case_text(len).len(), len);
            assert_eq!(json_text(len).len(), len);
            assert_eq!(heavy_escape_text(len).len(), len);
            assert_eq!(with_target(len, b',', 3).len(), len);
        }
    }

    #[test]
    fn test_clean_text_needs_no_escape() {
        assert!(!crate::escape::detect::has_json_escapable_byte(&clean_text(500)));
        assert!(crate::escape::detect::has_json_escapable_byte(&json_text(500)));
    }

    #[test]
    fn test_target_density() {
        let data = with_target(100, b',', 10);
        assert_eq!(data.iter().filter(|&&b| b == b',').count(), 10);
    }

    #[test]
    fn test_batches_are_valid() {
        assert!(ipv4_batch(600).iter().all(|ip| parse_ipv4_scalar(ip).is_some()));
        assert!(timestamp_batch(600).iter().all(|ts| validate_timestamp_scalar(ts)));
    }
}
