//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from
//! module-level error types to the unified Error type.

use super::types::Error;
use crate::parse::ipv4::Ipv4Error;
use crate::parse::timestamp::TimestampError;

impl From<Ipv4Error> for Error {
    fn from(err: Ipv4Error) -> Self {
        Error::Ipv4(err)
    }
}

impl From<TimestampError> for Error {
    fn from(err: TimestampError) -> Self {
        Error::Timestamp(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_error_converts() {
        let err: Error = Ipv4Error::MissingDot { position: 7 }.into();
        assert!(matches!(err, Error::Ipv4(Ipv4Error::MissingDot { position: 7 })));
        assert_eq!(
            err.to_string(),
            "Invalid IPv4 address: expected '.' at byte 7"
        );
    }

    #[test]
    fn test_timestamp_error_converts() {
        let err: Error = TimestampError::TooShort { len: 3 }.into();
        assert!(matches!(err, Error::Timestamp(TimestampError::TooShort { len: 3 })));
    }

    #[test]
    fn test_buffer_too_small_message() {
        let err = Error::BufferTooSmall {
            needed: 16,
            actual: 4,
        };
        assert_eq!(err.to_string(), "Output buffer too small: need 16 bytes, got 4");
    }
}
