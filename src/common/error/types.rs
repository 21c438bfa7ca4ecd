//! Unified error type for scratchpad operations.
use thiserror::Error;

use crate::parse::ipv4::Ipv4Error;
use crate::parse::timestamp::TimestampError;

/// Main error type for scratchpad operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or inconsistent harness configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-provided output buffer cannot hold the worst-case result
    #[error("Output buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// Malformed fixed-width IPv4 address
    #[error("Invalid IPv4 address: {0}")]
    Ipv4(Ipv4Error),

    /// Malformed or out-of-range timestamp
    #[error("Invalid timestamp: {0}")]
    Timestamp(TimestampError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for scratchpad operations.
pub type Result<T> = std::result::Result<T, Error>;
