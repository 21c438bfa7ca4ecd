//! Fixed-format parsers
//!
//! - [`ipv4`]: zero-padded dotted quads (`192.168.001.010`)
//! - [`timestamp`]: compact `YYYYMMDDHHMMSS` timestamps
//!
//! Both formats have fixed byte offsets, so the vector kernels validate every
//! digit with one register. Batch helpers fan out over rayon once the batch
//! is large enough to amortize the thread pool.

pub mod ipv4;
pub mod timestamp;

pub use ipv4::{Ipv4Error, parse_ipv4, parse_ipv4_addr, parse_ipv4_batch, parse_ipv4_scalar};
pub use timestamp::{
    Timestamp, TimestampError, parse_timestamp, validate_timestamp, validate_timestamp_batch,
    validate_timestamp_scalar,
};

/// Batches at least this long are processed in parallel.
pub const PARALLEL_BATCH_THRESHOLD: usize = 4096;
