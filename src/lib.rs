//! Scratchpad - SIMD byte-processing kernels with scalar baselines
//!
//! Each kernel comes as a plain scalar routine and a dispatched entry point
//! that picks AVX2, SSSE3/SSE2 or NEON at runtime and falls back to scalar.
//! Both produce identical output for every input.
//!
//! # Features
//!
//! - **ASCII lowercasing**: branch-free range compare and masked add
//! - **Byte removal**: in-place compaction with shuffle tables
//! - **Line wrapping**: `\n` after every `k` bytes
//! - **JSON escaping**: backslash-prefixing of `"` and `\`, plus SWAR detection
//! - **Fixed-format parsing**: dotted-quad IPv4 and `YYYYMMDDHHMMSS` timestamps
//! - **Throughput harness**: scalar-versus-dispatched timing driven by YAML
//!
//! # Example - Transforming text
//!
//! ```rust
//! use scratchpad::transform::{ascii_tolower, insert_line_feed, remove_byte_vec};
//!
//! let lower = ascii_tolower(b"Hello, SIMD World");
//! assert_eq!(lower, b"hello, simd world");
//!
//! let mut csv = b"a,b,c".to_vec();
//! remove_byte_vec(&mut csv, b',');
//! assert_eq!(csv, b"abc");
//!
//! assert_eq!(insert_line_feed(b"abcdef", 2), b"ab\ncd\nef\n");
//! ```
//!
//! # Example - Escaping a JSON string body
//!
//! ```rust
//! use scratchpad::escape::{escape_json, find_first_escapable};
//!
//! let raw = br#"C:\temp\"new""#;
//! assert_eq!(find_first_escapable(raw), Some(2));
//! assert_eq!(escape_json(raw), br#"C:\\temp\\\"new\""#);
//! ```
//!
//! # Example - Parsing fixed-width records
//!
//! ```rust
//! use scratchpad::parse::{parse_ipv4, parse_timestamp};
//!
//! # fn main() -> scratchpad::Result<()> {
//! assert_eq!(parse_ipv4(b"192.168.001.010"), Some([192, 168, 1, 10]));
//!
//! let ts = parse_timestamp(b"20240229235959")?;
//! assert!(ts.to_naive_datetime().is_some());
//! # Ok(())
//! # }
//! ```

/// Shared infrastructure: CPU feature detection, lookup tables, errors
pub mod common;

/// In-place and copying byte transforms
pub mod transform;

/// JSON string escaping and escape detection
pub mod escape;

/// Fixed-format record parsers
pub mod parse;

/// Scalar-versus-dispatched throughput harness
pub mod bench;

// Re-export commonly used types for convenience
pub use common::error::{Error, Result};
pub use common::simd::{CpuFeatures, cpu_features};
