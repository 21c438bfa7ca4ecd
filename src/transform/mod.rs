//! Byte-string transforms.
//!
//! - [`lowercase`]: ASCII lowercasing, out of place or in place
//! - [`remove`]: in-place removal of every occurrence of one byte value
//! - [`line_feed`]: wrapping a buffer by inserting `\n` every `k` bytes
//!
//! Each kernel ships a `*_scalar` baseline next to the dispatched entry point;
//! both always produce identical output.

pub mod line_feed;
pub mod lowercase;
pub mod remove;

pub use line_feed::{insert_line_feed, insert_line_feed32, insert_line_feed_scalar};
pub use lowercase::{Unroll, ascii_tolower, ascii_tolower_scalar, ascii_tolower_with, make_ascii_lowercase};
pub use remove::{remove_byte, remove_byte_scalar, remove_byte_vec};
