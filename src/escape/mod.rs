//! Escaping for JSON string bodies.
//!
//! - [`json`]: backslash-prefixing of `"` and `\`
//! - [`detect`]: SWAR detection of bytes that need JSON escaping

pub mod detect;
pub mod json;

pub use detect::{find_first_escapable, has_json_escapable_byte, has_json_escapable_byte_scalar, needs_json_escape};
pub use json::{escape_json, escape_json_into, escape_json_scalar, escaped_capacity};
