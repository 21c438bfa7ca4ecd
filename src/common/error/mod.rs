//! Unified error types for scratchpad.
//!
//! Kernels themselves are infallible; this type covers the surfaces around
//! them: caller-provided buffers, structured parsing and harness configuration.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
