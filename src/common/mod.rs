//! Common infrastructure shared by every kernel family.
//!
//! This module owns runtime SIMD dispatch and the unified error type, plus
//! the log setup used by the harness binary.

// Submodule declarations
pub mod error;
#[cfg(feature = "cli")]
pub mod logger;
pub mod simd;

// Re-exports for convenience
pub use error::{Error, Result};
pub use simd::{CpuFeatures, cpu_features};
