//! Common SIMD infrastructure
//!
//! This module owns runtime CPU feature detection and the lookup tables and
//! lane-packing helpers shared by the kernels in [`crate::transform`],
//! [`crate::escape`] and [`crate::parse`].
//!
//! # Supported Architectures
//!
//! ## x86_64
//! - **SSE2**: 128-bit integer operations (baseline for x86_64)
//! - **SSSE3**: byte shuffles (`pshufb`) used for compaction and gathers
//! - **SSE4.1**: detected and reported only
//! - **AVX2**: 256-bit integer operations
//!
//! ## aarch64 (ARM)
//! - **NEON**: 128-bit SIMD operations
//!
//! ## Fallback
//! - Scalar implementation for other architectures
//!
//! # Dispatch
//!
//! Every public kernel checks [`cpu_features`] and picks the widest usable
//! implementation: AVX2, then SSSE3/SSE2, then NEON, then scalar. Detection
//! runs once per process.
//!
//! ```rust
//! use scratchpad::common::simd::{cpu_features, CpuFeatures};
//!
//! let features = cpu_features();
//! if features.contains(CpuFeatures::AVX2) {
//!     assert_eq!(features.best_isa(), "avx2");
//! }
//! ```
//!
//! # Safety
//!
//! The architecture-specific implementations are `unsafe fn`s annotated with
//! `#[target_feature]`. They are only called after the corresponding flag was
//! observed in [`cpu_features`].

pub(crate) mod compress;
pub mod tables;

use bitflags::bitflags;
use once_cell::sync::Lazy;

bitflags! {
    /// Instruction-set extensions the kernels can use on the running CPU.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CpuFeatures: u32 {
        const SSE2 = 1 << 0;
        const SSSE3 = 1 << 1;
        const SSE41 = 1 << 2;
        const AVX2 = 1 << 3;
        const NEON = 1 << 4;
    }
}

static DETECTED: Lazy<CpuFeatures> = Lazy::new(|| {
    let features = CpuFeatures::detect();
    tracing::debug!(
        features = ?features,
        isa = features.best_isa(),
        "detected SIMD features"
    );
    features
});

/// Features of the running CPU, detected on first use.
#[inline]
pub fn cpu_features() -> CpuFeatures {
    *DETECTED
}

impl CpuFeatures {
    /// Query the CPU directly, bypassing the process-wide cache.
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut features = CpuFeatures::empty();

        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("sse2") {
                features |= CpuFeatures::SSE2;
            }
            if is_x86_feature_detected!("ssse3") {
                features |= CpuFeatures::SSSE3;
            }
            if is_x86_feature_detected!("sse4.1") {
                features |= CpuFeatures::SSE41;
            }
            if is_x86_feature_detected!("avx2") {
                features |= CpuFeatures::AVX2;
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            if std::arch::is_aarch64_feature_detected!("neon") {
                features |= CpuFeatures::NEON;
            }
        }

        features
    }

    /// Name of the widest instruction set the kernels will use.
    pub fn best_isa(self) -> &'static str {
        if self.contains(CpuFeatures::AVX2) {
            "avx2"
        } else if self.contains(CpuFeatures::SSSE3) {
            "ssse3"
        } else if self.contains(CpuFeatures::SSE2) {
            "sse2"
        } else if self.contains(CpuFeatures::NEON) {
            "neon"
        } else {
            "scalar"
        }
    }
}
