//! Throughput harness
//!
//! Times a scalar baseline against the dispatched kernel for the same input
//! and reports throughput and speedup. This is a quick comparison tool; the
//! criterion benches under `benches/` are the statistically careful version.
//!
//! ```rust
//! use scratchpad::bench::{measure, Comparison};
//! use scratchpad::transform::lowercase::{ascii_tolower, ascii_tolower_scalar};
//!
//! let input = vec![b'A'; 4096];
//! let comparison = Comparison {
//!     label: "tolower".into(),
//!     baseline: measure("scalar", 20, input.len(), || ascii_tolower_scalar(&input)),
//!     candidate: measure("simd", 20, input.len(), || ascii_tolower(&input)),
//! };
//! assert!(comparison.speedup() > 0.0);
//! ```

pub mod config;
pub mod corpus;
pub mod suite;

pub use config::{BenchConfig, Kernel};
pub use suite::run;

use std::fmt::Write as _;
use std::hint::black_box;
use std::time::{Duration, Instant};

/// Untimed calls before each measurement.
pub const WARMUP_ITERATIONS: usize = 10;

/// Timing of one routine over a fixed number of calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub name: String,
    pub iterations: usize,
    pub elapsed: Duration,
    /// Input bytes consumed per call; zero for per-item kernels
    pub bytes_per_iter: usize,
    /// Items (records, validations) handled per call
    pub items_per_iter: usize,
}

impl Measurement {
    #[inline]
    fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64().max(f64::EPSILON)
    }

    pub fn gb_per_sec(&self) -> f64 {
        (self.iterations * self.bytes_per_iter) as f64 / self.seconds() / 1e9
    }

    pub fn mops_per_sec(&self) -> f64 {
        (self.iterations * self.items_per_iter) as f64 / self.seconds() / 1e6
    }

    /// Mean time per call.
    pub fn per_iter(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed.as_secs_f64() / self.iterations.max(1) as f64)
    }

    /// Set how many items each call handles.
    pub fn with_items(mut self, items_per_iter: usize) -> Self {
        self.items_per_iter = items_per_iter;
        self
    }

    /// Throughput in the unit that fits the workload.
    pub fn rate(&self) -> String {
        if self.bytes_per_iter > 0 {
            format!("{:.2} GB/s", self.gb_per_sec())
        } else {
            format!("{:.2} M/s", self.mops_per_sec())
        }
    }
}

/// Scalar baseline against the dispatched kernel on one workload.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub label: String,
    pub baseline: Measurement,
    pub candidate: Measurement,
}

impl Comparison {
    /// How many times faster the candidate is per call.
    pub fn speedup(&self) -> f64 {
        let baseline = self.baseline.seconds() / self.baseline.iterations.max(1) as f64;
        let candidate = self.candidate.seconds() / self.candidate.iterations.max(1) as f64;
        baseline / candidate
    }
}

/// Time `iterations` calls of `f` after [`WARMUP_ITERATIONS`] untimed calls.
///
/// Results go through [`black_box`] so the work cannot be optimized away.
pub fn measure<R>(name: &str, iterations: usize, bytes_per_iter: usize, mut f: impl FnMut() -> R) -> Measurement {
    for _ in 0..WARMUP_ITERATIONS {
        black_box(f());
    }

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(f());
    }
    let elapsed = start.elapsed();

    Measurement {
        name: name.to_string(),
        iterations,
        elapsed,
        bytes_per_iter,
        items_per_iter: 1,
    }
}

/// Render comparisons as a fixed-width text table.
pub fn format_table(comparisons: &[Comparison]) -> String {
    let label_width = comparisons
        .iter()
        .map(|c| c.label.len())
        .max()
        .unwrap_or(0)
        .max("workload".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<label_width$}  {:>14}  {:>14}  {:>8}",
        "workload", "scalar", "dispatched", "speedup"
    );
    let _ = writeln!(out, "{}", "-".repeat(label_width + 44));
    for c in comparisons {
        let _ = writeln!(
            out,
            "{:<label_width$}  {:>14}  {:>14}  {:>7.2}x",
            c.label,
            c.baseline.rate(),
            c.candidate.rate(),
            c.speedup()
        );
    }
    out
}
