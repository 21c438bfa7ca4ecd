//! Harness configuration.
//!
//! A [`BenchConfig`] is read from YAML; every field has a default, so an empty
//! document is a valid configuration.
//!
//! ```yaml
//! iterations: 500
//! input_size: 1000000
//! line_widths: [64, 72]
//! kernels: [ascii-lower, escape-json]
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::error::{Error, Result};

/// A kernel family the harness can measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kernel {
    AsciiLower,
    RemoveByte,
    LineFeed,
    EscapeJson,
    DetectEscape,
    Ipv4,
    Timestamp,
}

impl Kernel {
    pub const ALL: [Kernel; 7] = [
        Kernel::AsciiLower,
        Kernel::RemoveByte,
        Kernel::LineFeed,
        Kernel::EscapeJson,
        Kernel::DetectEscape,
        Kernel::Ipv4,
        Kernel::Timestamp,
    ];

    /// Name used in YAML and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Kernel::AsciiLower => "ascii-lower",
            Kernel::RemoveByte => "remove-byte",
            Kernel::LineFeed => "line-feed",
            Kernel::EscapeJson => "escape-json",
            Kernel::DetectEscape => "detect-escape",
            Kernel::Ipv4 => "ipv4",
            Kernel::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kernel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Kernel::ALL
            .into_iter()
            .find(|kernel| kernel.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Kernel::ALL.iter().map(|k| k.name()).collect();
                Error::Config(format!("unknown kernel '{}' (expected one of: {})", s, known.join(", ")))
            })
    }
}

/// Workload sizes and kernel selection for [`run`](super::suite::run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Timed calls per measurement (after warm-up)
    pub iterations: usize,
    /// Bytes of input for the buffer kernels
    pub input_size: usize,
    /// Line widths measured by the line-feed kernel
    pub line_widths: Vec<usize>,
    /// Record counts measured by the parser kernels
    pub batch_sizes: Vec<usize>,
    /// Kernels to run, in order
    pub kernels: Vec<Kernel>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            input_size: 1_000_000,
            line_widths: vec![32, 64, 72, 128],
            batch_sizes: vec![100, 1000, 10_000],
            kernels: Kernel::ALL.to_vec(),
        }
    }
}

impl BenchConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded harness configuration");
        Self::from_yaml_str(&text)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: BenchConfig = if text.trim().is_empty() {
            BenchConfig::default()
        } else {
            serde_saphyr::from_str(text).map_err(|e| Error::Config(format!("Failed to parse YAML: {}", e)))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| Error::Other(format!("Failed to serialize config to YAML: {}", e)))
    }

    /// Reject configurations that would measure nothing.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::Config("iterations must be at least 1".into()));
        }
        if self.input_size == 0 {
            return Err(Error::Config("input_size must be at least 1".into()));
        }
        if self.kernels.is_empty() {
            return Err(Error::Config("no kernels selected".into()));
        }
        if self.line_widths.contains(&0) {
            return Err(Error::Config("line_widths must not contain 0".into()));
        }
        if self.batch_sizes.contains(&0) {
            return Err(Error::Config("batch_sizes must not contain 0".into()));
        }
        Ok(())
    }
}
