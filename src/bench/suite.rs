//! Scalar-versus-dispatched runs for every configured kernel.

use super::config::{BenchConfig, Kernel};
use super::{Comparison, corpus, measure};
use crate::common::error::Result;
use crate::common::simd::cpu_features;
use crate::escape::{detect, json};
use crate::parse::{ipv4, timestamp};
use crate::transform::{line_feed, lowercase, remove};

/// Single-record parsers are cheap, so they get this many more calls.
const SINGLE_RECORD_SCALE: usize = 1000;

/// Run every kernel selected in `config`, in order.
pub fn run(config: &BenchConfig) -> Result<Vec<Comparison>> {
    config.validate()?;
    tracing::info!(
        isa = cpu_features().best_isa(),
        iterations = config.iterations,
        input_size = config.input_size,
        "starting harness"
    );

    let mut results = Vec::new();
    for &kernel in &config.kernels {
        let comparisons = run_kernel(kernel, config);
        for c in &comparisons {
            tracing::info!(
                kernel = %kernel,
                workload = %c.label,
                scalar = %c.baseline.rate(),
                dispatched = %c.candidate.rate(),
                speedup = format_args!("{:.2}x", c.speedup()),
                "measured"
            );
        }
        results.extend(comparisons);
    }
    Ok(results)
}

/// Comparisons for one kernel family.
pub fn run_kernel(kernel: Kernel, config: &BenchConfig) -> Vec<Comparison> {
    match kernel {
        Kernel::AsciiLower => bench_ascii_lower(config),
        Kernel::RemoveByte => bench_remove_byte(config),
        Kernel::LineFeed => bench_line_feed(config),
        Kernel::EscapeJson => bench_escape_json(config),
        Kernel::DetectEscape => bench_detect_escape(config),
        Kernel::Ipv4 => bench_ipv4(config),
        Kernel::Timestamp => bench_timestamp(config),
    }
}

fn compare(label: impl Into<String>, baseline: super::Measurement, candidate: super::Measurement) -> Comparison {
    Comparison {
        label: label.into(),
        baseline,
        candidate,
    }
}

fn bench_ascii_lower(config: &BenchConfig) -> Vec<Comparison> {
    let input = corpus::mixed_case_text(config.input_size);
    let n = config.iterations;
    let len = input.len();

    vec![compare(
        "ascii-lower",
        measure("scalar", n, len, || lowercase::ascii_tolower_scalar(&input)),
        measure("dispatched", n, len, || lowercase::ascii_tolower(&input)),
    )]
}

fn bench_remove_byte(config: &BenchConfig) -> Vec<Comparison> {
    let size = config.input_size;
    let n = config.iterations;
    let workloads = [
        ("remove-byte spaces", corpus::mixed_case_text(size), b' '),
        ("remove-byte sparse", corpus::with_target(size, b',', 100), b','),
        ("remove-byte dense", corpus::with_target(size, b',', 2), b','),
    ];

    workloads
        .into_iter()
        .map(|(label, input, target)| {
            let len = input.len();
            let mut scratch = input.clone();
            let baseline = measure("scalar", n, len, || {
                scratch.copy_from_slice(&input);
                remove::remove_byte_scalar(&mut scratch, target)
            });
            let candidate = measure("dispatched", n, len, || {
                scratch.copy_from_slice(&input);
                remove::remove_byte(&mut scratch, target)
            });
            compare(label, baseline, candidate)
        })
        .collect()
}

fn bench_line_feed(config: &BenchConfig) -> Vec<Comparison> {
    let input = corpus::mixed_case_text(config.input_size);
    let n = config.iterations;
    let len = input.len();

    config
        .line_widths
        .iter()
        .map(|&k| {
            compare(
                format!("line-feed k={}", k),
                measure("scalar", n, len, || line_feed::insert_line_feed_scalar(&input, k)),
                measure("dispatched", n, len, || line_feed::insert_line_feed(&input, k)),
            )
        })
        .collect()
}

fn bench_escape_json(config: &BenchConfig) -> Vec<Comparison> {
    let size = config.input_size;
    let n = config.iterations;
    let workloads = [
        ("escape-json clean", corpus::clean_text(size)),
        ("escape-json mixed", corpus::json_text(size)),
        ("escape-json heavy", corpus::heavy_escape_text(size)),
    ];

    workloads
        .into_iter()
        .map(|(label, input)| {
            let len = input.len();
            let mut output = vec![0u8; json::escaped_capacity(len)];
            let baseline = measure("scalar", n, len, || json::escape_json_scalar(&input, &mut output));
            let candidate = measure("dispatched", n, len, || json::escape_json_into(&input, &mut output));
            compare(label, baseline, candidate)
        })
        .collect()
}

fn bench_detect_escape(config: &BenchConfig) -> Vec<Comparison> {
    let size = config.input_size;
    let n = config.iterations;
    let workloads = [
        ("detect-escape clean", corpus::clean_text(size)),
        ("detect-escape early", corpus::json_text(size)),
    ];

    workloads
        .into_iter()
        .map(|(label, input)| {
            let len = input.len();
            compare(
                label,
                measure("scalar", n, len, || detect::has_json_escapable_byte_scalar(&input)),
                measure("swar", n, len, || detect::has_json_escapable_byte(&input)),
            )
        })
        .collect()
}

fn bench_ipv4(config: &BenchConfig) -> Vec<Comparison> {
    let single_n = config.iterations.saturating_mul(SINGLE_RECORD_SCALE);
    let valid = b"192.168.001.255X";

    let mut results = vec![compare(
        "ipv4 single",
        measure("scalar", single_n, 0, || ipv4::parse_ipv4_scalar(valid)),
        measure("dispatched", single_n, 0, || ipv4::parse_ipv4(valid)),
    )];

    for &size in &config.batch_sizes {
        let batch = corpus::ipv4_batch(size);
        let baseline = measure("scalar", config.iterations, 0, || {
            batch.iter().map(|ip| ipv4::parse_ipv4_scalar(ip)).collect::<Vec<_>>()
        });
        let candidate = measure("dispatched", config.iterations, 0, || ipv4::parse_ipv4_batch(&batch));
        results.push(compare(
            format!("ipv4 batch {}", size),
            baseline.with_items(size),
            candidate.with_items(size),
        ));
    }
    results
}

fn bench_timestamp(config: &BenchConfig) -> Vec<Comparison> {
    let single_n = config.iterations.saturating_mul(SINGLE_RECORD_SCALE);

    let mut results = Vec::new();
    for (label, input) in [
        ("timestamp valid", b"20241124153045XX"),
        ("timestamp bad month", b"20241324153045XX"),
    ] {
        results.push(compare(
            label,
            measure("scalar", single_n, 0, || timestamp::validate_timestamp_scalar(input)),
            measure("dispatched", single_n, 0, || timestamp::validate_timestamp(input)),
        ));
    }

    for &size in &config.batch_sizes {
        let batch = corpus::timestamp_batch(size);
        let baseline = measure("scalar", config.iterations, 0, || {
            batch
                .iter()
                .map(|ts| timestamp::validate_timestamp_scalar(ts))
                .collect::<Vec<_>>()
        });
        let candidate = measure("dispatched", config.iterations, 0, || timestamp::validate_timestamp_batch(&batch));
        results.push(compare(
            format!("timestamp batch {}", size),
            baseline.with_items(size),
            candidate.with_items(size),
        ));
    }
    results
}
