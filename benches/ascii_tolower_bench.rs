//! ASCII lowercasing: scalar baseline against the dispatched kernel, plus the
//! NEON unroll factors (ignored on x86).

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use scratchpad::bench::corpus;
use scratchpad::transform::lowercase::{Unroll, ascii_tolower, ascii_tolower_scalar, ascii_tolower_with};

fn bench_tolower(c: &mut Criterion) {
    let mut group = c.benchmark_group("ascii_tolower");

    for size in [64, 4_096, 1_000_000] {
        let input = corpus::mixed_case_text(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("scalar", size), &input, |b, input| {
            b.iter(|| black_box(ascii_tolower_scalar(black_box(input))))
        });
        group.bench_with_input(BenchmarkId::new("dispatched", size), &input, |b, input| {
            b.iter(|| black_box(ascii_tolower(black_box(input))))
        });
    }

    group.finish();
}

fn bench_unroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("ascii_tolower_unroll");
    let input = corpus::mixed_case_text(1_000_000);
    group.throughput(Throughput::Bytes(input.len() as u64));

    for unroll in [Unroll::X1, Unroll::X2, Unroll::X4] {
        group.bench_with_input(
            BenchmarkId::new("bytes_per_iter", unroll.bytes_per_iter()),
            &unroll,
            |b, &unroll| b.iter(|| black_box(ascii_tolower_with(black_box(&input), unroll))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_tolower, bench_unroll);
criterion_main!(benches);
