//! Dotted-quad parsing, single records and batches.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use scratchpad::bench::corpus;
use scratchpad::parse::ipv4::{parse_ipv4, parse_ipv4_batch, parse_ipv4_scalar};

fn bench_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("ipv4_single");
    let ip = b"192.168.001.255X";
    group.throughput(Throughput::Elements(1));

    group.bench_function("scalar", |b| b.iter(|| black_box(parse_ipv4_scalar(black_box(ip)))));
    group.bench_function("dispatched", |b| b.iter(|| black_box(parse_ipv4(black_box(ip)))));

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("ipv4_batch");

    for size in [100, 1_000, 10_000] {
        let batch = corpus::ipv4_batch(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("scalar", size), &batch, |b, batch| {
            b.iter(|| {
                for ip in batch {
                    black_box(parse_ipv4_scalar(ip));
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("dispatched", size), &batch, |b, batch| {
            b.iter(|| black_box(parse_ipv4_batch(black_box(batch))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single, bench_batch);
criterion_main!(benches);
