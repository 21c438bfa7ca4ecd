//! Line-feed insertion across the three width strategies.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use scratchpad::bench::corpus;
use scratchpad::transform::line_feed::{insert_line_feed, insert_line_feed32, insert_line_feed_scalar};

fn bench_line_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_line_feed");
    let input = corpus::mixed_case_text(1_000_000);
    group.throughput(Throughput::Bytes(input.len() as u64));

    for k in [8, 24, 32, 64, 72, 128] {
        group.bench_with_input(BenchmarkId::new("scalar", k), &k, |b, &k| {
            b.iter(|| black_box(insert_line_feed_scalar(black_box(&input), k)))
        });
        group.bench_with_input(BenchmarkId::new("dispatched", k), &k, |b, &k| {
            b.iter(|| black_box(insert_line_feed(black_box(&input), k)))
        });
    }

    group.finish();
}

fn bench_block32(c: &mut Criterion) {
    let mut block = [0u8; 32];
    block.copy_from_slice(&corpus::mixed_case_text(32));

    c.bench_function("insert_line_feed32", |b| {
        b.iter(|| black_box(insert_line_feed32(black_box(&block), black_box(13))))
    });
}

criterion_group!(benches, bench_line_feed, bench_block32);
criterion_main!(benches);
