//! Benchmarks for decomposition, minimization and full compilation.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cidre::{
    decompose_range, minimize, CidrBlock, Compiler, IpVersion, NullReporter, Registry,
    RegistrySource,
};

/// Synthetic delegation file with `records` unaligned IPv4 ranges spread over countries.
fn delegation_text(records: usize) -> String {
    const COUNTRIES: [&str; 6] = ["US", "DE", "JP", "BR", "NL", "ZA"];
    let mut text = String::new();
    for i in 0..records {
        let start = 0x0100_0000u32 + (i as u32) * 1000;
        let [a, b, c, d] = start.to_be_bytes();
        text.push_str(&format!(
            "ripencc|{}|ipv4|{}.{}.{}.{}|{}|20200101|allocated\n",
            COUNTRIES[i % COUNTRIES.len()],
            a,
            b,
            c,
            d,
            600 + (i % 400)
        ));
    }
    text
}

/// Adjacent /24s that minimize into few blocks.
fn adjacent_blocks(count: u128) -> Vec<CidrBlock> {
    (0..count)
        .flat_map(|i| {
            let first = 0x0A00_0000 + i * 256;
            decompose_range(IpVersion::V4, first, first + 255)
        })
        .collect()
}

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");
    group.bench_function("unaligned_ipv4", |b| {
        b.iter(|| decompose_range(IpVersion::V4, black_box(0x0100_0001), black_box(0xDFFF_FFFE)))
    });
    group.bench_function("unaligned_ipv6", |b| {
        b.iter(|| decompose_range(IpVersion::V6, black_box(1), black_box(u128::MAX - 1)))
    });
    group.finish();
}

fn bench_minimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimize");
    for count in [1_000u128, 10_000, 100_000] {
        let blocks = adjacent_blocks(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &blocks, |b, blocks| {
            b.iter(|| minimize(black_box(blocks.iter().copied())))
        });
    }
    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for records in [1_000usize, 10_000] {
        let text = delegation_text(records);
        let sources = vec![RegistrySource::from_text(Registry::RipeNcc, &text)];
        group.throughput(Throughput::Elements(records as u64));
        group.bench_with_input(BenchmarkId::new("merged", records), &sources, |b, sources| {
            b.iter(|| Compiler::new(&NullReporter).with_merge(true).compile(black_box(sources)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decompose, bench_minimize, bench_compile);
criterion_main!(benches);
