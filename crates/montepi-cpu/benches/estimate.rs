//! Estimator Benchmarks
//!
//! Measures sampling throughput of the CPU device and the cost of the
//! Philox generator on its own.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use montepi_core::prelude::*;
use montepi_cpu::CpuDevice;

/// Benchmark raw generator throughput
fn bench_philox(c: &mut Criterion) {
    let mut group = c.benchmark_group("philox");
    group.throughput(Throughput::Elements(1024));

    group.bench_function("next_uniform2_x1024", |b| {
        let mut rng = PhiloxRng::with_offset(DEFAULT_SEED, 0);
        b.iter(|| {
            for _ in 0..1024 {
                black_box(rng.next_uniform2());
            }
        });
    });

    group.bench_function("with_offset", |b| {
        let mut offset = 0u64;
        b.iter(|| {
            offset = offset.wrapping_add(117);
            black_box(PhiloxRng::with_offset(DEFAULT_SEED, offset));
        });
    });

    group.finish();
}

/// Benchmark end-to-end estimates at several sample counts
fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    group.sample_size(10);

    let device = CpuDevice::new().expect("Failed to create CPU device");

    for &points in &[100_000u64, 1_000_000, 10_000_000] {
        group.throughput(Throughput::Elements(points));
        group.bench_with_input(BenchmarkId::new("cpu", points), &points, |b, &points| {
            b.iter(|| black_box(estimate_pi(&device, points).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_philox, bench_estimate);
criterion_main!(benches);
