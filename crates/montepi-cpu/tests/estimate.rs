//! Integration tests for estimating pi on the CPU device.

use montepi_core::prelude::*;
use montepi_cpu::CpuDevice;

fn device(max_group: usize, units: usize, threads: usize) -> CpuDevice {
    CpuDevice::builder()
        .max_work_group_size(max_group)
        .max_compute_units(units)
        .threads(threads)
        .build()
        .expect("Failed to create CPU device")
}

/// Same seed, points and limits give a bit-identical estimate.
#[test]
fn test_estimate_is_deterministic() {
    let device = device(128, 4, 4);

    let first = estimate_pi(&device, 2_000_000).expect("first estimate");
    let second = estimate_pi(&device, 2_000_000).expect("second estimate");

    assert_eq!(first.to_bits(), second.to_bits());
}

/// The estimate depends on the reported limits only, not on the pool size.
#[test]
fn test_estimate_independent_of_thread_count() {
    let single = device(128, 4, 1);
    let many = device(128, 4, 4);

    let a = PiEstimator::default().estimate(&single, 1_000_000).unwrap();
    let b = PiEstimator::default().estimate(&many, 1_000_000).unwrap();

    assert_eq!(a.hits, b.hits);
    assert_eq!(a.estimated_pi.to_bits(), b.estimated_pi.to_bits());
    assert_eq!(a.decomposition, b.decomposition);
}

/// Hits never exceed the effective sample count and the estimate stays in [0, 4].
#[test]
fn test_hit_count_bound() {
    let device = device(64, 3, 2);

    for n in [1u64, 5, 64, 193, 10_000, 123_457] {
        let estimate = PiEstimator::default().estimate(&device, n).unwrap();

        assert!(estimate.hits <= estimate.effective_points, "n={}", n);
        assert!(estimate.effective_points <= n);
        assert!((0.0..=4.0).contains(&estimate.estimated_pi), "n={}", n);
    }

    assert_eq!(device.buffers().live(), 0);
}

/// The decomposition reported with the estimate follows the device limits.
#[test]
fn test_decomposition_follows_device_limits() {
    let device = device(256, 8, 2);

    let small = PiEstimator::default().estimate(&device, 1_000).unwrap();
    assert_eq!(small.decomposition.group_size, 256);
    assert_eq!(small.decomposition.group_count, 1);
    assert_eq!(small.effective_points, 768);

    let large = PiEstimator::default().estimate(&device, 1_000_000).unwrap();
    assert_eq!(large.decomposition.group_count, 8);
    assert_eq!(large.decomposition.samples_per_item, 1_000_000 / 2048);
}

/// Zero falls back to the default sample count and matches an explicit request.
#[test]
fn test_zero_points_falls_back_to_default() {
    let config = EstimatorConfig::builder().default_points(200_000).build();
    let estimator = PiEstimator::new(config);
    let device = device(64, 4, 2);

    let resolved = config.resolve_points(0);
    assert_eq!(resolved, 200_000);

    let fallback = estimator.estimate(&device, resolved).unwrap();
    let explicit = estimator.estimate(&device, 200_000).unwrap();
    assert_eq!(fallback, explicit);

    assert_eq!(EstimatorConfig::default().resolve_points(0), DEFAULT_POINTS);
}

/// Ten million points land within 0.01 of pi.
#[test]
fn test_accuracy_ten_million() {
    let device = CpuDevice::new().unwrap();
    let estimate = PiEstimator::default().estimate(&device, 10_000_000).unwrap();

    assert!(
        estimate.absolute_error() < 0.01,
        "estimate {} (error {})",
        estimate.estimated_pi,
        estimate.absolute_error()
    );
}

/// Mean absolute error shrinks as the sample count grows.
#[test]
fn test_error_decreases_with_sample_count() {
    let device = device(64, 4, 4);
    let seeds = 1..=6u64;

    let mean_error = |n: u64| -> f64 {
        let total: f64 = seeds
            .clone()
            .map(|seed| {
                PiEstimator::with_seed(seed)
                    .estimate(&device, n)
                    .unwrap()
                    .absolute_error()
            })
            .sum();
        total / seeds.clone().count() as f64
    };

    let coarse = mean_error(10_000);
    let fine = mean_error(1_000_000);
    assert!(
        fine < coarse,
        "mean error at 1e6 ({}) should be below 1e4 ({})",
        fine,
        coarse
    );
}

/// The reference scenario: 120M points, seed 7777.
#[test]
#[ignore = "samples 120M points; run with --ignored in release mode"]
fn test_default_scenario() {
    let device = CpuDevice::new().unwrap();
    let n = EstimatorConfig::default().resolve_points(0);
    assert_eq!(n, 120_000_000);

    let estimate = PiEstimator::default().estimate(&device, n).unwrap();
    assert!(
        (estimate.estimated_pi - REFERENCE_PI).abs() < 0.01,
        "estimate {}",
        estimate.estimated_pi
    );
}
