//! Work decomposition policy.
//!
//! Given a requested sample count and a device's limits, decide how many items
//! run per work group, how many work groups run, and how many samples each
//! item draws:
//!
//! - `group_size  = min(max_work_group_size, n)`
//! - `group_count = max_compute_units` if `n > group_size * max_compute_units`, else `1`
//! - `samples_per_item = n / (group_size * group_count)`
//!
//! Remainder samples are dropped, so the effective sample count can be lower
//! than the requested one.

use crate::context::{DeviceInfo, NdRange};
use crate::error::{MontePiError, Result};

/// Largest accepted sample count; keeps every stream offset within `u64`.
pub const MAX_POINTS: u64 = u64::MAX / 2;

/// Work-group geometry and per-item workload for one estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkDecomposition {
    /// Items per work group.
    pub group_size: usize,
    /// Number of work groups.
    pub group_count: usize,
    /// Samples drawn by each item.
    pub samples_per_item: u64,
}

impl WorkDecomposition {
    /// Plan the decomposition of `n_points` samples on `device`.
    pub fn plan(n_points: u64, device: &DeviceInfo) -> Result<Self> {
        if n_points == 0 {
            return Err(MontePiError::InvalidParameter(
                "Number of points must be positive".to_string(),
            ));
        }
        if n_points > MAX_POINTS {
            return Err(MontePiError::InvalidParameter(format!(
                "Number of points {} exceeds maximum {}",
                n_points, MAX_POINTS
            )));
        }
        device.validate()?;

        let group_size = (device.max_work_group_size as u64).min(n_points);
        let compute_units = device.max_compute_units as u64;

        let group_count = if n_points > group_size.saturating_mul(compute_units) {
            compute_units
        } else {
            1
        };

        // Both factors are bounded by n_points here, so the product cannot overflow.
        let samples_per_item = n_points / (group_size * group_count);

        Ok(Self {
            group_size: group_size as usize,
            group_count: group_count as usize,
            samples_per_item,
        })
    }

    /// Total number of items dispatched.
    pub fn total_items(&self) -> usize {
        self.group_size * self.group_count
    }

    /// Samples actually drawn.
    pub fn effective_points(&self) -> u64 {
        self.total_items() as u64 * self.samples_per_item
    }

    /// Requested samples left out by the integer division.
    pub fn dropped_points(&self, n_points: u64) -> u64 {
        n_points.saturating_sub(self.effective_points())
    }

    /// Launch geometry for this decomposition.
    pub fn nd_range(&self) -> NdRange {
        NdRange::new(self.total_items(), self.group_size)
    }

    /// Stream offset of an item: two 32-bit outputs per sample.
    #[inline]
    pub fn stream_offset(&self, global_linear_id: usize) -> u64 {
        global_linear_id as u64 * self.samples_per_item * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(max_group: usize, units: usize) -> DeviceInfo {
        DeviceInfo::new("test", max_group, units)
    }

    #[test]
    fn test_large_request_uses_all_compute_units() {
        let plan = WorkDecomposition::plan(120_000_000, &device(256, 8)).unwrap();
        assert_eq!(plan.group_size, 256);
        assert_eq!(plan.group_count, 8);
        assert_eq!(plan.samples_per_item, 120_000_000 / 2048);
        assert_eq!(plan.effective_points(), 2048 * 58593);
        assert_eq!(plan.dropped_points(120_000_000), 120_000_000 - 2048 * 58593);
    }

    #[test]
    fn test_small_request_runs_single_group() {
        let plan = WorkDecomposition::plan(1000, &device(256, 8)).unwrap();
        assert_eq!(plan.group_size, 256);
        assert_eq!(plan.group_count, 1);
        assert_eq!(plan.samples_per_item, 3);
        assert_eq!(plan.effective_points(), 768);
    }

    #[test]
    fn test_request_below_group_size() {
        let plan = WorkDecomposition::plan(10, &device(256, 8)).unwrap();
        assert_eq!(plan.group_size, 10);
        assert_eq!(plan.group_count, 1);
        assert_eq!(plan.samples_per_item, 1);
        assert_eq!(plan.effective_points(), 10);
    }

    #[test]
    fn test_exact_saturation_boundary_uses_one_group() {
        // n == group_size * units is not strictly greater.
        let plan = WorkDecomposition::plan(2048, &device(256, 8)).unwrap();
        assert_eq!(plan.group_count, 1);
        assert_eq!(plan.samples_per_item, 8);

        let plan = WorkDecomposition::plan(2049, &device(256, 8)).unwrap();
        assert_eq!(plan.group_count, 8);
        assert_eq!(plan.samples_per_item, 1);
    }

    #[test]
    fn test_invariants_over_grid() {
        let requests = [1u64, 2, 7, 255, 256, 257, 1000, 4096, 99_999, 1_000_003, 120_000_000];
        let limits = [(1usize, 1usize), (1, 16), (64, 1), (256, 4), (1024, 3), (8192, 112)];

        for &n in &requests {
            for &(max_group, units) in &limits {
                let plan = WorkDecomposition::plan(n, &device(max_group, units)).unwrap();

                assert!(plan.group_size as u64 <= n);
                assert!(plan.group_size <= max_group);
                assert!(plan.group_count == 1 || plan.group_count == units);
                assert!(plan.samples_per_item >= 1, "n={} limits=({}, {})", n, max_group, units);
                assert!(plan.effective_points() <= n);
                assert!(plan.dropped_points(n) < plan.total_items() as u64);
                assert_eq!(plan.nd_range().group_count(), plan.group_count);
            }
        }
    }

    #[test]
    fn test_stream_offsets_are_disjoint() {
        let plan = WorkDecomposition::plan(10_000, &device(16, 4)).unwrap();
        let words = plan.samples_per_item * 2;
        for id in 1..plan.total_items() {
            assert_eq!(plan.stream_offset(id) - plan.stream_offset(id - 1), words);
        }
    }

    #[test]
    fn test_rejects_zero_points() {
        let result = WorkDecomposition::plan(0, &device(256, 8));
        assert!(matches!(result, Err(MontePiError::InvalidParameter(_))));
    }

    #[test]
    fn test_rejects_oversized_request() {
        let result = WorkDecomposition::plan(MAX_POINTS + 1, &device(256, 8));
        assert!(matches!(result, Err(MontePiError::InvalidParameter(_))));
    }

    #[test]
    fn test_rejects_degenerate_device() {
        assert!(WorkDecomposition::plan(100, &device(0, 8)).is_err());
        assert!(WorkDecomposition::plan(100, &device(256, 0)).is_err());
    }
}
