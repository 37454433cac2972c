//! Monte Carlo π estimator.
//!
//! Each item draws `samples_per_item` points from its own Philox sub-stream,
//! counts those with `|(x, y)| <= 1`, and contributes the count to its group's
//! sum reduction. The host adds the per-group sums and scales the hit ratio by 4.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::{EstimatorConfig, REFERENCE_PI};
use crate::context::{ExecutionContext, WorkItem};
use crate::decomposition::WorkDecomposition;
use crate::error::Result;
use crate::memory::GroupBuffer;
use crate::rng::{CounterRng, PhiloxRng};

/// Outcome of one estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiEstimate {
    /// Estimated value of π.
    pub estimated_pi: f64,
    /// Points that fell inside the quarter-circle.
    pub hits: u64,
    /// Points requested by the caller.
    pub requested_points: u64,
    /// Points actually sampled.
    pub effective_points: u64,
    /// Decomposition the estimate ran with.
    pub decomposition: WorkDecomposition,
}

impl PiEstimate {
    /// Absolute difference to [`REFERENCE_PI`].
    pub fn absolute_error(&self) -> f64 {
        (REFERENCE_PI - self.estimated_pi).abs()
    }
}

/// Estimator bound to a configuration.
#[derive(Debug, Clone, Default)]
pub struct PiEstimator {
    config: EstimatorConfig,
}

impl PiEstimator {
    /// Create an estimator with the given configuration.
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Create an estimator with the default configuration but another seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(EstimatorConfig::builder().seed(seed).build())
    }

    /// Estimate π from `n_points` samples on `ctx`.
    ///
    /// The per-group output buffer is released before this returns, whether
    /// the estimate succeeds or fails.
    pub fn estimate<C: ExecutionContext>(&self, ctx: &C, n_points: u64) -> Result<PiEstimate> {
        let plan = WorkDecomposition::plan(n_points, ctx.device_info())?;
        debug!(
            "Decomposition for {} points on '{}': group_size={}, group_count={}, samples_per_item={}, dropped={}",
            n_points,
            ctx.device_info().name,
            plan.group_size,
            plan.group_count,
            plan.samples_per_item,
            plan.dropped_points(n_points)
        );

        let seed = self.config.seed;
        let samples = plan.samples_per_item;
        let kernel = move |item: &WorkItem| -> u64 {
            let offset = plan.stream_offset(item.global_linear_id());
            let mut engine = PhiloxRng::with_offset(seed, offset);

            let mut count = 0u64;
            for _ in 0..samples {
                let [x, y] = engine.next_uniform2();
                if (x * x + y * y).sqrt() <= 1.0 {
                    count += 1;
                }
            }
            count
        };

        let start = Instant::now();
        let hits = {
            let mut counts = GroupBuffer::acquire(ctx.buffers(), plan.group_count, 0u64)?;
            ctx.launch_group_sum(plan.nd_range(), &kernel, &mut counts)?;
            ctx.wait()?;
            counts.iter().sum::<u64>()
        };

        let effective_points = plan.effective_points();
        let estimated_pi = hits as f64 / effective_points as f64 * 4.0;

        info!(
            "Estimated pi = {} from {} hits over {} points in {:?}",
            estimated_pi,
            hits,
            effective_points,
            start.elapsed()
        );

        Ok(PiEstimate {
            estimated_pi,
            hits,
            requested_points: n_points,
            effective_points,
            decomposition: plan,
        })
    }
}

/// Estimate π from `n_points` samples on `ctx` with the default seed.
pub fn estimate_pi<C: ExecutionContext>(ctx: &C, n_points: u64) -> Result<f64> {
    PiEstimator::default()
        .estimate(ctx, n_points)
        .map(|estimate| estimate.estimated_pi)
}
