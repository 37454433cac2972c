//! Process-wide constants and estimator configuration.

/// Seed of the counter-based generator shared by every work item.
pub const DEFAULT_SEED: u64 = 7777;

/// Number of 2D points sampled when none (or zero) is requested.
pub const DEFAULT_POINTS: u64 = 120_000_000;

/// Reference value of π the estimate is compared against.
pub const REFERENCE_PI: f64 = std::f64::consts::PI;

/// Estimator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// Generator seed.
    pub seed: u64,
    /// Sample count substituted for a zero request.
    pub default_points: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            default_points: DEFAULT_POINTS,
        }
    }
}

impl EstimatorConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EstimatorConfigBuilder {
        EstimatorConfigBuilder::new()
    }

    /// Map a requested sample count to the one actually used.
    ///
    /// Zero is not an error: it falls back to `default_points`.
    pub fn resolve_points(&self, requested: u64) -> u64 {
        if requested == 0 {
            self.default_points
        } else {
            requested
        }
    }
}

/// Builder for [`EstimatorConfig`].
#[derive(Debug, Clone, Default)]
pub struct EstimatorConfigBuilder {
    config: EstimatorConfig,
}

impl EstimatorConfigBuilder {
    /// Create a builder seeded with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the generator seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the fallback sample count.
    pub fn default_points(mut self, points: u64) -> Self {
        self.config.default_points = points;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> EstimatorConfig {
        self.config
    }
}
