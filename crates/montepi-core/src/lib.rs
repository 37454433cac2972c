//! # montepi core
//!
//! Core traits and types for estimating π with a parallel Monte Carlo kernel.
//!
//! Points are sampled uniformly in the unit square; the fraction landing inside
//! the unit quarter-circle, scaled by 4, converges to π. The work is split into
//! work groups of parallel items, each item drawing from its own disjoint
//! counter-based random stream, and the per-group hit counts are combined by a
//! group reduction before a final host-side sum.
//!
//! ## Core Abstractions
//!
//! - [`ExecutionContext`] - Device facade: capability queries, grouped dispatch, fault channel
//! - [`PhiloxRng`] - Philox4x32-10 counter-based generator addressed by `(seed, offset)`
//! - [`WorkDecomposition`] - Work-group size/count and samples per item for a request
//! - [`GroupBuffer`] - Scoped per-group output buffer, released on every exit path
//! - [`PiEstimator`] - The sampling-and-counting estimator
//!
//! ## Example
//!
//! ```ignore
//! use montepi_core::prelude::*;
//! use montepi_cpu::CpuDevice;
//!
//! let device = CpuDevice::new()?;
//! let pi = estimate_pi(&device, 1_000_000)?;
//! assert!((pi - REFERENCE_PI).abs() < 0.05);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod decomposition;
pub mod error;
pub mod estimator;
pub mod memory;
pub mod reduction;
pub mod rng;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        EstimatorConfig, EstimatorConfigBuilder, DEFAULT_POINTS, DEFAULT_SEED, REFERENCE_PI,
    };
    pub use crate::context::{
        DeviceFault, DeviceInfo, ExecutionContext, FaultHandler, FaultList, NdRange, WorkItem,
    };
    pub use crate::decomposition::WorkDecomposition;
    pub use crate::error::{MontePiError, Result};
    pub use crate::estimator::{estimate_pi, PiEstimate, PiEstimator};
    pub use crate::memory::{BufferTracker, GroupBuffer};
    pub use crate::reduction::{group_sum, ReductionScalar};
    pub use crate::rng::{CounterRng, PhiloxRng, PhiloxState};
}

// Re-exports for convenience
pub use config::{EstimatorConfig, DEFAULT_POINTS, DEFAULT_SEED, REFERENCE_PI};
pub use context::{DeviceFault, DeviceInfo, ExecutionContext, FaultHandler, FaultList, NdRange, WorkItem};
pub use decomposition::WorkDecomposition;
pub use error::{MontePiError, Result};
pub use estimator::{estimate_pi, PiEstimate, PiEstimator};
pub use memory::{BufferTracker, GroupBuffer};
pub use reduction::{group_sum, ReductionScalar};
pub use rng::{CounterRng, PhiloxRng, PhiloxState};
