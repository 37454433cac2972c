//! CPU execution context for montepi.
//!
//! Runs work groups on a dedicated rayon thread pool, reporting itself with
//! configurable capability limits so that decompositions computed for other
//! devices can be reproduced exactly on the host. It is the default backend
//! and the reference backend for tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod device;

pub use device::{CpuDevice, CpuDeviceBuilder, CpuMetrics, DEFAULT_MAX_WORK_GROUP_SIZE};
