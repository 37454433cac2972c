//! Error types for montepi.

use thiserror::Error;

use crate::context::FaultList;

/// Result type alias for montepi operations.
pub type Result<T> = std::result::Result<T, MontePiError>;

/// Errors raised while planning, dispatching or collecting an estimate.
#[derive(Error, Debug)]
pub enum MontePiError {
    /// Invalid caller-supplied parameter (e.g. a zero sample count).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid device or launch configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No usable device could be created.
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The per-group output buffer could not be reserved.
    #[error("Failed to allocate output buffer of {len} slots")]
    BufferAllocation {
        /// Requested number of slots.
        len: usize,
    },

    /// Synchronous dispatch failure.
    #[error("Dispatch failed: {0}")]
    Dispatch(String),

    /// Asynchronous faults reported by the device at the join point.
    #[error("Device reported {}", .0)]
    DeviceFaults(FaultList),
}

impl MontePiError {
    /// Whether this error originated on the device after dispatch.
    pub fn is_device_fault(&self) -> bool {
        matches!(self, MontePiError::DeviceFaults(_))
    }
}
