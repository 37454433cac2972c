//! Execution context abstraction.
//!
//! An [`ExecutionContext`] is the device the estimator runs on. It exposes
//! capability limits, a grouped dispatch primitive with a group-scoped
//! reduction, and an asynchronous fault channel. Any backend (CPU threads, a
//! GPU queue, a simulator) that satisfies this contract can run the estimator.

use std::fmt;
use std::sync::Arc;

use crate::error::{MontePiError, Result};
use crate::memory::{BufferTracker, GroupBuffer};
use crate::reduction::ReductionScalar;

/// Capability limits of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device name.
    pub name: String,
    /// Maximum number of items in one work group.
    pub max_work_group_size: usize,
    /// Number of compute units.
    pub max_compute_units: usize,
}

impl DeviceInfo {
    /// Create a new device info.
    pub fn new(name: impl Into<String>, max_work_group_size: usize, max_compute_units: usize) -> Self {
        Self {
            name: name.into(),
            max_work_group_size,
            max_compute_units,
        }
    }

    /// Check that both limits are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_work_group_size == 0 {
            return Err(MontePiError::InvalidConfig(format!(
                "Device '{}' reports max_work_group_size = 0",
                self.name
            )));
        }
        if self.max_compute_units == 0 {
            return Err(MontePiError::InvalidConfig(format!(
                "Device '{}' reports max_compute_units = 0",
                self.name
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} compute units, max work-group size {})",
            self.name, self.max_compute_units, self.max_work_group_size
        )
    }
}

/// One-dimensional launch geometry: `global_size` items in groups of `local_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdRange {
    /// Total number of items.
    pub global_size: usize,
    /// Items per work group.
    pub local_size: usize,
}

impl NdRange {
    /// Create a new range.
    pub fn new(global_size: usize, local_size: usize) -> Self {
        Self {
            global_size,
            local_size,
        }
    }

    /// Number of work groups.
    pub fn group_count(&self) -> usize {
        if self.local_size == 0 {
            0
        } else {
            self.global_size / self.local_size
        }
    }

    /// Check the range against a device's limits.
    pub fn validate(&self, info: &DeviceInfo) -> Result<()> {
        if self.local_size == 0 || self.global_size == 0 {
            return Err(MontePiError::Dispatch(format!(
                "Empty range (global={}, local={})",
                self.global_size, self.local_size
            )));
        }
        if self.global_size % self.local_size != 0 {
            return Err(MontePiError::Dispatch(format!(
                "Global size {} is not a multiple of local size {}",
                self.global_size, self.local_size
            )));
        }
        if self.local_size > info.max_work_group_size {
            return Err(MontePiError::Dispatch(format!(
                "Local size {} exceeds device max work-group size {}",
                self.local_size, info.max_work_group_size
            )));
        }
        Ok(())
    }
}

/// Identity of a single item inside a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    global_id: usize,
    local_id: usize,
    group_id: usize,
}

impl WorkItem {
    /// Create the item with `local_id` inside group `group_id` of `range`.
    pub fn new(range: NdRange, group_id: usize, local_id: usize) -> Self {
        Self {
            global_id: group_id * range.local_size + local_id,
            local_id,
            group_id,
        }
    }

    /// Unique index across the whole dispatch.
    #[inline]
    pub fn global_linear_id(&self) -> usize {
        self.global_id
    }

    /// Index within the work group.
    #[inline]
    pub fn local_linear_id(&self) -> usize {
        self.local_id
    }

    /// Index of the work group.
    #[inline]
    pub fn group_linear_id(&self) -> usize {
        self.group_id
    }

    /// The item that stores the group's reduced value.
    #[inline]
    pub fn is_group_leader(&self) -> bool {
        self.local_id == 0
    }
}

/// A fault raised on the device after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFault {
    /// Work group the fault was raised in, if known.
    pub group: Option<usize>,
    /// Device-supplied description.
    pub message: String,
}

impl DeviceFault {
    /// Fault attributed to a work group.
    pub fn in_group(group: usize, message: impl Into<String>) -> Self {
        Self {
            group: Some(group),
            message: message.into(),
        }
    }
}

impl fmt::Display for DeviceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.group {
            Some(group) => write!(f, "work group {}: {}", group, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Faults collected between two join points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultList(pub Vec<DeviceFault>);

impl FaultList {
    /// Number of faults.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the faults.
    pub fn iter(&self) -> std::slice::Iter<'_, DeviceFault> {
        self.0.iter()
    }
}

impl fmt::Display for FaultList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fault(s)", self.0.len())?;
        for (i, fault) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, fault)?;
        }
        Ok(())
    }
}

/// Callback invoked with the faults found at a join point.
///
/// A production handler logs the faults and terminates the process; the
/// context still returns [`MontePiError::DeviceFaults`] if the handler returns.
pub type FaultHandler = Arc<dyn Fn(&FaultList) + Send + Sync>;

/// A device the estimator can dispatch onto.
pub trait ExecutionContext: Send + Sync {
    /// Capability limits of the device.
    fn device_info(&self) -> &DeviceInfo;

    /// Maximum number of items in one work group.
    fn max_work_group_size(&self) -> usize {
        self.device_info().max_work_group_size
    }

    /// Number of compute units.
    fn max_compute_units(&self) -> usize {
        self.device_info().max_compute_units
    }

    /// Tracker for buffers staged on this device.
    fn buffers(&self) -> &BufferTracker;

    /// Run `kernel` for every item of `range` and sum per group.
    ///
    /// Each item's return value takes part in a group-scoped sum; the leader
    /// of group `g` stores the result in `out[g]`. Launch errors
    /// are returned directly. Faults raised while items run are queued and
    /// surface at the next [`wait`](Self::wait).
    fn launch_group_sum<T, K>(
        &self,
        range: NdRange,
        kernel: &K,
        out: &mut GroupBuffer<'_, T>,
    ) -> Result<()>
    where
        T: ReductionScalar,
        K: Fn(&WorkItem) -> T + Sync;

    /// Block until submitted work completes and deliver pending faults.
    ///
    /// Faults are passed to the registered [`FaultHandler`], then returned as
    /// [`MontePiError::DeviceFaults`].
    fn wait(&self) -> Result<()>;
}
