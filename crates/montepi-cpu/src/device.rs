//! CPU device implementation.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, error, info};

use montepi_core::context::{
    DeviceFault, DeviceInfo, ExecutionContext, FaultHandler, FaultList, NdRange, WorkItem,
};
use montepi_core::error::{MontePiError, Result};
use montepi_core::memory::{BufferTracker, GroupBuffer};
use montepi_core::reduction::{group_sum, ReductionScalar};

/// Work-group size limit reported when none is configured.
pub const DEFAULT_MAX_WORK_GROUP_SIZE: usize = 256;

/// Counters for work executed on a [`CpuDevice`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuMetrics {
    /// Dispatches accepted.
    pub dispatches: u64,
    /// Items executed across all dispatches.
    pub items_executed: u64,
    /// Faults raised by work groups.
    pub faults_reported: u64,
}

/// CPU-based implementation of [`ExecutionContext`].
///
/// Each work group is a task on the device's thread pool; the items of a
/// group run in parallel and their values are combined in local-id order, so
/// results depend only on the reported limits, never on the pool size.
pub struct CpuDevice {
    /// Reported capability limits.
    info: DeviceInfo,
    /// Pool the work groups run on.
    pool: rayon::ThreadPool,
    /// Staged buffers.
    buffers: BufferTracker,
    /// Faults raised since the last join point.
    pending: Mutex<Vec<DeviceFault>>,
    /// Asynchronous fault handler.
    fault_handler: Option<FaultHandler>,
    /// Total dispatches.
    dispatches: AtomicU64,
    /// Total items executed.
    items_executed: AtomicU64,
    /// Total faults raised.
    faults_reported: AtomicU64,
}

impl CpuDevice {
    /// Create a CPU device with detected limits and no fault handler.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a new device builder.
    pub fn builder() -> CpuDeviceBuilder {
        CpuDeviceBuilder::new()
    }

    /// Number of pool threads.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Snapshot of the device counters.
    pub fn metrics(&self) -> CpuMetrics {
        CpuMetrics {
            dispatches: self.dispatches.load(Ordering::Relaxed),
            items_executed: self.items_executed.load(Ordering::Relaxed),
            faults_reported: self.faults_reported.load(Ordering::Relaxed),
        }
    }

    fn record_faults(&self, faults: Vec<DeviceFault>) {
        for fault in &faults {
            error!("CPU device '{}' fault in {}", self.info.name, fault);
        }
        self.faults_reported
            .fetch_add(faults.len() as u64, Ordering::Relaxed);
        self.pending.lock().extend(faults);
    }
}

impl fmt::Debug for CpuDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuDevice")
            .field("info", &self.info)
            .field("threads", &self.threads())
            .field("has_fault_handler", &self.fault_handler.is_some())
            .field("metrics", &self.metrics())
            .finish()
    }
}

/// Run every item of one group; the group leader stores the group sum in `slot`.
fn run_group<T, K>(range: NdRange, group: usize, kernel: &K, slot: &mut T)
where
    T: ReductionScalar,
    K: Fn(&WorkItem) -> T + Sync,
{
    let items: Vec<WorkItem> = (0..range.local_size)
        .map(|local| WorkItem::new(range, group, local))
        .collect();
    let values: Vec<T> = items.par_iter().map(kernel).collect();
    let total = group_sum(&values);

    if items.iter().any(WorkItem::is_group_leader) {
        *slot = total;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "work item panicked".to_string()
    }
}

impl ExecutionContext for CpuDevice {
    fn device_info(&self) -> &DeviceInfo {
        &self.info
    }

    fn buffers(&self) -> &BufferTracker {
        &self.buffers
    }

    fn launch_group_sum<T, K>(
        &self,
        range: NdRange,
        kernel: &K,
        out: &mut GroupBuffer<'_, T>,
    ) -> Result<()>
    where
        T: ReductionScalar,
        K: Fn(&WorkItem) -> T + Sync,
    {
        range.validate(&self.info)?;

        let groups = range.group_count();
        if out.len() != groups {
            return Err(MontePiError::Dispatch(format!(
                "Output buffer has {} slots for {} work groups",
                out.len(),
                groups
            )));
        }

        debug!(
            "Dispatching group sum on CPU device '{}' (groups={}, local={})",
            self.info.name, groups, range.local_size
        );
        self.dispatches.fetch_add(1, Ordering::Relaxed);

        let faults: Vec<DeviceFault> = self.pool.install(|| {
            out.as_mut_slice()
                .par_iter_mut()
                .enumerate()
                .filter_map(|(group, slot)| {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                        run_group(range, group, kernel, &mut *slot)
                    }));
                    match outcome {
                        Ok(()) => None,
                        Err(payload) => {
                            *slot = T::ZERO;
                            Some(DeviceFault::in_group(group, panic_message(payload.as_ref())))
                        }
                    }
                })
                .collect()
        });

        self.items_executed
            .fetch_add(range.global_size as u64, Ordering::Relaxed);

        if !faults.is_empty() {
            self.record_faults(faults);
        }
        Ok(())
    }

    fn wait(&self) -> Result<()> {
        let faults = std::mem::take(&mut *self.pending.lock());
        if faults.is_empty() {
            return Ok(());
        }

        let faults = FaultList(faults);
        if let Some(handler) = &self.fault_handler {
            handler(&faults);
        }
        Err(MontePiError::DeviceFaults(faults))
    }
}

/// Builder for [`CpuDevice`].
#[derive(Default)]
pub struct CpuDeviceBuilder {
    name: Option<String>,
    max_work_group_size: Option<usize>,
    max_compute_units: Option<usize>,
    threads: Option<usize>,
    fault_handler: Option<FaultHandler>,
}

impl CpuDeviceBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reported device name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the reported maximum work-group size.
    pub fn max_work_group_size(mut self, size: usize) -> Self {
        self.max_work_group_size = Some(size);
        self
    }

    /// Set the reported number of compute units (defaults to the thread count).
    pub fn max_compute_units(mut self, units: usize) -> Self {
        self.max_compute_units = Some(units);
        self
    }

    /// Set the number of pool threads (defaults to the available parallelism).
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Register the asynchronous fault handler.
    pub fn fault_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&FaultList) + Send + Sync + 'static,
    {
        self.fault_handler = Some(std::sync::Arc::new(handler));
        self
    }

    /// Build the device.
    pub fn build(self) -> Result<CpuDevice> {
        let threads = match self.threads {
            Some(0) => {
                return Err(MontePiError::InvalidConfig(
                    "CPU device needs at least one thread".to_string(),
                ))
            }
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };

        let info = DeviceInfo::new(
            self.name.unwrap_or_else(|| "cpu".to_string()),
            self.max_work_group_size
                .unwrap_or(DEFAULT_MAX_WORK_GROUP_SIZE),
            self.max_compute_units.unwrap_or(threads),
        );
        info.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("montepi-cpu-{}", i))
            .build()
            .map_err(|e| MontePiError::DeviceUnavailable(e.to_string()))?;

        info!("Initializing CPU device {} on {} threads", info, threads);

        Ok(CpuDevice {
            info,
            pool,
            buffers: BufferTracker::new(),
            pending: Mutex::new(Vec::new()),
            fault_handler: self.fault_handler,
            dispatches: AtomicU64::new(0),
            items_executed: AtomicU64::new(0),
            faults_reported: AtomicU64::new(0),
        })
    }
}
