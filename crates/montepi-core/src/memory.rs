//! Scoped output buffers.
//!
//! The per-group result slots live in a [`GroupBuffer`], an RAII wrapper that
//! is registered with the device's [`BufferTracker`] on acquisition and
//! released on drop. Release therefore happens on every exit path of the
//! estimator, including the early returns taken on faults.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::error::{MontePiError, Result};

/// Bookkeeping for buffers staged on a device.
#[derive(Debug, Default)]
pub struct BufferTracker {
    /// Buffers currently held.
    live: AtomicUsize,
    /// Total acquisitions.
    acquired: AtomicU64,
    /// Total releases.
    released: AtomicU64,
    /// Bytes currently held.
    live_bytes: AtomicUsize,
}

impl BufferTracker {
    /// Create a new tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers currently held.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Bytes currently held.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::Acquire)
    }

    /// Total acquisitions.
    pub fn acquired(&self) -> u64 {
        self.acquired.load(Ordering::Relaxed)
    }

    /// Total releases.
    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    fn on_acquire(&self, bytes: usize) {
        self.acquired.fetch_add(1, Ordering::Relaxed);
        self.live_bytes.fetch_add(bytes, Ordering::AcqRel);
        self.live.fetch_add(1, Ordering::AcqRel);
    }

    fn on_release(&self, bytes: usize) {
        self.live.fetch_sub(1, Ordering::AcqRel);
        self.live_bytes.fetch_sub(bytes, Ordering::AcqRel);
        self.released.fetch_add(1, Ordering::Relaxed);
    }
}

/// One slot per work group, filled by the group leaders.
///
/// When dropped, the buffer is released back to its tracker.
pub struct GroupBuffer<'a, T: Copy> {
    data: Vec<T>,
    tracker: &'a BufferTracker,
}

impl<'a, T: Copy> GroupBuffer<'a, T> {
    /// Acquire `len` slots initialised to `fill`.
    ///
    /// Fails with [`MontePiError::BufferAllocation`] if the slots cannot be
    /// reserved; nothing is registered with the tracker in that case.
    pub fn acquire(tracker: &'a BufferTracker, len: usize, fill: T) -> Result<Self> {
        if len == 0 {
            return Err(MontePiError::InvalidConfig(
                "Cannot allocate zero-sized buffer".to_string(),
            ));
        }

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| MontePiError::BufferAllocation { len })?;
        data.resize(len, fill);

        tracker.on_acquire(Self::bytes_for(len));
        Ok(Self { data, tracker })
    }

    /// Get slice reference.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get mutable slice reference.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get number of slots.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get size in bytes.
    pub fn size_bytes(&self) -> usize {
        Self::bytes_for(self.data.len())
    }

    fn bytes_for(len: usize) -> usize {
        len * std::mem::size_of::<T>()
    }
}

impl<'a, T: Copy> Drop for GroupBuffer<'a, T> {
    fn drop(&mut self) {
        self.tracker.on_release(self.size_bytes());
    }
}

impl<'a, T: Copy> Deref for GroupBuffer<'a, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<'a, T: Copy> DerefMut for GroupBuffer<'a, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<'a, T: Copy + std::fmt::Debug> std::fmt::Debug for GroupBuffer<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupBuffer")
            .field("len", &self.data.len())
            .field("data", &self.data)
            .finish()
    }
}
