//! Ordered and volatile 64-bit field accessors.
//!
//! High-throughput collaborators publish heartbeat timestamps and
//! counters through plain buffer memory: one writer stores with release
//! ordering, any number of observers load with acquire ordering.  Every
//! accessor validates bounds and the natural 8-byte alignment of the
//! resolved address; atomicity is only guaranteed on aligned words.

use core::sync::atomic::{AtomicI64, Ordering};

use super::{BufferError, RegionMut};
use crate::bits;

#[inline]
fn atomic_at<B: AtomicBuffer + ?Sized>(
    buffer: &mut B,
    index: usize,
) -> Result<*mut i64, BufferError> {
    buffer.ensure_capacity(index, 8)?;
    let address = buffer.base_ptr_mut().wrapping_add(index);
    if !bits::is_aligned(address as usize, 8) {
        return Err(BufferError::UnalignedAccess { index, required: 8 });
    }
    Ok(address as *mut i64)
}

/// Shared-field access to 8-byte-aligned 64-bit values.
///
/// The buffer itself stays single-writer; these accessors exist so a
/// field inside it can be observed concurrently through another mapping
/// of the same memory.
pub trait AtomicBuffer: RegionMut {
    /// Acquire load: no subsequent load from this thread is reordered
    /// before it.
    fn get_i64_volatile(&mut self, index: usize) -> Result<i64, BufferError> {
        let ptr = atomic_at(self, index)?;
        // SAFETY: in bounds and 8-byte aligned per atomic_at.
        Ok(unsafe { &*(ptr as *const AtomicI64) }.load(Ordering::Acquire))
    }

    /// Release store: no prior store from this thread is reordered after
    /// it, so an acquire load that observes the value observes everything
    /// written before it.
    fn put_i64_ordered(&mut self, index: usize, value: i64) -> Result<(), BufferError> {
        let ptr = atomic_at(self, index)?;
        // SAFETY: in bounds and 8-byte aligned per atomic_at.
        unsafe { &*(ptr as *const AtomicI64) }.store(value, Ordering::Release);
        Ok(())
    }

    /// Sequentially consistent store.
    fn put_i64_volatile(&mut self, index: usize, value: i64) -> Result<(), BufferError> {
        let ptr = atomic_at(self, index)?;
        // SAFETY: in bounds and 8-byte aligned per atomic_at.
        unsafe { &*(ptr as *const AtomicI64) }.store(value, Ordering::SeqCst);
        Ok(())
    }

    /// Adds `delta` with release ordering, without returning the previous
    /// value.
    fn add_i64_ordered(&mut self, index: usize, delta: i64) -> Result<(), BufferError> {
        let ptr = atomic_at(self, index)?;
        // SAFETY: in bounds and 8-byte aligned per atomic_at.
        unsafe { &*(ptr as *const AtomicI64) }.fetch_add(delta, Ordering::Release);
        Ok(())
    }

    /// Atomically adds `delta` and returns the previous value.
    fn get_and_add_i64(&mut self, index: usize, delta: i64) -> Result<i64, BufferError> {
        let ptr = atomic_at(self, index)?;
        // SAFETY: in bounds and 8-byte aligned per atomic_at.
        Ok(unsafe { &*(ptr as *const AtomicI64) }.fetch_add(delta, Ordering::AcqRel))
    }

    /// Atomically replaces `expected` with `update`; returns `true` on
    /// success.
    fn compare_and_set_i64(
        &mut self,
        index: usize,
        expected: i64,
        update: i64,
    ) -> Result<bool, BufferError> {
        let ptr = atomic_at(self, index)?;
        // SAFETY: in bounds and 8-byte aligned per atomic_at.
        let result = unsafe { &*(ptr as *const AtomicI64) }.compare_exchange(
            expected,
            update,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        Ok(result.is_ok())
    }
}

impl<T: RegionMut + ?Sized> AtomicBuffer for T {}
