//! Owned off-heap region with caller-chosen alignment.
//!
//! Backed directly by the global allocator rather than a `Vec` so the
//! alignment can exceed the natural alignment of `u8`, for page- or
//! cache-line-aligned regions for collaborators that require it.  Release
//! is deterministic: `close` frees the backing immediately and is a no-op
//! on every subsequent call; `Drop` closes as a backstop.

use core::ptr::NonNull;
use std::alloc::{alloc_zeroed, dealloc, Layout};

use super::{BufferError, Region, RegionMut};
use crate::bits;

/// An off-heap allocation exposed as a byte region.
#[derive(Debug)]
pub struct AlignedBuffer {
    ptr: NonNull<u8>,
    capacity: usize,
    layout: Layout,
    released: bool,
}

impl AlignedBuffer {
    /// Allocates `capacity` zeroed bytes aligned to `alignment`.
    ///
    /// `alignment` must be a power of two; allocator refusal surfaces as
    /// [`BufferError::AllocationFailed`].
    pub fn new(capacity: usize, alignment: usize) -> Result<Self, BufferError> {
        if !bits::is_power_of_two(alignment) {
            return Err(BufferError::InvalidAlignment(alignment));
        }
        let layout = Layout::from_size_align(capacity.max(1), alignment)
            .map_err(|_| BufferError::InvalidAlignment(alignment))?;
        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(BufferError::AllocationFailed { capacity })?;
        Ok(Self {
            ptr,
            capacity,
            layout,
            released: false,
        })
    }

    /// Allocates a cache-line-aligned region.
    pub fn new_cache_aligned(capacity: usize) -> Result<Self, BufferError> {
        Self::new(capacity, bits::CACHE_LINE_LENGTH)
    }

    /// The alignment the backing allocation was requested with.
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    /// Releases the backing memory.  Idempotent: every call after the
    /// first is a no-op.  A released region reports zero capacity, so any
    /// further access fails the bounds check.
    pub fn close(&mut self) {
        if !self.released {
            // SAFETY: ptr was allocated with this layout and not yet freed.
            unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
            self.ptr = NonNull::dangling();
            self.capacity = 0;
            self.released = true;
        }
    }

    /// Whether the backing memory has been released.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        self.close();
    }
}

unsafe impl Region for AlignedBuffer {
    fn base_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

unsafe impl RegionMut for AlignedBuffer {
    fn base_ptr_mut(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }
}
