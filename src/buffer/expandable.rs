//! Grow-on-write byte region.
//!
//! Writes beyond the current capacity grow the backing geometrically up
//! to a declared maximum; reads never grow.  Growth preserves every
//! existing byte and zero-fills the extension, and a refused growth (past
//! the maximum) leaves the region exactly as it was.

use super::{bounds_check, BufferError, Region, RegionMut};

/// Capacity a default-constructed expandable buffer starts with, and the
/// floor the growth schedule starts from.
pub const INITIAL_CAPACITY: usize = 128;

/// Largest capacity an expandable buffer may reach: the widest length a
/// 4-byte wire prefix can carry, less a small allocator-header margin.
pub const MAX_BUFFER_LENGTH: usize = (i32::MAX - 8) as usize;

/// An owned byte region that grows on write.
///
/// There are no wrap constructors: an expandable buffer always owns its
/// storage, so adopting a foreign slice or address range is rejected at
/// compile time rather than at run time.
pub struct ExpandableBuffer {
    data: Vec<u8>,
    max_capacity: usize,
}

impl ExpandableBuffer {
    /// An expandable buffer with [`INITIAL_CAPACITY`] zeroed bytes.
    pub fn new() -> Self {
        Self::with_initial_capacity(INITIAL_CAPACITY)
    }

    /// An expandable buffer starting at `initial_capacity` zeroed bytes.
    pub fn with_initial_capacity(initial_capacity: usize) -> Self {
        Self::with_max_capacity(initial_capacity, MAX_BUFFER_LENGTH)
    }

    /// An expandable buffer with an explicit growth ceiling.
    pub fn with_max_capacity(initial_capacity: usize, max_capacity: usize) -> Self {
        Self {
            data: vec![0u8; initial_capacity.min(max_capacity)],
            max_capacity,
        }
    }

    /// The capacity this buffer may grow to.
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// The written-so-far backing as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Default for ExpandableBuffer {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl Region for ExpandableBuffer {
    fn base_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

unsafe impl RegionMut for ExpandableBuffer {
    fn base_ptr_mut(&mut self) -> *mut u8 {
        self.data.as_mut_ptr()
    }

    /// Grows to cover `[index, index + length)` when needed.
    ///
    /// The schedule starts from at least [`INITIAL_CAPACITY`] and adds
    /// half the current capacity until the request fits, clamped to the
    /// declared maximum.  A request past the maximum fails without
    /// touching the buffer.
    fn ensure_capacity(&mut self, index: usize, length: usize) -> Result<(), BufferError> {
        let required = match index.checked_add(length) {
            Some(required) => required,
            None => return bounds_check(index, length, self.capacity()),
        };
        if required <= self.data.len() {
            return Ok(());
        }
        if required > self.max_capacity {
            return Err(BufferError::MaxCapacityExceeded {
                required,
                max: self.max_capacity,
            });
        }
        let mut new_capacity = self.data.len().max(INITIAL_CAPACITY);
        while new_capacity < required {
            new_capacity = new_capacity.saturating_add(new_capacity / 2);
        }
        self.data.resize(new_capacity.min(self.max_capacity), 0);
        Ok(())
    }
}
