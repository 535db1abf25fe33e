//! File-backed memory-mapped region.
//!
//! Wraps a read-write `memmap2` mapping of an on-disk file.  The mapping
//! is released deterministically by `close` (idempotent) or by `Drop`;
//! durability is explicit via `flush`.

use std::fs::OpenOptions;
use std::path::Path;

use memmap2::MmapMut;

use super::{BufferError, Region, RegionMut};

/// A memory-mapped file exposed as a byte region.
pub struct MappedBuffer {
    map: Option<MmapMut>,
}

impl MappedBuffer {
    /// Creates (or truncates) the file at `path`, sizes it to `length`
    /// bytes, and maps it read-write.
    pub fn create<P: AsRef<Path>>(path: P, length: u64) -> Result<Self, BufferError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(length)?;
        // SAFETY: the file was just created and sized by this process; the
        // caller owns coordination of any external mutation of the file.
        let map = unsafe { MmapMut::map_mut(&file)? };
        Ok(Self { map: Some(map) })
    }

    /// Maps an existing file read-write over its full length.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BufferError> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        // SAFETY: as in create; external mutation is the caller's contract.
        let map = unsafe { MmapMut::map_mut(&file)? };
        Ok(Self { map: Some(map) })
    }

    /// Flushes dirty pages back to the file.
    pub fn flush(&self) -> Result<(), BufferError> {
        if let Some(map) = &self.map {
            map.flush()?;
        }
        Ok(())
    }

    /// Unmaps the region.  Idempotent: every call after the first is a
    /// no-op.  A closed region reports zero capacity, so any further
    /// access fails the bounds check.
    pub fn close(&mut self) {
        self.map = None;
    }

    /// Whether the mapping has been released.
    pub fn is_closed(&self) -> bool {
        self.map.is_none()
    }
}

unsafe impl Region for MappedBuffer {
    fn base_ptr(&self) -> *const u8 {
        match &self.map {
            Some(map) => map.as_ptr(),
            None => core::ptr::NonNull::dangling().as_ptr(),
        }
    }

    fn capacity(&self) -> usize {
        self.map.as_ref().map_or(0, |map| map.len())
    }
}

unsafe impl RegionMut for MappedBuffer {
    fn base_ptr_mut(&mut self) -> *mut u8 {
        match &mut self.map {
            Some(map) => map.as_mut_ptr(),
            None => core::ptr::NonNull::dangling().as_ptr(),
        }
    }
}
