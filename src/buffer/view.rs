//! Borrowed, non-owning buffer views.
//!
//! A view wraps memory somebody else owns: a slice, a subrange of another
//! region, or a raw address range handed over by foreign code.  The
//! lifetime parameter ties the view to its owner so it can never outlive
//! the storage; views never grow.

use core::marker::PhantomData;

use super::{bounds_check, BufferError, Region, RegionMut};

/// A read-only borrowed view over contiguous bytes.
pub struct BufferView<'a> {
    ptr: *const u8,
    length: usize,
    adjustment: usize,
    _owner: PhantomData<&'a [u8]>,
}

impl<'a> BufferView<'a> {
    /// Wraps an existing slice.
    pub fn wrap(bytes: &'a [u8]) -> Self {
        Self {
            ptr: bytes.as_ptr(),
            length: bytes.len(),
            adjustment: 0,
            _owner: PhantomData,
        }
    }

    /// Wraps `length` bytes of another region starting at `offset`.
    ///
    /// The new view's index 0 is the owner's `offset`; wrap adjustments
    /// compose through nested subranges.
    pub fn wrap_region<R: Region + ?Sized>(
        region: &'a R,
        offset: usize,
        length: usize,
    ) -> Result<Self, BufferError> {
        bounds_check(offset, length, region.capacity())?;
        Ok(Self {
            // SAFETY: offset is within the region per the bounds check.
            ptr: unsafe { region.base_ptr().add(offset) },
            length,
            adjustment: region.wrap_adjustment() + offset,
            _owner: PhantomData,
        })
    }

    /// Wraps a raw address range.
    ///
    /// # Safety
    /// `address` must be valid for reads of `length` bytes for the
    /// lifetime `'a`, and must not be mutated through any other path
    /// while the view lives.
    pub unsafe fn wrap_raw(address: *const u8, length: usize) -> Self {
        Self {
            ptr: address,
            length,
            adjustment: 0,
            _owner: PhantomData,
        }
    }
}

unsafe impl Region for BufferView<'_> {
    fn base_ptr(&self) -> *const u8 {
        self.ptr
    }

    fn capacity(&self) -> usize {
        self.length
    }

    fn wrap_adjustment(&self) -> usize {
        self.adjustment
    }
}

/// A mutable borrowed view over contiguous bytes.
pub struct BufferViewMut<'a> {
    ptr: *mut u8,
    length: usize,
    adjustment: usize,
    _owner: PhantomData<&'a mut [u8]>,
}

impl<'a> BufferViewMut<'a> {
    /// Wraps an existing mutable slice.
    pub fn wrap(bytes: &'a mut [u8]) -> Self {
        Self {
            ptr: bytes.as_mut_ptr(),
            length: bytes.len(),
            adjustment: 0,
            _owner: PhantomData,
        }
    }

    /// Wraps `length` bytes of another mutable region starting at
    /// `offset`.  Writes through the view never grow the owner, whatever
    /// the owner's own growth policy.
    pub fn wrap_region<R: RegionMut + ?Sized>(
        region: &'a mut R,
        offset: usize,
        length: usize,
    ) -> Result<Self, BufferError> {
        bounds_check(offset, length, region.capacity())?;
        let adjustment = region.wrap_adjustment() + offset;
        Ok(Self {
            // SAFETY: offset is within the region per the bounds check.
            ptr: unsafe { region.base_ptr_mut().add(offset) },
            length,
            adjustment,
            _owner: PhantomData,
        })
    }

    /// Wraps a raw address range.
    ///
    /// # Safety
    /// `address` must be valid for reads and writes of `length` bytes for
    /// the lifetime `'a`, and must not be aliased while the view lives.
    pub unsafe fn wrap_raw(address: *mut u8, length: usize) -> Self {
        Self {
            ptr: address,
            length,
            adjustment: 0,
            _owner: PhantomData,
        }
    }
}

unsafe impl Region for BufferViewMut<'_> {
    fn base_ptr(&self) -> *const u8 {
        self.ptr
    }

    fn capacity(&self) -> usize {
        self.length
    }

    fn wrap_adjustment(&self) -> usize {
        self.adjustment
    }
}

unsafe impl RegionMut for BufferViewMut<'_> {
    fn base_ptr_mut(&mut self) -> *mut u8 {
        self.ptr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{DirectBuffer, HeapBuffer, MutableBuffer};

    #[test]
    fn wrap_slice_reads_through() {
        let bytes = [0x01u8, 0x02, 0x03, 0x04];
        let view = BufferView::wrap(&bytes);
        assert_eq!(view.capacity(), 4);
        assert_eq!(view.get_u8(0).unwrap(), 0x01);
        assert_eq!(view.get_u32(0).unwrap(), u32::from_ne_bytes([1, 2, 3, 4]));
    }

    #[test]
    fn wrap_region_subrange_composes_adjustment() {
        let mut owner = HeapBuffer::new(32);
        owner.put_u8(10, 0xAB).unwrap();
        let outer = BufferView::wrap_region(&owner, 8, 16).unwrap();
        assert_eq!(outer.wrap_adjustment(), 8);
        assert_eq!(outer.get_u8(2).unwrap(), 0xAB);
        let inner = BufferView::wrap_region(&outer, 2, 4).unwrap();
        assert_eq!(inner.wrap_adjustment(), 10);
        assert_eq!(inner.get_u8(0).unwrap(), 0xAB);
    }

    #[test]
    fn wrap_region_rejects_oversize_window() {
        let owner = HeapBuffer::new(8);
        assert!(BufferView::wrap_region(&owner, 4, 8).is_err());
        assert!(BufferView::wrap_region(&owner, 9, 0).is_err());
    }

    #[test]
    fn mutable_view_writes_into_owner() {
        let mut backing = [0u8; 16];
        {
            let mut view = BufferViewMut::wrap(&mut backing);
            view.put_i32(4, -1).unwrap();
        }
        assert_eq!(&backing[4..8], &[0xFF; 4]);
    }

    #[test]
    fn mutable_view_never_grows() {
        let mut backing = [0u8; 8];
        let mut view = BufferViewMut::wrap(&mut backing);
        assert!(view.put_u64(1, 0).is_err());
        assert_eq!(view.capacity(), 8);
    }

    #[test]
    fn raw_wrap_roundtrip() {
        let mut backing = [0u8; 8];
        // SAFETY: backing outlives the view and is not otherwise touched.
        let mut view = unsafe { BufferViewMut::wrap_raw(backing.as_mut_ptr(), backing.len()) };
        view.put_u16(0, 0xBEEF).unwrap();
        assert_eq!(view.get_u16(0).unwrap(), 0xBEEF);
    }
}
