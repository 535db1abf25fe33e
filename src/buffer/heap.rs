//! Owned, fixed-capacity heap region.

use super::{Region, RegionMut};

/// A zero-initialised heap allocation exposed as a byte region.
///
/// The simplest owning backing: capacity is fixed at construction and the
/// storage is released when the buffer is dropped.
pub struct HeapBuffer {
    data: Box<[u8]>,
}

impl HeapBuffer {
    /// Allocates `capacity` zeroed bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    /// Takes ownership of existing bytes without copying.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: data.into_boxed_slice(),
        }
    }

    /// The underlying bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The underlying bytes, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

unsafe impl Region for HeapBuffer {
    fn base_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

unsafe impl RegionMut for HeapBuffer {
    fn base_ptr_mut(&mut self) -> *mut u8 {
        self.data.as_mut_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{BufferError, DirectBuffer, MutableBuffer};

    #[test]
    fn starts_zeroed() {
        let buffer = HeapBuffer::new(64);
        assert_eq!(buffer.capacity(), 64);
        assert!(buffer.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn typed_roundtrip() {
        let mut buffer = HeapBuffer::new(16);
        buffer.put_i64(0, -42).unwrap();
        buffer.put_i32(8, 7).unwrap();
        assert_eq!(buffer.get_i64(0).unwrap(), -42);
        assert_eq!(buffer.get_i32(8).unwrap(), 7);
    }

    #[test]
    fn rejects_out_of_bounds_write() {
        let mut buffer = HeapBuffer::new(8);
        assert_eq!(
            buffer.put_i64(1, 0),
            Err(BufferError::OutOfBounds {
                index: 1,
                length: 8,
                capacity: 8
            })
        );
    }

    #[test]
    fn from_vec_preserves_content() {
        let buffer = HeapBuffer::from_vec(vec![1, 2, 3, 4]);
        assert_eq!(buffer.get_u8(3).unwrap(), 4);
    }
}
