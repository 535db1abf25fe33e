// Integration tests for the 64-bit shared-field accessors: alignment
// validation, single-threaded semantics of the atomic operations, and the
// heartbeat publish/observe pattern across two mappings of one region.

use ballast::{AlignedBuffer, AtomicBuffer, BufferError, BufferViewMut, HeapBuffer, RegionMut};

#[test]
fn volatile_roundtrip_on_aligned_field() {
    let mut buffer = AlignedBuffer::new(64, 8).unwrap();
    buffer.put_i64_ordered(0, 42).unwrap();
    assert_eq!(buffer.get_i64_volatile(0).unwrap(), 42);
    buffer.put_i64_volatile(8, -1).unwrap();
    assert_eq!(buffer.get_i64_volatile(8).unwrap(), -1);
}

/// An 8-byte-aligned base plus a misaligned index is rejected.
#[test]
fn unaligned_index_is_rejected() {
    let mut buffer = AlignedBuffer::new(64, 8).unwrap();
    for index in [1usize, 2, 3, 4, 7, 12] {
        assert_eq!(
            buffer.get_i64_volatile(index).unwrap_err(),
            BufferError::UnalignedAccess { index, required: 8 },
            "index {index}"
        );
    }
    assert!(buffer.get_i64_volatile(16).is_ok());
}

#[test]
fn out_of_bounds_is_detected_before_alignment() {
    let mut buffer = AlignedBuffer::new(16, 8).unwrap();
    assert_eq!(
        buffer.put_i64_ordered(16, 0).unwrap_err(),
        BufferError::OutOfBounds {
            index: 16,
            length: 8,
            capacity: 16
        }
    );
}

#[test]
fn add_and_compare_and_set() {
    let mut buffer = AlignedBuffer::new(32, 8).unwrap();
    buffer.put_i64_ordered(0, 10).unwrap();
    assert_eq!(buffer.get_and_add_i64(0, 5).unwrap(), 10);
    buffer.add_i64_ordered(0, 1).unwrap();
    assert_eq!(buffer.get_i64_volatile(0).unwrap(), 16);

    assert!(buffer.compare_and_set_i64(0, 16, 99).unwrap());
    assert!(!buffer.compare_and_set_i64(0, 16, 7).unwrap());
    assert_eq!(buffer.get_i64_volatile(0).unwrap(), 99);
}

/// The heartbeat pattern: a writer publishes through one view and an
/// observer reads through another view of the same storage.
#[test]
fn ordered_store_is_visible_through_second_view() {
    let mut buffer = AlignedBuffer::new(64, 64).unwrap();
    let base = buffer.base_ptr_mut();

    buffer.put_i64_ordered(8, 0x5EED).unwrap();

    // SAFETY: the view lives within this test while `buffer` stays alive,
    // and only atomic accessors touch the shared word.
    let mut observer = unsafe { BufferViewMut::wrap_raw(base, 64) };
    assert_eq!(observer.get_i64_volatile(8).unwrap(), 0x5EED);

    observer.put_i64_ordered(8, 0xBEA7).unwrap();
    assert_eq!(buffer.get_i64_volatile(8).unwrap(), 0xBEA7);
}

/// Atomic accessors work on any RegionMut backing, with growth applying
/// on the expandable path via ensure_capacity.
#[test]
fn heap_backing_supports_atomics_when_aligned() {
    let mut buffer = HeapBuffer::new(64);
    let base = buffer.base_ptr_mut() as usize;
    // Find an index that lands the field on an 8-byte boundary.
    let index = (8 - (base & 7)) & 7;
    buffer.put_i64_ordered(index, 7).unwrap();
    assert_eq!(buffer.get_i64_volatile(index).unwrap(), 7);
}
