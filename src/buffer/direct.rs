//! Read-side typed accessor surface.
//!
//! [`DirectBuffer`] is blanket-implemented for every [`Region`], so heap,
//! off-heap, mapped, borrowed and expandable backings all share the same
//! bounds-checked accessors.  Multi-byte loads go through the unaligned
//! primitives in `mem`; non-native byte order is realized by swapping the
//! natively loaded value.

use core::cmp::Ordering;

use super::{bounds_check, mem, BufferError, ByteOrder, Region, RegionMut};
use crate::ascii;

/// Reads the 4-byte length prefix of a length-prefixed string and rejects
/// negative values through the bounds check.
fn length_prefix<B: DirectBuffer + ?Sized>(
    buffer: &B,
    index: usize,
    order: ByteOrder,
) -> Result<usize, BufferError> {
    let prefix = buffer.get_i32_order(index, order)?;
    usize::try_from(prefix).map_err(|_| BufferError::OutOfBounds {
        index,
        length: prefix as u32 as usize,
        capacity: buffer.capacity(),
    })
}

fn ascii_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Typed, bounds-checked read access over a byte region.
pub trait DirectBuffer: Region {
    /// Validates `[index, index + length)` against this region's capacity.
    #[inline]
    fn bounds_check(&self, index: usize, length: usize) -> Result<(), BufferError> {
        bounds_check(index, length, self.capacity())
    }

    /// Borrows `length` bytes starting at `index`.
    #[inline]
    fn byte_slice(&self, index: usize, length: usize) -> Result<&[u8], BufferError> {
        self.bounds_check(index, length)?;
        // SAFETY: Region guarantees base_ptr is valid for capacity bytes
        // and the range was just checked.
        Ok(unsafe { core::slice::from_raw_parts(self.base_ptr().add(index), length) })
    }

    // ── Single bytes ─────────────────────────────────────────────────────────

    #[inline]
    fn get_u8(&self, index: usize) -> Result<u8, BufferError> {
        self.bounds_check(index, 1)?;
        // SAFETY: in bounds per the check above.
        Ok(unsafe { *self.base_ptr().add(index) })
    }

    #[inline]
    fn get_i8(&self, index: usize) -> Result<i8, BufferError> {
        Ok(self.get_u8(index)? as i8)
    }

    // ── 16-bit ───────────────────────────────────────────────────────────────

    /// Native-order load.
    #[inline]
    fn get_u16(&self, index: usize) -> Result<u16, BufferError> {
        self.bounds_check(index, 2)?;
        // SAFETY: in bounds per the check above.
        Ok(unsafe { mem::load_u16(self.base_ptr().add(index)) })
    }

    #[inline]
    fn get_u16_order(&self, index: usize, order: ByteOrder) -> Result<u16, BufferError> {
        Ok(order.apply_u16(self.get_u16(index)?))
    }

    #[inline]
    fn get_i16(&self, index: usize) -> Result<i16, BufferError> {
        Ok(self.get_u16(index)? as i16)
    }

    #[inline]
    fn get_i16_order(&self, index: usize, order: ByteOrder) -> Result<i16, BufferError> {
        Ok(self.get_u16_order(index, order)? as i16)
    }

    // ── 32-bit ───────────────────────────────────────────────────────────────

    /// Native-order load.
    #[inline]
    fn get_u32(&self, index: usize) -> Result<u32, BufferError> {
        self.bounds_check(index, 4)?;
        // SAFETY: in bounds per the check above.
        Ok(unsafe { mem::load_u32(self.base_ptr().add(index)) })
    }

    #[inline]
    fn get_u32_order(&self, index: usize, order: ByteOrder) -> Result<u32, BufferError> {
        Ok(order.apply_u32(self.get_u32(index)?))
    }

    #[inline]
    fn get_i32(&self, index: usize) -> Result<i32, BufferError> {
        Ok(self.get_u32(index)? as i32)
    }

    #[inline]
    fn get_i32_order(&self, index: usize, order: ByteOrder) -> Result<i32, BufferError> {
        Ok(self.get_u32_order(index, order)? as i32)
    }

    #[inline]
    fn get_f32(&self, index: usize) -> Result<f32, BufferError> {
        Ok(f32::from_bits(self.get_u32(index)?))
    }

    #[inline]
    fn get_f32_order(&self, index: usize, order: ByteOrder) -> Result<f32, BufferError> {
        Ok(f32::from_bits(self.get_u32_order(index, order)?))
    }

    // ── 64-bit ───────────────────────────────────────────────────────────────

    /// Native-order load.
    #[inline]
    fn get_u64(&self, index: usize) -> Result<u64, BufferError> {
        self.bounds_check(index, 8)?;
        // SAFETY: in bounds per the check above.
        Ok(unsafe { mem::load_u64(self.base_ptr().add(index)) })
    }

    #[inline]
    fn get_u64_order(&self, index: usize, order: ByteOrder) -> Result<u64, BufferError> {
        Ok(order.apply_u64(self.get_u64(index)?))
    }

    #[inline]
    fn get_i64(&self, index: usize) -> Result<i64, BufferError> {
        Ok(self.get_u64(index)? as i64)
    }

    #[inline]
    fn get_i64_order(&self, index: usize, order: ByteOrder) -> Result<i64, BufferError> {
        Ok(self.get_u64_order(index, order)? as i64)
    }

    #[inline]
    fn get_f64(&self, index: usize) -> Result<f64, BufferError> {
        Ok(f64::from_bits(self.get_u64(index)?))
    }

    #[inline]
    fn get_f64_order(&self, index: usize, order: ByteOrder) -> Result<f64, BufferError> {
        Ok(f64::from_bits(self.get_u64_order(index, order)?))
    }

    // ── Byte ranges ──────────────────────────────────────────────────────────

    /// Copies `dst.len()` bytes starting at `index` into `dst`.
    fn get_bytes(&self, index: usize, dst: &mut [u8]) -> Result<(), BufferError> {
        self.bounds_check(index, dst.len())?;
        // SAFETY: source range checked; dst is an exclusive borrow.
        unsafe { mem::copy(self.base_ptr().add(index), dst.as_mut_ptr(), dst.len()) };
        Ok(())
    }

    /// Copies `length` bytes starting at `index` into another region at
    /// `dst_index`.  The destination's grow hook is consulted, so an
    /// expandable destination expands to fit.
    fn get_bytes_into<R: RegionMut + ?Sized>(
        &self,
        index: usize,
        dst: &mut R,
        dst_index: usize,
        length: usize,
    ) -> Result<(), BufferError> {
        self.bounds_check(index, length)?;
        dst.ensure_capacity(dst_index, length)?;
        // SAFETY: both ranges validated; copy tolerates overlap.
        unsafe {
            mem::copy(
                self.base_ptr().add(index),
                dst.base_ptr_mut().add(dst_index),
                length,
            )
        };
        Ok(())
    }

    // ── Comparison and hashing ───────────────────────────────────────────────

    /// Lexicographic byte comparison; on a common prefix the shorter
    /// region orders first.
    fn compare_buffer<R: Region + ?Sized>(&self, other: &R) -> Ordering {
        // SAFETY: whole-capacity borrows of both regions.
        let a = unsafe { core::slice::from_raw_parts(self.base_ptr(), self.capacity()) };
        let b = unsafe { core::slice::from_raw_parts(other.base_ptr(), other.capacity()) };
        a.cmp(b)
    }

    /// Polynomial rolling hash `h = 31·h + byte` over every byte, with
    /// bytes taken as signed.
    fn hash_code(&self) -> i32 {
        // SAFETY: whole-capacity borrow.
        let bytes = unsafe { core::slice::from_raw_parts(self.base_ptr(), self.capacity()) };
        let mut hash = 1i32;
        for &byte in bytes {
            hash = hash.wrapping_mul(31).wrapping_add(byte as i8 as i32);
        }
        hash
    }

    // ── Length-prefixed ASCII strings ────────────────────────────────────────

    /// Decodes a native-order length-prefixed ASCII string at `index`.
    fn get_string_ascii(&self, index: usize) -> Result<String, BufferError> {
        self.get_string_ascii_order(index, ByteOrder::NATIVE)
    }

    /// Decodes a length-prefixed ASCII string whose 4-byte prefix uses
    /// `order`.  Each byte maps to the code point of the same value.
    fn get_string_ascii_order(
        &self,
        index: usize,
        order: ByteOrder,
    ) -> Result<String, BufferError> {
        let length = length_prefix(self, index, order)?;
        self.get_string_without_length_ascii(index + 4, length)
    }

    /// Streams a native-order length-prefixed ASCII string into `sink`,
    /// returning the number of bytes consumed (prefix included).
    fn get_string_ascii_into(
        &self,
        index: usize,
        sink: &mut String,
    ) -> Result<usize, BufferError> {
        let length = length_prefix(self, index, ByteOrder::NATIVE)?;
        let bytes = self.byte_slice(index + 4, length)?;
        sink.extend(bytes.iter().map(|&b| char::from(b)));
        Ok(4 + length)
    }

    /// Decodes `length` ASCII bytes at `index` with no length prefix.
    fn get_string_without_length_ascii(
        &self,
        index: usize,
        length: usize,
    ) -> Result<String, BufferError> {
        Ok(ascii_to_string(self.byte_slice(index, length)?))
    }

    // ── Length-prefixed UTF-8 strings ────────────────────────────────────────

    /// Decodes a native-order length-prefixed UTF-8 string at `index`.
    fn get_string_utf8(&self, index: usize) -> Result<String, BufferError> {
        self.get_string_utf8_order(index, ByteOrder::NATIVE)
    }

    /// Decodes a length-prefixed UTF-8 string whose 4-byte prefix uses
    /// `order`.  Invalid sequences decode lossily; decoding never fails on
    /// foreign data.
    fn get_string_utf8_order(&self, index: usize, order: ByteOrder) -> Result<String, BufferError> {
        let length = length_prefix(self, index, order)?;
        self.get_string_without_length_utf8(index + 4, length)
    }

    /// Streams a native-order length-prefixed UTF-8 string into `sink`,
    /// returning the number of bytes consumed (prefix included).
    fn get_string_utf8_into(&self, index: usize, sink: &mut String) -> Result<usize, BufferError> {
        let length = length_prefix(self, index, ByteOrder::NATIVE)?;
        let bytes = self.byte_slice(index + 4, length)?;
        sink.push_str(&String::from_utf8_lossy(bytes));
        Ok(4 + length)
    }

    /// Decodes `length` UTF-8 bytes at `index` with no length prefix.
    fn get_string_without_length_utf8(
        &self,
        index: usize,
        length: usize,
    ) -> Result<String, BufferError> {
        Ok(String::from_utf8_lossy(self.byte_slice(index, length)?).into_owned())
    }

    // ── ASCII numbers ────────────────────────────────────────────────────────

    /// Parses a signed decimal `i32` from `length` bytes at `index`.
    fn parse_int_ascii(&self, index: usize, length: usize) -> Result<i32, BufferError> {
        Ok(ascii::parse_int_ascii(self.byte_slice(index, length)?)?)
    }

    /// Parses a signed decimal `i64` from `length` bytes at `index`.
    fn parse_long_ascii(&self, index: usize, length: usize) -> Result<i64, BufferError> {
        Ok(ascii::parse_long_ascii(self.byte_slice(index, length)?)?)
    }

    /// Parses a natural decimal `i32` (digits only) from `length` bytes at
    /// `index`.
    fn parse_natural_int_ascii(&self, index: usize, length: usize) -> Result<i32, BufferError> {
        Ok(ascii::parse_natural_int_ascii(
            self.byte_slice(index, length)?,
        )?)
    }

    /// Parses a natural decimal `i64` (digits only) from `length` bytes at
    /// `index`.
    fn parse_natural_long_ascii(&self, index: usize, length: usize) -> Result<i64, BufferError> {
        Ok(ascii::parse_natural_long_ascii(
            self.byte_slice(index, length)?,
        )?)
    }
}

impl<T: Region + ?Sized> DirectBuffer for T {}
