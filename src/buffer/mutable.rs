//! Write-side typed accessor surface.
//!
//! [`MutableBuffer`] is blanket-implemented for every [`RegionMut`].
//! Every write routes through the region's `ensure_capacity` hook, so the
//! same methods bounds-check on fixed regions and grow-on-write on the
//! expandable region.  Multi-part writes (string prefix + payload, sign +
//! digits) reserve the whole range up front so a failure never leaves a
//! partial record behind.

use super::{bounds_check, mem, BufferError, ByteOrder, DirectBuffer, Region, RegionMut};
use crate::ascii::{self, format, AsciiError};

/// Encoded form of an absent UTF-8 string.
const NULL_BYTES: &[u8] = b"null";

#[inline]
fn ascii_byte(c: char) -> u8 {
    if (c as u32) > 127 {
        b'?'
    } else {
        c as u8
    }
}

/// Typed, growth-aware write access over a byte region.
pub trait MutableBuffer: RegionMut + DirectBuffer {
    /// Borrows `length` writable bytes at `index`, growing an expandable
    /// region to fit.
    #[inline]
    fn byte_slice_mut(&mut self, index: usize, length: usize) -> Result<&mut [u8], BufferError> {
        self.ensure_capacity(index, length)?;
        // SAFETY: RegionMut guarantees validity for capacity bytes and the
        // range was just ensured.
        Ok(unsafe { core::slice::from_raw_parts_mut(self.base_ptr_mut().add(index), length) })
    }

    // ── Single bytes ─────────────────────────────────────────────────────────

    #[inline]
    fn put_u8(&mut self, index: usize, value: u8) -> Result<(), BufferError> {
        self.ensure_capacity(index, 1)?;
        // SAFETY: ensured above.
        unsafe { *self.base_ptr_mut().add(index) = value };
        Ok(())
    }

    #[inline]
    fn put_i8(&mut self, index: usize, value: i8) -> Result<(), BufferError> {
        self.put_u8(index, value as u8)
    }

    // ── 16-bit ───────────────────────────────────────────────────────────────

    /// Native-order store.
    #[inline]
    fn put_u16(&mut self, index: usize, value: u16) -> Result<(), BufferError> {
        self.ensure_capacity(index, 2)?;
        // SAFETY: ensured above.
        unsafe { mem::store_u16(self.base_ptr_mut().add(index), value) };
        Ok(())
    }

    #[inline]
    fn put_u16_order(
        &mut self,
        index: usize,
        value: u16,
        order: ByteOrder,
    ) -> Result<(), BufferError> {
        self.put_u16(index, order.apply_u16(value))
    }

    #[inline]
    fn put_i16(&mut self, index: usize, value: i16) -> Result<(), BufferError> {
        self.put_u16(index, value as u16)
    }

    #[inline]
    fn put_i16_order(
        &mut self,
        index: usize,
        value: i16,
        order: ByteOrder,
    ) -> Result<(), BufferError> {
        self.put_u16_order(index, value as u16, order)
    }

    // ── 32-bit ───────────────────────────────────────────────────────────────

    /// Native-order store.
    #[inline]
    fn put_u32(&mut self, index: usize, value: u32) -> Result<(), BufferError> {
        self.ensure_capacity(index, 4)?;
        // SAFETY: ensured above.
        unsafe { mem::store_u32(self.base_ptr_mut().add(index), value) };
        Ok(())
    }

    #[inline]
    fn put_u32_order(
        &mut self,
        index: usize,
        value: u32,
        order: ByteOrder,
    ) -> Result<(), BufferError> {
        self.put_u32(index, order.apply_u32(value))
    }

    #[inline]
    fn put_i32(&mut self, index: usize, value: i32) -> Result<(), BufferError> {
        self.put_u32(index, value as u32)
    }

    #[inline]
    fn put_i32_order(
        &mut self,
        index: usize,
        value: i32,
        order: ByteOrder,
    ) -> Result<(), BufferError> {
        self.put_u32_order(index, value as u32, order)
    }

    #[inline]
    fn put_f32(&mut self, index: usize, value: f32) -> Result<(), BufferError> {
        self.put_u32(index, value.to_bits())
    }

    #[inline]
    fn put_f32_order(
        &mut self,
        index: usize,
        value: f32,
        order: ByteOrder,
    ) -> Result<(), BufferError> {
        self.put_u32_order(index, value.to_bits(), order)
    }

    // ── 64-bit ───────────────────────────────────────────────────────────────

    /// Native-order store.
    #[inline]
    fn put_u64(&mut self, index: usize, value: u64) -> Result<(), BufferError> {
        self.ensure_capacity(index, 8)?;
        // SAFETY: ensured above.
        unsafe { mem::store_u64(self.base_ptr_mut().add(index), value) };
        Ok(())
    }

    #[inline]
    fn put_u64_order(
        &mut self,
        index: usize,
        value: u64,
        order: ByteOrder,
    ) -> Result<(), BufferError> {
        self.put_u64(index, order.apply_u64(value))
    }

    #[inline]
    fn put_i64(&mut self, index: usize, value: i64) -> Result<(), BufferError> {
        self.put_u64(index, value as u64)
    }

    #[inline]
    fn put_i64_order(
        &mut self,
        index: usize,
        value: i64,
        order: ByteOrder,
    ) -> Result<(), BufferError> {
        self.put_u64_order(index, value as u64, order)
    }

    #[inline]
    fn put_f64(&mut self, index: usize, value: f64) -> Result<(), BufferError> {
        self.put_u64(index, value.to_bits())
    }

    #[inline]
    fn put_f64_order(
        &mut self,
        index: usize,
        value: f64,
        order: ByteOrder,
    ) -> Result<(), BufferError> {
        self.put_u64_order(index, value.to_bits(), order)
    }

    // ── Byte ranges ──────────────────────────────────────────────────────────

    /// Copies the whole of `src` to `index`.
    fn put_bytes(&mut self, index: usize, src: &[u8]) -> Result<(), BufferError> {
        self.ensure_capacity(index, src.len())?;
        // SAFETY: destination ensured; src is a shared borrow.
        unsafe { mem::copy(src.as_ptr(), self.base_ptr_mut().add(index), src.len()) };
        Ok(())
    }

    /// Copies `length` bytes from another region at `src_index` to
    /// `index`.
    fn put_bytes_from<R: Region + ?Sized>(
        &mut self,
        index: usize,
        src: &R,
        src_index: usize,
        length: usize,
    ) -> Result<(), BufferError> {
        bounds_check(src_index, length, src.capacity())?;
        self.ensure_capacity(index, length)?;
        // SAFETY: both ranges validated; copy tolerates overlap.
        unsafe {
            mem::copy(
                src.base_ptr().add(src_index),
                self.base_ptr_mut().add(index),
                length,
            )
        };
        Ok(())
    }

    /// Fills `length` bytes at `index` with `value`.
    fn set_memory(&mut self, index: usize, length: usize, value: u8) -> Result<(), BufferError> {
        self.ensure_capacity(index, length)?;
        // SAFETY: ensured above.
        unsafe { mem::fill(self.base_ptr_mut().add(index), length, value) };
        Ok(())
    }

    // ── Length-prefixed ASCII strings ────────────────────────────────────────

    /// Encodes `value` as a native-order length-prefixed ASCII string,
    /// returning the bytes written (prefix included).  Code points above
    /// 127 are substituted with `?`.
    fn put_string_ascii(&mut self, index: usize, value: &str) -> Result<usize, BufferError> {
        self.put_string_ascii_order(index, value, ByteOrder::NATIVE)
    }

    /// [`put_string_ascii`](Self::put_string_ascii) with an explicit
    /// prefix byte order.
    fn put_string_ascii_order(
        &mut self,
        index: usize,
        value: &str,
        order: ByteOrder,
    ) -> Result<usize, BufferError> {
        let length = value.chars().count();
        let slice = self.byte_slice_mut(index, 4 + length)?;
        slice[..4].copy_from_slice(&order.apply_u32(length as u32).to_ne_bytes());
        for (dst, c) in slice[4..].iter_mut().zip(value.chars()) {
            *dst = ascii_byte(c);
        }
        Ok(4 + length)
    }

    /// Encodes `value` as raw ASCII bytes with no prefix, returning the
    /// bytes written.
    fn put_string_without_length_ascii(
        &mut self,
        index: usize,
        value: &str,
    ) -> Result<usize, BufferError> {
        let length = value.chars().count();
        let slice = self.byte_slice_mut(index, length)?;
        for (dst, c) in slice.iter_mut().zip(value.chars()) {
            *dst = ascii_byte(c);
        }
        Ok(length)
    }

    // ── Length-prefixed UTF-8 strings ────────────────────────────────────────

    /// Encodes `value` as a native-order length-prefixed UTF-8 string;
    /// `None` encodes as the literal bytes `null`.  Returns the bytes
    /// written (prefix included).
    fn put_string_utf8(&mut self, index: usize, value: Option<&str>) -> Result<usize, BufferError> {
        self.put_string_utf8_order(index, value, ByteOrder::NATIVE)
    }

    /// [`put_string_utf8`](Self::put_string_utf8) with an explicit prefix
    /// byte order.
    fn put_string_utf8_order(
        &mut self,
        index: usize,
        value: Option<&str>,
        order: ByteOrder,
    ) -> Result<usize, BufferError> {
        let bytes = value.map_or(NULL_BYTES, str::as_bytes);
        let slice = self.byte_slice_mut(index, 4 + bytes.len())?;
        slice[..4].copy_from_slice(&order.apply_u32(bytes.len() as u32).to_ne_bytes());
        slice[4..].copy_from_slice(bytes);
        Ok(4 + bytes.len())
    }

    /// Encodes `value` as raw UTF-8 bytes with no prefix, returning the
    /// bytes written.
    fn put_string_without_length_utf8(
        &mut self,
        index: usize,
        value: &str,
    ) -> Result<usize, BufferError> {
        self.put_bytes(index, value.as_bytes())?;
        Ok(value.len())
    }

    // ── ASCII numbers ────────────────────────────────────────────────────────

    /// Encodes `value` as signed decimal ASCII, returning the bytes
    /// written.  `i32::MIN` is written from its pre-encoded sentinel.
    fn put_int_ascii(&mut self, index: usize, value: i32) -> Result<usize, BufferError> {
        if value == i32::MIN {
            self.put_bytes(index, ascii::MIN_INTEGER_VALUE)?;
            return Ok(ascii::MIN_INTEGER_VALUE.len());
        }
        let negative = value < 0;
        let magnitude = value.unsigned_abs();
        let digits = ascii::digit_count_int(magnitude as i32);
        let length = digits + usize::from(negative);
        let slice = self.byte_slice_mut(index, length)?;
        if negative {
            slice[0] = ascii::MINUS_SIGN;
        }
        format::put_positive_int(&mut slice[usize::from(negative)..], magnitude, digits);
        Ok(length)
    }

    /// Encodes `value` as signed decimal ASCII, returning the bytes
    /// written.  `i64::MIN` is written from its pre-encoded sentinel.
    fn put_long_ascii(&mut self, index: usize, value: i64) -> Result<usize, BufferError> {
        if value == i64::MIN {
            self.put_bytes(index, ascii::MIN_LONG_VALUE)?;
            return Ok(ascii::MIN_LONG_VALUE.len());
        }
        let negative = value < 0;
        let magnitude = value.unsigned_abs();
        let digits = ascii::digit_count_long(magnitude as i64);
        let length = digits + usize::from(negative);
        let slice = self.byte_slice_mut(index, length)?;
        if negative {
            slice[0] = ascii::MINUS_SIGN;
        }
        format::put_positive_long(&mut slice[usize::from(negative)..], magnitude, digits);
        Ok(length)
    }

    /// Encodes a natural (non-negative) `i32` with no sign byte,
    /// returning the bytes written.
    fn put_natural_int_ascii(&mut self, index: usize, value: i32) -> Result<usize, BufferError> {
        if value < 0 {
            return Err(AsciiError::Negative(value as i64).into());
        }
        let digits = ascii::digit_count_int(value);
        let slice = self.byte_slice_mut(index, digits)?;
        format::put_positive_int(slice, value as u32, digits);
        Ok(digits)
    }

    /// Encodes a natural (non-negative) `i64` with no sign byte,
    /// returning the bytes written.
    fn put_natural_long_ascii(&mut self, index: usize, value: i64) -> Result<usize, BufferError> {
        if value < 0 {
            return Err(AsciiError::Negative(value).into());
        }
        let digits = ascii::digit_count_long(value);
        let slice = self.byte_slice_mut(index, digits)?;
        format::put_positive_long(slice, value as u64, digits);
        Ok(digits)
    }

    /// Encodes a natural `i32` into exactly `length` bytes, zero-padded on
    /// the left; fails with [`AsciiError::DoesNotFit`] when the value is
    /// wider than the field.
    fn put_natural_padded_int_ascii(
        &mut self,
        index: usize,
        length: usize,
        value: i32,
    ) -> Result<(), BufferError> {
        if value < 0 {
            return Err(AsciiError::Negative(value as i64).into());
        }
        let digits = ascii::digit_count_int(value);
        if digits > length {
            return Err(AsciiError::DoesNotFit {
                value: value as i64,
                width: length,
            }
            .into());
        }
        let slice = self.byte_slice_mut(index, length)?;
        let pad = length - digits;
        slice[..pad].fill(ascii::ZERO);
        format::put_positive_int(&mut slice[pad..], value as u32, digits);
        Ok(())
    }

    /// Encodes a natural `i32` so its last digit lands at
    /// `end_exclusive - 1`, returning the first index written.
    fn put_natural_int_ascii_from_end(
        &mut self,
        value: i32,
        end_exclusive: usize,
    ) -> Result<usize, BufferError> {
        if value < 0 {
            return Err(AsciiError::Negative(value as i64).into());
        }
        let digits = ascii::digit_count_int(value);
        let start = end_exclusive
            .checked_sub(digits)
            .ok_or(BufferError::OutOfBounds {
                index: 0,
                length: digits,
                capacity: end_exclusive,
            })?;
        let slice = self.byte_slice_mut(start, digits)?;
        format::put_positive_int(slice, value as u32, digits);
        Ok(start)
    }
}

impl<T: RegionMut + ?Sized> MutableBuffer for T {}
