//! Immutable character view over a byte region.
//!
//! An `AsciiView` is a borrowed `{buffer, offset, length}` triple: a
//! substring over region bytes without copying them out.  Subsequences
//! re-borrow the same storage, so slicing is free.

use core::fmt;

use super::{BufferError, DirectBuffer};

/// A borrowed ASCII character sequence over part of a buffer.
pub struct AsciiView<'a, B: DirectBuffer + ?Sized> {
    buffer: &'a B,
    offset: usize,
    length: usize,
}

// Manual impls: the derives would require `B: Clone`/`B: Copy`.
impl<B: DirectBuffer + ?Sized> Clone for AsciiView<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: DirectBuffer + ?Sized> Copy for AsciiView<'_, B> {}

impl<'a, B: DirectBuffer + ?Sized> AsciiView<'a, B> {
    /// Wraps `length` bytes of `buffer` starting at `offset`.
    pub fn wrap(buffer: &'a B, offset: usize, length: usize) -> Result<Self, BufferError> {
        buffer.bounds_check(offset, length)?;
        Ok(Self {
            buffer,
            offset,
            length,
        })
    }

    /// Number of characters in the view.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Offset of the view's first byte within the underlying buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The character at `index` within the view.
    pub fn char_at(&self, index: usize) -> Result<char, BufferError> {
        if index >= self.length {
            return Err(BufferError::OutOfBounds {
                index,
                length: 1,
                capacity: self.length,
            });
        }
        Ok(char::from(self.buffer.get_u8(self.offset + index)?))
    }

    /// A sub-view covering `[start, end)` of this view, borrowing the
    /// same storage.
    pub fn subsequence(&self, start: usize, end: usize) -> Result<Self, BufferError> {
        if start > end || end > self.length {
            return Err(BufferError::OutOfBounds {
                index: start,
                length: end.saturating_sub(start),
                capacity: self.length,
            });
        }
        Ok(Self {
            buffer: self.buffer,
            offset: self.offset + start,
            length: end - start,
        })
    }

    /// The viewed bytes.
    pub fn as_bytes(&self) -> Result<&'a [u8], BufferError> {
        self.buffer.byte_slice(self.offset, self.length)
    }

    /// Parses the whole view as a signed decimal `i32`.
    pub fn parse_int(&self) -> Result<i32, BufferError> {
        self.buffer.parse_int_ascii(self.offset, self.length)
    }

    /// Parses the whole view as a signed decimal `i64`.
    pub fn parse_long(&self) -> Result<i64, BufferError> {
        self.buffer.parse_long_ascii(self.offset, self.length)
    }
}

impl<B: DirectBuffer + ?Sized> fmt::Display for AsciiView<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.as_bytes().map_err(|_| fmt::Error)?;
        for &byte in bytes {
            write!(f, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

impl<B: DirectBuffer + ?Sized> fmt::Debug for AsciiView<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AsciiView(offset: {}, length: {})",
            self.offset, self.length
        )
    }
}

impl<B: DirectBuffer + ?Sized> PartialEq<str> for AsciiView<'_, B> {
    fn eq(&self, other: &str) -> bool {
        match self.as_bytes() {
            Ok(bytes) => bytes == other.as_bytes(),
            Err(_) => false,
        }
    }
}

impl<B: DirectBuffer + ?Sized> PartialEq<&str> for AsciiView<'_, B> {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}
