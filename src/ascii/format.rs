//! Table-driven decimal formatting.
//!
//! Digits are written right-to-left from the two-digit pair table: the
//! 32-bit path peels four digits per iteration (`% 10_000`), the 64-bit
//! path peels eight (`% 100_000_000`) and hands the remaining head to the
//! 32-bit path.  Callers size the destination with the digit counters and
//! handle signs and the `MIN` sentinels; these routines only ever see a
//! non-negative magnitude and an exact-length slice.

use super::{ASCII_DIGITS, ZERO};

#[inline]
fn put_pair(dst: &mut [u8], at: usize, value: u32) {
    let pair = value as usize * 2;
    dst[at] = ASCII_DIGITS[pair];
    dst[at + 1] = ASCII_DIGITS[pair + 1];
}

/// Writes exactly eight digits of `value < 100_000_000`, zero-padded.
#[inline]
fn put_eight_padded(dst: &mut [u8], at: usize, value: u32) {
    let upper = value / 10_000;
    let lower = value % 10_000;
    put_pair(dst, at, upper / 100);
    put_pair(dst, at + 2, upper % 100);
    put_pair(dst, at + 4, lower / 100);
    put_pair(dst, at + 6, lower % 100);
}

/// Formats `value` into `dst[..digit_count]` where `digit_count` is the
/// exact decimal width of `value`.
pub(crate) fn put_positive_int(dst: &mut [u8], value: u32, digit_count: usize) {
    let mut i = digit_count;
    let mut quotient = value;
    while quotient >= 10_000 {
        let quartet = quotient % 10_000;
        quotient /= 10_000;
        i -= 4;
        put_pair(dst, i, quartet / 100);
        put_pair(dst, i + 2, quartet % 100);
    }
    // quotient < 10_000 from here on
    if quotient >= 100 {
        i -= 2;
        put_pair(dst, i, quotient % 100);
        quotient /= 100;
    }
    if quotient >= 10 {
        put_pair(dst, i - 2, quotient);
    } else {
        dst[i - 1] = ZERO + quotient as u8;
    }
}

/// Formats `value` into `dst[..digit_count]` where `digit_count` is the
/// exact decimal width of `value`.
pub(crate) fn put_positive_long(dst: &mut [u8], value: u64, digit_count: usize) {
    let mut i = digit_count;
    let mut quotient = value;
    while quotient >= 100_000_000 {
        let octet = (quotient % 100_000_000) as u32;
        quotient /= 100_000_000;
        i -= 8;
        put_eight_padded(dst, i, octet);
    }
    put_positive_int(dst, quotient as u32, i);
}
