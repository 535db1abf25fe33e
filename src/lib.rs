//! Low-level primitives for high-throughput messaging and storage
//! systems:
//!
//! - **Direct buffers**: zero-copy typed views over heap, off-heap,
//!   memory-mapped, borrowed and grow-on-write byte regions, with
//!   endian-aware accessors and length-prefixed string codecs.
//! - **ASCII numeric codec**: branch-free digit counting and SWAR-based
//!   integer parse/format.
//! - **Deadline timer wheel**: single-threaded hashed wheel with O(1)
//!   cancel and bounded-work polling.
//!
//! Everything is compute-bound and single-threaded; the only concurrency
//! concession is the 64-bit ordered/volatile accessor set on buffers,
//! for heartbeat fields observed across processes.

pub mod ascii;
pub mod bits;
pub mod buffer;
pub mod timer;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level re-exports for the common entry points.
// ─────────────────────────────────────────────────────────────────────────────

/// Error type of the ASCII numeric codec.
pub use ascii::AsciiError;

/// Branch-free decimal digit counters.
pub use ascii::{digit_count_int, digit_count_long};

/// Slice-level decimal parsers.
pub use ascii::{
    parse_int_ascii, parse_long_ascii, parse_natural_int_ascii, parse_natural_long_ascii,
};

/// Error type of buffer construction and access.
pub use buffer::BufferError;

/// Byte order selector for multi-byte accessors.
pub use buffer::ByteOrder;

/// Read, write and shared-field access traits.
pub use buffer::{AtomicBuffer, DirectBuffer, MutableBuffer};

/// Region capability traits implemented by every backing.
pub use buffer::{Region, RegionMut};

/// Concrete buffer backings.
pub use buffer::{
    AlignedBuffer, BufferView, BufferViewMut, ExpandableBuffer, HeapBuffer, MappedBuffer,
};

/// Expandable-buffer sizing constants.
pub use buffer::{INITIAL_CAPACITY, MAX_BUFFER_LENGTH};

/// Borrowed character sequence over buffer bytes.
pub use buffer::AsciiView;

/// Deadline timer wheel and its companions.
pub use timer::{DeadlineTimerWheel, TimeUnit, TimerWheelError, NULL_DEADLINE};
