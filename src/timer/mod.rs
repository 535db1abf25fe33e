//! Deadline-based timer scheduling.

pub mod wheel;

pub use wheel::{DeadlineTimerWheel, TimeUnit, TimerWheelError, NULL_DEADLINE};
