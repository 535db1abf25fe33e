//! Hashed deadline timer wheel.
//!
//! Deadlines hash onto one of `ticks_per_wheel` spokes by tick number;
//! both the tick resolution and the spoke count are powers of two so the
//! hash is a shift and a mask.  Scheduling is amortized O(1), cancelling
//! is O(1), and polling inspects at most one spoke per call.  Spokes grow
//! by appending a slot at a time and never shrink, so a timer id's slot
//! index stays valid until the timer expires or is cancelled.
//!
//! The wheel is single-threaded by design: callers serialize all access.

use thiserror::Error;

use crate::bits;

/// Sentinel marking a free slot.  No legitimate deadline may equal it.
pub const NULL_DEADLINE: i64 = i64::MAX;

/// Spoke slots allocated per tick at construction.
const DEFAULT_INITIAL_TICK_ALLOCATION: usize = 16;

/// Unit tag for the times stored in a wheel.
///
/// The wheel never converts between units; the tag travels with expiry
/// callbacks so handlers know how to interpret `now` and deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Millis,
    Micros,
    Nanos,
}

/// Errors produced by timer wheel construction and control operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerWheelError {
    /// A structural parameter must be a power of two.
    #[error("{name} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Which parameter was rejected.
        name: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// The operation requires an empty wheel.
    #[error("operation requires no active timers, {count} are scheduled")]
    ActiveTimers {
        /// Timers currently scheduled.
        count: usize,
    },
}

/// Single-threaded hashed timer wheel over absolute deadlines.
#[derive(Debug)]
pub struct DeadlineTimerWheel {
    time_unit: TimeUnit,
    start_time: i64,
    tick_resolution: i64,
    resolution_bits: u32,
    wheel_mask: i64,
    current_tick: i64,
    poll_index: usize,
    timer_count: usize,
    spokes: Vec<Vec<i64>>,
}

impl DeadlineTimerWheel {
    /// A wheel with the default per-spoke allocation.
    ///
    /// `tick_resolution` (in `time_unit`s) and `ticks_per_wheel` must both
    /// be powers of two.
    pub fn new(
        time_unit: TimeUnit,
        start_time: i64,
        tick_resolution: i64,
        ticks_per_wheel: usize,
    ) -> Result<Self, TimerWheelError> {
        Self::with_initial_allocation(
            time_unit,
            start_time,
            tick_resolution,
            ticks_per_wheel,
            DEFAULT_INITIAL_TICK_ALLOCATION,
        )
    }

    /// A wheel with `initial_tick_allocation` slots pre-sized per spoke.
    pub fn with_initial_allocation(
        time_unit: TimeUnit,
        start_time: i64,
        tick_resolution: i64,
        ticks_per_wheel: usize,
        initial_tick_allocation: usize,
    ) -> Result<Self, TimerWheelError> {
        if tick_resolution <= 0 || !bits::is_power_of_two(tick_resolution as usize) {
            return Err(TimerWheelError::NotPowerOfTwo {
                name: "tick_resolution",
                value: tick_resolution,
            });
        }
        if !bits::is_power_of_two(ticks_per_wheel) {
            return Err(TimerWheelError::NotPowerOfTwo {
                name: "ticks_per_wheel",
                value: ticks_per_wheel as i64,
            });
        }
        Ok(Self {
            time_unit,
            start_time,
            tick_resolution,
            resolution_bits: tick_resolution.trailing_zeros(),
            wheel_mask: (ticks_per_wheel - 1) as i64,
            current_tick: 0,
            poll_index: 0,
            timer_count: 0,
            spokes: vec![vec![NULL_DEADLINE; initial_tick_allocation]; ticks_per_wheel],
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    /// Unit of every time handled by this wheel.
    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    /// Time the wheel's tick zero began.
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Duration of one tick in `time_unit`s.
    pub fn tick_resolution(&self) -> i64 {
        self.tick_resolution
    }

    /// Number of spokes.
    pub fn ticks_per_wheel(&self) -> usize {
        self.spokes.len()
    }

    /// Number of scheduled (non-cancelled, non-expired) timers.
    pub fn timer_count(&self) -> usize {
        self.timer_count
    }

    /// Time at which the tick after the current one begins.
    pub fn current_tick_time(&self) -> i64 {
        ((self.current_tick + 1) << self.resolution_bits) + self.start_time
    }

    // ── Scheduling ───────────────────────────────────────────────────────────

    /// Schedules a timer for an absolute `deadline`, returning its id.
    ///
    /// Deadlines already in the past collapse onto the current tick and
    /// expire on the next poll that reaches them.  Never fails: a full
    /// spoke grows by one slot.
    pub fn schedule(&mut self, deadline: i64) -> u64 {
        let target_tick =
            ((deadline - self.start_time) >> self.resolution_bits).max(self.current_tick);
        let spoke_index = (target_tick & self.wheel_mask) as usize;
        let spoke = &mut self.spokes[spoke_index];

        let slot = match spoke.iter().position(|&d| d == NULL_DEADLINE) {
            Some(free) => {
                spoke[free] = deadline;
                free
            }
            None => {
                spoke.push(deadline);
                spoke.len() - 1
            }
        };
        self.timer_count += 1;
        timer_id_for_slot(spoke_index, slot)
    }

    /// Cancels a timer; `true` if it was still scheduled.
    ///
    /// Cancelling twice returns `true` then `false`; the count is only
    /// decremented once.
    pub fn cancel(&mut self, timer_id: u64) -> bool {
        let (spoke_index, slot) = decode_timer_id(timer_id);
        if let Some(entry) = self
            .spokes
            .get_mut(spoke_index)
            .and_then(|spoke| spoke.get_mut(slot))
        {
            if *entry != NULL_DEADLINE {
                *entry = NULL_DEADLINE;
                self.timer_count -= 1;
                return true;
            }
        }
        false
    }

    /// The deadline stored for `timer_id`, or [`NULL_DEADLINE`] when the
    /// id decodes out of range or the slot is free.
    pub fn deadline(&self, timer_id: u64) -> i64 {
        let (spoke_index, slot) = decode_timer_id(timer_id);
        self.spokes
            .get(spoke_index)
            .and_then(|spoke| spoke.get(slot))
            .copied()
            .unwrap_or(NULL_DEADLINE)
    }

    // ── Polling ──────────────────────────────────────────────────────────────

    /// Expires timers whose deadline is at or before `now`, at most
    /// `expiry_limit` of them, and returns how many expired.
    ///
    /// Work per call is bounded: one revolution of the current spoke and
    /// at most a single tick advance, so a wheel far behind `now` catches
    /// up over successive calls rather than stalling the caller.  The
    /// handler receives `(time_unit, now, timer_id)`; returning `false`
    /// vetoes the expiry: the slot, the count and the poll position are
    /// restored so the timer is redelivered on the next poll.
    pub fn poll<H>(&mut self, now: i64, mut handler: H, expiry_limit: usize) -> usize
    where
        H: FnMut(TimeUnit, i64, u64) -> bool,
    {
        let mut expired = 0;

        if self.timer_count > 0 {
            let spoke_index = (self.current_tick & self.wheel_mask) as usize;
            let length = self.spokes[spoke_index].len();

            for _ in 0..length {
                if expired >= expiry_limit {
                    break;
                }
                let deadline = self.spokes[spoke_index][self.poll_index];
                if deadline != NULL_DEADLINE && deadline <= now {
                    self.spokes[spoke_index][self.poll_index] = NULL_DEADLINE;
                    self.timer_count -= 1;
                    expired += 1;
                    let id = timer_id_for_slot(spoke_index, self.poll_index);
                    if !handler(self.time_unit, now, id) {
                        // Veto: restore the slot and stand still so the
                        // timer is seen again on the next poll.
                        self.spokes[spoke_index][self.poll_index] = deadline;
                        self.timer_count += 1;
                        return expired - 1;
                    }
                }
                self.poll_index = if self.poll_index + 1 >= length {
                    0
                } else {
                    self.poll_index + 1
                };
            }

            if expired < expiry_limit && self.current_tick_time() <= now {
                self.current_tick += 1;
                self.poll_index = 0;
            }
        } else if self.current_tick_time() <= now {
            self.current_tick += 1;
            self.poll_index = 0;
        }

        expired
    }

    /// Visits every scheduled timer as `(deadline, timer_id)`, sweeping
    /// one full revolution forward from the current tick.  Does not
    /// mutate the wheel.
    pub fn for_each<C>(&self, mut consumer: C)
    where
        C: FnMut(i64, u64),
    {
        let mut remaining = self.timer_count;
        if remaining == 0 {
            return;
        }
        for step in 0..self.spokes.len() {
            let spoke_index = ((self.current_tick + step as i64) & self.wheel_mask) as usize;
            for (slot, &deadline) in self.spokes[spoke_index].iter().enumerate() {
                if deadline != NULL_DEADLINE {
                    consumer(deadline, timer_id_for_slot(spoke_index, slot));
                    remaining -= 1;
                    if remaining == 0 {
                        return;
                    }
                }
            }
        }
    }

    // ── Control ──────────────────────────────────────────────────────────────

    /// Cancels every timer.
    pub fn clear(&mut self) {
        for spoke in &mut self.spokes {
            spoke.fill(NULL_DEADLINE);
        }
        self.timer_count = 0;
    }

    /// Rebases the wheel on a new start time, resetting the current tick
    /// and poll position.  Only permitted while no timers are scheduled.
    pub fn reset_start_time(&mut self, start_time: i64) -> Result<(), TimerWheelError> {
        if self.timer_count > 0 {
            return Err(TimerWheelError::ActiveTimers {
                count: self.timer_count,
            });
        }
        self.start_time = start_time;
        self.current_tick = 0;
        self.poll_index = 0;
        Ok(())
    }
}

#[inline]
fn timer_id_for_slot(spoke_index: usize, slot: usize) -> u64 {
    ((spoke_index as u64) << 32) | slot as u64
}

#[inline]
fn decode_timer_id(timer_id: u64) -> (usize, usize) {
    ((timer_id >> 32) as usize, (timer_id as u32) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheel() -> DeadlineTimerWheel {
        DeadlineTimerWheel::new(TimeUnit::Millis, 0, 1, 8).unwrap()
    }

    fn accept_all(_: TimeUnit, _: i64, _: u64) -> bool {
        true
    }

    /// Polls at `now` until a poll makes no progress, summing expiries.
    fn drain(wheel: &mut DeadlineTimerWheel, now: i64, limit: usize) -> usize {
        let mut total = 0;
        loop {
            let before_tick = wheel.current_tick_time();
            let expired = wheel.poll(now, accept_all, limit);
            total += expired;
            if expired == 0 && wheel.current_tick_time() == before_tick {
                return total;
            }
        }
    }

    #[test]
    fn rejects_non_power_of_two_parameters() {
        assert_eq!(
            DeadlineTimerWheel::new(TimeUnit::Millis, 0, 3, 8).unwrap_err(),
            TimerWheelError::NotPowerOfTwo {
                name: "tick_resolution",
                value: 3
            }
        );
        assert_eq!(
            DeadlineTimerWheel::new(TimeUnit::Millis, 0, 4, 12).unwrap_err(),
            TimerWheelError::NotPowerOfTwo {
                name: "ticks_per_wheel",
                value: 12
            }
        );
    }

    #[test]
    fn timer_id_encodes_spoke_and_slot() {
        let mut wheel = wheel();
        let id = wheel.schedule(5);
        let (spoke, slot) = decode_timer_id(id);
        assert_eq!(spoke, 5);
        assert_eq!(slot, 0);
        assert_eq!(wheel.deadline(id), 5);
    }

    #[test]
    fn expires_in_deadline_order_across_ticks() {
        let mut wheel = wheel();
        wheel.schedule(1);
        wheel.schedule(1);
        wheel.schedule(9);
        assert_eq!(wheel.timer_count(), 3);

        assert_eq!(drain(&mut wheel, 1, 10), 2);
        assert_eq!(wheel.timer_count(), 1);
        assert_eq!(drain(&mut wheel, 9, 10), 1);
        assert_eq!(wheel.timer_count(), 0);
    }

    #[test]
    fn cancel_twice_returns_true_then_false() {
        let mut wheel = wheel();
        let id = wheel.schedule(5);
        assert!(wheel.cancel(id));
        assert_eq!(wheel.timer_count(), 0);
        assert!(!wheel.cancel(id));
        assert_eq!(wheel.timer_count(), 0);
        assert_eq!(drain(&mut wheel, 100, 10), 0);
    }

    #[test]
    fn cancel_out_of_range_ids() {
        let mut wheel = wheel();
        wheel.schedule(5);
        assert!(!wheel.cancel(timer_id_for_slot(100, 0)));
        assert!(!wheel.cancel(timer_id_for_slot(0, 100)));
        assert_eq!(wheel.timer_count(), 1);
        assert_eq!(wheel.deadline(timer_id_for_slot(100, 0)), NULL_DEADLINE);
    }

    #[test]
    fn poll_respects_expiry_limit() {
        let mut wheel = wheel();
        for _ in 0..5 {
            wheel.schedule(1);
        }
        let mut calls = 0;
        let mut expired = 0;
        // All five share spoke 1; cross tick 0 first, then cap the expiry.
        for _ in 0..4 {
            expired += wheel.poll(
                1,
                |_, _, _| {
                    calls += 1;
                    true
                },
                2,
            );
            if expired >= 2 {
                break;
            }
        }
        assert_eq!(expired, 2);
        assert_eq!(calls, 2);
        assert_eq!(wheel.timer_count(), 3);
    }

    #[test]
    fn handler_veto_restores_slot_and_count() {
        let mut wheel = wheel();
        let id = wheel.schedule(1);
        let mut rejected = 0;
        loop {
            let expired = wheel.poll(
                1,
                |_, _, observed| {
                    assert_eq!(observed, id);
                    rejected += 1;
                    false
                },
                10,
            );
            if rejected > 0 {
                assert_eq!(expired, 0);
                break;
            }
        }
        assert_eq!(wheel.timer_count(), 1);
        assert_eq!(wheel.deadline(id), 1);

        // Accepted on the next poll without rescheduling.
        let expired = wheel.poll(1, accept_all, 10);
        assert_eq!(expired, 1);
        assert_eq!(wheel.timer_count(), 0);
    }

    #[test]
    fn stale_deadline_collapses_to_current_tick() {
        let mut wheel = wheel();
        assert_eq!(drain(&mut wheel, 40, 10), 0); // advance well past start
        let id = wheel.schedule(3); // already in the past
        assert!(wheel.deadline(id) == 3);
        assert_eq!(drain(&mut wheel, 41, 10), 1);
    }

    #[test]
    fn spoke_grows_beyond_initial_allocation() {
        let mut wheel =
            DeadlineTimerWheel::with_initial_allocation(TimeUnit::Millis, 0, 1, 8, 1).unwrap();
        let ids: Vec<u64> = (0..10).map(|_| wheel.schedule(1)).collect();
        assert_eq!(wheel.timer_count(), 10);
        // Slot indices are stable and distinct.
        for (slot, id) in ids.iter().enumerate() {
            assert_eq!(decode_timer_id(*id), (1, slot));
        }
        assert_eq!(drain(&mut wheel, 1, 100), 10);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut wheel = wheel();
        let a = wheel.schedule(9);
        wheel.cancel(a);
        let b = wheel.schedule(9);
        assert_eq!(a, b, "cancelled slot should be the first free slot");
    }

    #[test]
    fn for_each_visits_all_without_mutation() {
        let mut wheel = wheel();
        let mut scheduled: Vec<u64> = (0..6).map(|i| wheel.schedule(i * 3)).collect();
        let mut seen = Vec::new();
        wheel.for_each(|deadline, id| seen.push((deadline, id)));
        assert_eq!(seen.len(), 6);
        assert_eq!(wheel.timer_count(), 6);
        let mut seen_ids: Vec<u64> = seen.iter().map(|&(_, id)| id).collect();
        seen_ids.sort_unstable();
        scheduled.sort_unstable();
        assert_eq!(seen_ids, scheduled);
        for (deadline, id) in seen {
            assert_eq!(wheel.deadline(id), deadline);
        }
    }

    #[test]
    fn clear_frees_everything() {
        let mut wheel = wheel();
        for i in 0..4 {
            wheel.schedule(i);
        }
        wheel.clear();
        assert_eq!(wheel.timer_count(), 0);
        assert_eq!(drain(&mut wheel, 100, 10), 0);
    }

    #[test]
    fn reset_start_time_requires_empty_wheel() {
        let mut wheel = wheel();
        let id = wheel.schedule(5);
        assert_eq!(
            wheel.reset_start_time(100),
            Err(TimerWheelError::ActiveTimers { count: 1 })
        );
        wheel.cancel(id);
        wheel.reset_start_time(100).unwrap();
        assert_eq!(wheel.start_time(), 100);
        assert_eq!(wheel.current_tick_time(), 101);
    }

    #[test]
    fn current_tick_time_tracks_resolution() {
        let mut wheel = DeadlineTimerWheel::new(TimeUnit::Micros, 1000, 8, 16).unwrap();
        assert_eq!(wheel.current_tick_time(), 1008);
        assert_eq!(wheel.poll(1008, accept_all, 1), 0);
        assert_eq!(wheel.current_tick_time(), 1016);
    }

    #[test]
    fn empty_wheel_advances_one_tick_per_poll() {
        let mut wheel = wheel();
        assert_eq!(wheel.poll(100, accept_all, 10), 0);
        assert_eq!(wheel.current_tick_time(), 2);
        assert_eq!(wheel.poll(100, accept_all, 10), 0);
        assert_eq!(wheel.current_tick_time(), 3);
    }

    #[test]
    fn count_matches_live_slots_through_random_interleaving() {
        let mut wheel = wheel();
        let mut live: Vec<u64> = Vec::new();
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };
        let mut now = 0i64;
        for _ in 0..1000 {
            match next() % 4 {
                0 | 1 => {
                    let deadline = now + (next() % 64) as i64;
                    live.push(wheel.schedule(deadline));
                }
                2 => {
                    if !live.is_empty() {
                        let victim = live.swap_remove((next() as usize) % live.len());
                        wheel.cancel(victim);
                    }
                }
                _ => {
                    now += (next() % 8) as i64;
                    wheel.poll(now, accept_all, 4);
                }
            }
            // Invariant: the count always equals the live slots.
            let mut visited = 0;
            wheel.for_each(|_, _| visited += 1);
            assert_eq!(visited, wheel.timer_count());
        }
    }
}
