//! # Tick Timer
//!
//! Paces the main loop at a fixed period. Tick deadlines are kept on a fixed grid from the start
//! instant so that small overruns do not accumulate drift.
//!
//! At most one tick is ever queued: if a cycle overruns, the next tick runs straight away and
//! every further deadline which has already passed is dropped.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    convert::TryFrom,
    thread,
    time::{Duration, Instant},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TickTimer {
    period: Duration,

    /// Deadline of the next tick
    next: Instant,

    /// Total number of ticks dropped since the timer started
    num_dropped: u64,
}

/// What the loop has to do before running its next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickWait {
    /// Time to sleep before the next tick, zero after an overrun
    pub sleep: Duration,

    /// Number of ticks dropped because their deadlines passed during an overrun
    pub dropped: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TickTimer {
    /// Create a timer whose first tick runs at `start` and next tick at `start + period`.
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next: start + period,
            num_dropped: 0,
        }
    }

    /// Advance to the next tick given that the current tick finished at `now`.
    pub fn advance(&mut self, now: Instant) -> TickWait {
        if now <= self.next {
            let sleep = self.next - now;
            self.next += self.period;

            return TickWait { sleep, dropped: 0 };
        }

        // The due tick runs now, any deadline after it which has also passed is dropped
        let late_ns = (now - self.next).as_nanos();
        let period_ns = self.period.as_nanos().max(1);
        let dropped = u64::try_from(late_ns / period_ns).unwrap_or(u64::MAX);

        // Next deadline is the first grid point after `now`
        let since_grid_ns = u64::try_from(late_ns % period_ns).unwrap_or(u64::MAX);
        self.next = now + self.period.saturating_sub(Duration::from_nanos(since_grid_ns));
        self.num_dropped = self.num_dropped.saturating_add(dropped);

        TickWait {
            sleep: Duration::from_secs(0),
            dropped,
        }
    }

    /// Advance to the next tick and sleep until it is due.
    pub fn wait(&mut self) -> TickWait {
        let tick_wait = self.advance(Instant::now());

        if tick_wait.sleep > Duration::from_secs(0) {
            thread::sleep(tick_wait.sleep);
        }

        tick_wait
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Total number of ticks dropped since the timer started.
    pub fn num_dropped(&self) -> u64 {
        self.num_dropped
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_on_time() {
        let start = Instant::now();
        let mut timer = TickTimer::new(ms(50), start);

        let w = timer.advance(start + ms(10));
        assert_eq!(w, TickWait { sleep: ms(40), dropped: 0 });

        // Next deadline is on the grid, not relative to when the tick finished
        let w = timer.advance(start + ms(60));
        assert_eq!(w, TickWait { sleep: ms(40), dropped: 0 });
        assert_eq!(timer.num_dropped(), 0);
    }

    #[test]
    fn test_small_overrun() {
        let start = Instant::now();
        let mut timer = TickTimer::new(ms(50), start);

        // Finished 20 ms after the next deadline, run the next tick immediately
        let w = timer.advance(start + ms(70));
        assert_eq!(w, TickWait { sleep: ms(0), dropped: 0 });

        // Back on the grid afterwards
        let w = timer.advance(start + ms(80));
        assert_eq!(w, TickWait { sleep: ms(20), dropped: 0 });
    }

    #[test]
    fn test_long_overrun_drops_ticks() {
        let start = Instant::now();
        let mut timer = TickTimer::new(ms(50), start);

        // Deadlines at 50, 100, 150, 200 have passed: one runs now, three are dropped
        let w = timer.advance(start + ms(210));
        assert_eq!(w, TickWait { sleep: ms(0), dropped: 3 });
        assert_eq!(timer.num_dropped(), 3);

        let w = timer.advance(start + ms(220));
        assert_eq!(w, TickWait { sleep: ms(30), dropped: 0 });
    }

    #[test]
    fn test_very_long_stall() {
        let start = Instant::now();
        let mut timer = TickTimer::new(ms(1), start);

        // More missed ticks than fit in a u32
        let stall = Duration::from_secs(5_000_000);
        let w = timer.advance(start + stall);
        assert_eq!(w.sleep, ms(0));
        assert_eq!(w.dropped, 4_999_999_999);

        let w = timer.advance(start + stall);
        assert_eq!(w, TickWait { sleep: ms(1), dropped: 0 });
    }
}
