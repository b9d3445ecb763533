//! Virtual time model.
//!
//! # Design
//!
//! Time is an integer count of abstract time units (the demo uses
//! milliseconds).  The scheduler advances in fixed-size ticks:
//!
//!   tick n covers [n * tick_length, (n + 1) * tick_length)
//!
//! Using integers keeps tick arithmetic exact (no floating-point drift) and
//! makes "has this entity used up its budget?" an exact comparison.
//!
//! Every listener receives a [`TimeLapse`] for the current tick.  Movement
//! and service operations consume from it; whatever is left over is simply
//! unused.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The tick immediately after `self`.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and virtual time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Time units per tick.
    pub tick_length: u64,
    /// The tick about to be processed: advanced by `SimClock::advance()`.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_length: u64) -> Self {
        Self { tick_length, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick.next();
    }

    /// Virtual time at the start of the current tick.
    #[inline]
    pub fn current_time(&self) -> u64 {
        self.current_tick.0 * self.tick_length
    }

    /// The time budget for the current tick.
    #[inline]
    pub fn time_lapse(&self) -> TimeLapse {
        let start = self.current_time();
        TimeLapse::new(start, start + self.tick_length)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t={})", self.current_tick, self.current_time())
    }
}

// ── TimeLapse ─────────────────────────────────────────────────────────────────

/// The time budget of one tick, `[start, end)`, and how much of it has been
/// consumed so far.
///
/// One fresh `TimeLapse` is handed to every listener each tick; consumption
/// by one entity never affects another's budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeLapse {
    start:     u64,
    end:       u64,
    time_left: u64,
}

impl TimeLapse {
    /// # Panics
    /// Panics if `end < start`.
    pub fn new(start: u64, end: u64) -> Self {
        assert!(start <= end, "time lapse end {end} precedes start {start}");
        Self { start, end, time_left: end - start }
    }

    #[inline]
    pub fn start_time(&self) -> u64 {
        self.start
    }

    #[inline]
    pub fn end_time(&self) -> u64 {
        self.end
    }

    /// Total length of the lapse.
    #[inline]
    pub fn length(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    #[inline]
    pub fn time_consumed(&self) -> u64 {
        self.length() - self.time_left
    }

    #[inline]
    pub fn has_time_left(&self) -> bool {
        self.time_left > 0
    }

    /// The virtual time reached after the consumption so far.
    #[inline]
    pub fn current_time(&self) -> u64 {
        self.start + self.time_consumed()
    }

    /// Consume `amount` time units.
    ///
    /// # Panics
    /// Panics if `amount > time_left()`.  Callers clamp before consuming;
    /// overdrawing the budget is a bug in the caller.
    #[inline]
    pub fn consume(&mut self, amount: u64) {
        assert!(
            amount <= self.time_left,
            "cannot consume {amount} time units, only {} left",
            self.time_left,
        );
        self.time_left -= amount;
    }

    /// Consume whatever is left.
    #[inline]
    pub fn consume_all(&mut self) {
        self.time_left = 0;
    }
}
