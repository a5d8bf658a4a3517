//! Monotonic time source for the simulation.
//!
//! All cooldowns in the simulation compare millisecond timestamps. The tick
//! loop reads a [`Clock`] once per tick and passes the resulting
//! [`Timestamp`] down explicitly, so tests can drive any time sequence.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::time::Instant;

/// A reading of the monotonic clock, in milliseconds since the clock's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The clock origin.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from a raw millisecond count.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Returns the raw millisecond count.
    #[must_use]
    pub const fn millis(self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`. Saturates at zero if `earlier`
    /// lies in the future.
    #[must_use]
    pub const fn elapsed_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Returns this timestamp shifted forward by `millis`.
    #[must_use]
    pub const fn plus(self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// A monotonic clock queried on demand.
pub trait Clock {
    /// Returns the current reading.
    fn now(&self) -> Timestamp;
}

/// Wall-clock backed monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts a clock whose origin is the moment of construction.
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.origin.elapsed().as_millis() as u64)
    }
}

/// Clock advanced by hand. Used for fixed-step runs and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock reading `millis`.
    #[must_use]
    pub fn starting_at(millis: u64) -> Self {
        Self {
            now: Cell::new(millis),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get().saturating_add(millis));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_saturates() {
        let early = Timestamp::from_millis(100);
        let late = Timestamp::from_millis(350);
        assert_eq!(late.elapsed_since(early), 250);
        assert_eq!(early.elapsed_since(late), 0);
    }

    #[test]
    fn test_plus() {
        assert_eq!(Timestamp::ZERO.plus(16).millis(), 16);
        assert_eq!(Timestamp::from_millis(u64::MAX).plus(1).millis(), u64::MAX);
    }

    #[test]
    fn test_monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::start();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_starting_at() {
        let clock = ManualClock::starting_at(1_000);
        clock.advance(16);
        assert_eq!(clock.now(), Timestamp::from_millis(1_016));
    }

    #[test]
    fn test_display() {
        assert_eq!(Timestamp::from_millis(42).to_string(), "42ms");
    }
}
