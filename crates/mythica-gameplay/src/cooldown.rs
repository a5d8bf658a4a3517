//! Elapsed-time gating for every timed behavior.
//!
//! A timed behavior follows one pattern: trigger, record the start timestamp
//! and set a locked flag, poll every tick, clear the flag once the duration
//! has elapsed. Nothing is scheduled and nothing calls back; the flag
//! flipping back is the only effect.

use mythica_common::Timestamp;
use serde::{Deserialize, Serialize};

/// Reports whether `duration` milliseconds have passed between `start` and `now`.
#[must_use]
pub const fn has_elapsed(now: Timestamp, start: Timestamp, duration: u64) -> bool {
    now.elapsed_since(start) >= duration
}

/// A lock flag with its start timestamp and duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    duration: u64,
    locked_at: Option<Timestamp>,
    locked_for: u64,
}

impl Cooldown {
    /// Creates an unlocked cooldown with a default duration in milliseconds.
    #[must_use]
    pub const fn new(duration: u64) -> Self {
        Self {
            duration,
            locked_at: None,
            locked_for: duration,
        }
    }

    /// Default lock duration.
    #[must_use]
    pub const fn duration(&self) -> u64 {
        self.duration
    }

    /// True while locked.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked_at.is_some()
    }

    /// True while unlocked.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.locked_at.is_none()
    }

    /// Timestamp of the last lock, if still locked.
    #[must_use]
    pub const fn locked_at(&self) -> Option<Timestamp> {
        self.locked_at
    }

    /// Locks for the default duration starting at `now`.
    pub fn lock(&mut self, now: Timestamp) {
        self.lock_for(now, self.duration);
    }

    /// Locks for an explicit duration starting at `now`.
    pub fn lock_for(&mut self, now: Timestamp, duration: u64) {
        self.locked_at = Some(now);
        self.locked_for = duration;
    }

    /// Clears the lock if its duration has elapsed. Returns true only on the
    /// poll that clears it.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        match self.locked_at {
            Some(start) if has_elapsed(now, start, self.locked_for) => {
                self.locked_at = None;
                true
            },
            _ => false,
        }
    }
}
