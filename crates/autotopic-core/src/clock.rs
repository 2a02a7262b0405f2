//! Clock sources for the write pipeline.
//!
//! The resolver needs "now" to pick a window, and the defaults factory needs
//! today's date. Both take a [`Clock`] so tests can pin time with a
//! [`FixedClock`] while production uses [`SystemClock`].

use chrono::{DateTime, TimeDelta, Utc};

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Advancing would move the clock outside the representable range.
    #[error("clock overflow: cannot advance {by} past {from}")]
    Overflow {
        /// The time before advancing.
        from: DateTime<Utc>,
        /// The requested step.
        by: TimeDelta,
    },
}

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// Return the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Create a clock frozen at `now`.
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Jump to a new instant.
    pub const fn set(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    /// Move the clock forward (or backward, for a negative step).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Overflow`] if the result is out of range.
    pub fn advance(&mut self, by: TimeDelta) -> Result<DateTime<Utc>, ClockError> {
        self.now = self
            .now
            .checked_add_signed(by)
            .ok_or(ClockError::Overflow { from: self.now, by })?;
        Ok(self.now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
