//! Closed time intervals and the range predicate shared by every lookup.
//!
//! Both the overlap check and the containment lookup reduce to the same
//! store query: windows on a site whose `start_time <= X` and whose
//! `end_time >= Y`. [`RangeQuery`] captures that predicate once so that the
//! `PostgreSQL` store and the in-memory store evaluate it identically.

use autotopic_types::{DescriptionWindow, SiteId};
use chrono::{DateTime, Utc};

/// Errors raised when constructing an [`Interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    /// The end lies before the start.
    #[error("end time {end} is before start time {start}")]
    EndBeforeStart {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
    },
}

/// A closed interval `[start, end]`. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    /// Create an interval.
    ///
    /// # Errors
    ///
    /// Returns [`IntervalError::EndBeforeStart`] if `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        if end < start {
            return Err(IntervalError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// A zero-length interval covering a single instant.
    pub const fn instant(at: DateTime<Utc>) -> Self {
        Self { start: at, end: at }
    }

    /// Inclusive start.
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Inclusive end.
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `at` lies within the interval, bounds included.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Whether the two intervals share at least one instant.
    ///
    /// Intervals that merely touch (`a.end == b.start`) overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

/// The single filtered range query the store has to support.
///
/// Selects windows on `site` with `start_time <= start_lte` and
/// `end_time >= end_gte`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeQuery {
    /// Site to search.
    pub site: SiteId,
    /// Upper bound for a window's `start_time`.
    pub start_lte: DateTime<Utc>,
    /// Lower bound for a window's `end_time`.
    pub end_gte: DateTime<Utc>,
}

impl RangeQuery {
    /// Windows on `site` that share at least one instant with `interval`.
    pub const fn overlapping(site: SiteId, interval: &Interval) -> Self {
        Self {
            site,
            start_lte: interval.end,
            end_gte: interval.start,
        }
    }

    /// Windows on `site` whose interval contains `at`.
    pub const fn containing(site: SiteId, at: DateTime<Utc>) -> Self {
        Self::overlapping(site, &Interval::instant(at))
    }

    /// Evaluate the predicate against a window in memory.
    pub fn matches(&self, window: &DescriptionWindow) -> bool {
        window.site == self.site
            && window.start_time <= self.start_lte
            && window.end_time >= self.end_gte
    }
}
