//! Window factory pre-populated from configured default times.
//!
//! A site that runs the same slot every day can configure a default start and
//! end time of day. New window drafts then come up with today's date at those
//! times, ready for the administrator to adjust. Nothing else depends on
//! these values.

use autotopic_types::{SiteId, WindowDraft};
use chrono::{DateTime, NaiveTime, Utc};

use crate::clock::Clock;
use crate::config::{ConfigError, DefaultsConfig, TimeOfDayTriple};

/// Validated default times of day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowDefaults {
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
}

impl WindowDefaults {
    /// Build the defaults from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeOfDay`] if an hour, minute, or second
    /// is out of range.
    pub fn from_config(config: &DefaultsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            start: config
                .start_time
                .map(|t| time_of_day("start_time", t))
                .transpose()?,
            end: config
                .end_time
                .map(|t| time_of_day("end_time", t))
                .transpose()?,
        })
    }

    /// Today's date (per `now`) at the default start time, if configured.
    pub fn default_start_time(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.start.map(|t| on_same_day(now, t))
    }

    /// Today's date (per `now`) at the default end time, if configured.
    pub fn default_end_time(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.end.map(|t| on_same_day(now, t))
    }

    /// A fresh draft for `site` with the default times filled in.
    pub fn new_draft<C: Clock>(&self, site: SiteId, clock: &C) -> WindowDraft {
        let now = clock.now();
        WindowDraft {
            site: Some(site),
            start_time: self.default_start_time(now),
            end_time: self.default_end_time(now),
            ..WindowDraft::new()
        }
    }
}

fn time_of_day(field: &'static str, triple: TimeOfDayTriple) -> Result<NaiveTime, ConfigError> {
    let (hour, minute, second) = triple;
    let (hour, minute, second) = (hour.unwrap_or(0), minute.unwrap_or(0), second.unwrap_or(0));
    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| ConfigError::InvalidTimeOfDay {
        field,
        reason: format!("{hour:02}:{minute:02}:{second:02} is not a valid time"),
    })
}

fn on_same_day(now: DateTime<Utc>, time: NaiveTime) -> DateTime<Utc> {
    now.date_naive().and_time(time).and_utc()
}
