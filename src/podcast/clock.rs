//! Time-of-day arithmetic for transcript rows.
//!
//! Row identifiers carry only a wall-clock time (`tHH:MM`). Every value is
//! therefore placed on an arbitrary reference day and measured from its
//! midnight; a row that belongs to the following day simply carries more
//! than 24 hours.

use chrono::{NaiveTime, TimeDelta, Timelike};
use std::fmt;
use std::ops::{Add, Sub};
use thiserror::Error;

/// Format of the show start and duration arguments.
pub const CLOCK_FORMAT: &str = "%H:%M";
/// Format of the per-row time identifier written by irclog2html.
pub const ROW_ID_FORMAT: &str = "t%H:%M";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("Invalid time '{value}', expected HH:MM")]
    InvalidClock { value: String },

    #[error("Invalid row identifier '{value}', expected tHH:MM")]
    InvalidRowId { value: String },
}

/// A wall-clock time placed on the reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(TimeDelta);

impl Timestamp {
    pub fn from_hm(hour: u32, minute: u32) -> Self {
        Self(TimeDelta::hours(i64::from(hour)) + TimeDelta::minutes(i64::from(minute)))
    }

    fn from_naive(time: NaiveTime) -> Self {
        Self::from_hm(time.hour(), time.minute())
    }

    /// Parse an `HH:MM` command-line value.
    pub fn parse_clock(value: &str) -> Result<Self, ClockError> {
        NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT)
            .map(Self::from_naive)
            .map_err(|_| ClockError::InvalidClock {
                value: value.to_string(),
            })
    }

    /// Parse a `tHH:MM` row identifier.
    pub fn from_row_id(id: &str) -> Result<Self, ClockError> {
        NaiveTime::parse_from_str(id.trim(), ROW_ID_FORMAT)
            .map(Self::from_naive)
            .map_err(|_| ClockError::InvalidRowId {
                value: id.to_string(),
            })
    }

    /// Clock hour, 0-23, ignoring how many days past the reference day we are.
    pub fn hour(&self) -> u32 {
        self.0.num_hours().rem_euclid(24) as u32
    }

    pub fn minute(&self) -> u32 {
        self.0.num_minutes().rem_euclid(60) as u32
    }

    /// Whole days past the reference day.
    pub fn day(&self) -> i64 {
        self.0.num_days()
    }

    pub fn next_day(self) -> Self {
        self + TimeDelta::days(1)
    }
}

impl Add<TimeDelta> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: TimeDelta) -> Self::Output {
        Timestamp(self.0 + rhs)
    }
}

impl Sub for Timestamp {
    type Output = TimeDelta;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        self.0 - rhs.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse an `HH:MM` show duration.
pub fn parse_duration(value: &str) -> Result<TimeDelta, ClockError> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT)
        .map(|time| {
            TimeDelta::hours(i64::from(time.hour())) + TimeDelta::minutes(i64::from(time.minute()))
        })
        .map_err(|_| ClockError::InvalidClock {
            value: value.to_string(),
        })
}

/// Elapsed time shown next to a row, rendered on a 24-hour dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Offset(TimeDelta);

impl Offset {
    pub fn hour(&self) -> u32 {
        self.0.num_hours().rem_euclid(24) as u32
    }

    pub fn minute(&self) -> u32 {
        self.0.num_minutes().rem_euclid(60) as u32
    }
}

impl From<TimeDelta> for Offset {
    fn from(delta: TimeDelta) -> Self {
        Offset(delta)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}
