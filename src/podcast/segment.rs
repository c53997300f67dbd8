//! Preshow / show / postshow classification of transcript rows.
//!
//! Offsets are always measured from the scheduled start, so the postshow
//! clock keeps running past the nominal end instead of restarting at zero.

use chrono::TimeDelta;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::clock::{Offset, Timestamp};

/// Rows more than this many hours before the start are dropped.
const PRESHOW_RETENTION_HOURS: u32 = 1;
/// Rows more than this many hours after the end are dropped.
const POSTSHOW_RETENTION_HOURS: u32 = 1;

/// The scheduled broadcast, `[start, end)` on the reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl ShowWindow {
    pub fn new(start: Timestamp, duration: TimeDelta) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }
}

/// How far through the broadcast the transcript has progressed.
///
/// Ordered so that `Preshow < Show < Postshow`; the classifier never moves
/// backwards through this order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    #[default]
    Preshow,
    Show,
    Postshow,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Segment::Preshow => "preshow",
            Segment::Show => "show",
            Segment::Postshow => "postshow",
        };
        f.write_str(name)
    }
}

/// Presentation class of a kept row, mapped to a symbol only when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Preshow,
    Show,
    /// First row past the scheduled end.
    PostshowBoundary,
    Postshow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub marker: Marker,
    pub offset: Offset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Keep(Stamp),
    Discard,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderingError {
    #[error(
        "Could not calculate podcast timestamps prior to \"{timestamp}\" after the {segment} began. Timestamps are ambiguous."
    )]
    Ambiguous {
        timestamp: Timestamp,
        segment: Segment,
    },
}

/// Classify one timestamp given the progress made so far.
///
/// Returns the segment to continue with and what to do with the row.
pub fn classify(
    timestamp: Timestamp,
    window: &ShowWindow,
    segment: Segment,
) -> Result<(Segment, Outcome), OrderingError> {
    if timestamp < window.start && segment == Segment::Preshow {
        // Countdown to the start; anything a full hour out is cut.
        let countdown = Offset::from(window.start - timestamp);
        let outcome = if countdown.hour() >= PRESHOW_RETENTION_HOURS {
            Outcome::Discard
        } else {
            Outcome::Keep(Stamp {
                marker: Marker::Preshow,
                offset: countdown,
            })
        };
        return Ok((Segment::Preshow, outcome));
    }

    let offset = Offset::from(timestamp - window.start);

    if (timestamp > window.end && segment == Segment::Show) || segment == Segment::Postshow {
        let marker = if segment == Segment::Show {
            Marker::PostshowBoundary
        } else {
            Marker::Postshow
        };
        let outcome = if past_postshow_retention(window, offset) {
            Outcome::Discard
        } else {
            Outcome::Keep(Stamp { marker, offset })
        };
        return Ok((Segment::Postshow, outcome));
    }

    if timestamp < window.start {
        return Err(OrderingError::Ambiguous { timestamp, segment });
    }

    Ok((
        Segment::Show,
        Outcome::Keep(Stamp {
            marker: Marker::Show,
            offset,
        }),
    ))
}

/// Compares where the elapsed clock lands against the nominal end hour.
///
/// Works on clock hours and minutes separately, so a carry between the two is
/// not accounted for.
fn past_postshow_retention(window: &ShowWindow, offset: Offset) -> bool {
    let elapsed_hours = window.start.hour() + offset.hour();
    let limit = window.end.hour() + POSTSHOW_RETENTION_HOURS;
    let elapsed_minutes = (window.start.minute() + offset.minute()) % 60;

    (elapsed_hours == limit && elapsed_minutes > window.end.minute()) || elapsed_hours > limit
}

/// Holds the window and the running segment across a row sequence.
#[derive(Debug, Clone)]
pub struct SegmentClassifier {
    window: ShowWindow,
    segment: Segment,
}

impl SegmentClassifier {
    pub fn new(window: ShowWindow) -> Self {
        Self {
            window,
            segment: Segment::Preshow,
        }
    }

    pub fn segment(&self) -> Segment {
        self.segment
    }

    pub fn classify(&mut self, timestamp: Timestamp) -> Result<Outcome, OrderingError> {
        let (segment, outcome) = classify(timestamp, &self.window, self.segment)?;
        debug_assert!(segment >= self.segment);
        self.segment = segment;
        Ok(outcome)
    }
}
